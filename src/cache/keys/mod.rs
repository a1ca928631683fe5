/// 缓存键模块
/// 提供各种缓存键生成函数

// 商品缓存键模块
pub mod product_keys;

// 限流计数键模块
pub mod rate_limit_keys;

// 重新导出常用的键生成函数
pub use product_keys::{PRODUCT_NAMESPACE, product_list_key};
pub use rate_limit_keys::rate_limit_key;
