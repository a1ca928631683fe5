// 缓存模块
// 包含计数器存储、结果缓存存储和读缓存协调逻辑

pub mod coordinator;
pub mod counter;
pub mod keys;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use coordinator::ProductCache;
pub use counter::{CounterStore, MemoryCounterStore, RedisCounterStore};
pub use store::{CacheStore, LocalCacheStore, RedisCacheStore, StoreError};
