// 数据访问模块

pub mod entities;
pub mod repositories;

pub use entities::product::ProductEntity;
pub use repositories::product::{NewProduct, ProductChanges, ProductRepository};
