// 商品实体
// 定义商品相关的数据库实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 商品实体，对应数据库中的 products 表
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductEntity {
    /// 商品ID
    pub id: Uuid,
    /// 商品名称
    pub name: String,
    /// 商品描述
    pub description: String,
    /// 单价
    pub price: f64,
    /// 库存数量
    pub quantity: i32,
    /// 分类
    pub category: String,
    /// 品牌
    pub brand: String,
    /// 是否在售，软删除后置为 false
    pub active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}
