use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::entities::product::ProductEntity;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, quantity, category, brand, active, created_at, updated_at";

/// 新建商品的字段
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    pub brand: String,
}

/// 更新商品的字段，整行覆盖
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    pub brand: String,
}

/// 商品存储库实现
pub struct ProductRepository;

impl ProductRepository {
    /// 创建商品，初始状态为在售
    pub async fn insert(pool: &PgPool, new: NewProduct) -> Result<ProductEntity, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            INSERT INTO products (id, name, description, price, quantity, category, brand, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.quantity)
        .bind(&new.category)
        .bind(&new.brand)
        .bind(now)
        .fetch_one(pool)
        .await;

        match result {
            Ok(product) => {
                tracing::info!("Created product: {} ({})", product.name, product.id);
                Ok(product)
            }
            Err(e) => {
                tracing::error!("Failed to create product {}: {:?}", new.name, e);
                Err(e)
            }
        }
    }

    /// 查询所有在售商品，按创建时间排序
    pub async fn find_active(pool: &PgPool) -> Result<Vec<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE active = TRUE
            ORDER BY created_at
            "#
        ))
        .fetch_all(pool)
        .await
    }

    /// 根据ID查询在售商品
    pub async fn find_by_id_active(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE id = $1 AND active = TRUE
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 按分类查询商品
    pub async fn find_by_category(
        pool: &PgPool,
        category: &str,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE category = $1
            ORDER BY created_at
            "#
        ))
        .bind(category)
        .fetch_all(pool)
        .await
    }

    /// 按品牌查询商品
    pub async fn find_by_brand(
        pool: &PgPool,
        brand: &str,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE brand = $1
            ORDER BY created_at
            "#
        ))
        .bind(brand)
        .fetch_all(pool)
        .await
    }

    /// 按名称模糊搜索商品，不区分大小写
    pub async fn search_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY created_at
            "#
        ))
        .bind(name)
        .fetch_all(pool)
        .await
    }

    /// 更新在售商品，商品不存在或已下架时返回 None
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, quantity = $4,
                category = $5, brand = $6, updated_at = $7
            WHERE id = $8 AND active = TRUE
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.quantity)
        .bind(&changes.category)
        .bind(&changes.brand)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 软删除商品，返回是否有记录被下架
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET active = FALSE, updated_at = $1
            WHERE id = $2 AND active = TRUE
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 检查商品记录是否存在（含已下架）
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// 物理删除商品，返回是否有记录被删除
    pub async fn hard_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
