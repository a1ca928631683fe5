mod handler;
mod model;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::AppState;

pub use handler::{
    create_product,
    delete_product,
    get_product_by_id,
    get_products_by_brand,
    get_products_by_category,
    hard_delete_product,
    list_products,
    search_products,
    update_product,
};
pub use model::{ProductRequest, ProductResponse};

/// 商品路由表，主程序和测试共用同一份装配
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(list_products).post(create_product),
        )
        .route("/api/products/search", get(search_products))
        .route(
            "/api/products/{id}",
            get(get_product_by_id)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/api/products/{id}/hard", delete(hard_delete_product))
        .route(
            "/api/products/category/{category}",
            get(get_products_by_category),
        )
        .route("/api/products/brand/{brand}", get(get_products_by_brand))
}
