use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    cache::keys::product_list_key,
    database::repositories::product::ProductRepository,
    error::AppError,
};

use super::model::{ProductRequest, ProductResponse};

#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    tracing::info!("Creating product: {} ({})", req.name, req.category);

    let product = ProductRepository::insert(&state.pool, req.into()).await?;
    state.cache.invalidate_all().await;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// 在售商品列表，唯一走缓存的查询
#[axum::debug_handler]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let pool = state.pool.clone();

    let products = state
        .cache
        .get_or_compute(&product_list_key(), || async move {
            let products = ProductRepository::find_active(&pool).await?;
            tracing::info!("Fetched {} active products from database", products.len());
            Ok(products.into_iter().map(ProductResponse::from).collect())
        })
        .await?;

    Ok(Json(products))
}

#[axum::debug_handler]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = ProductRepository::find_by_id_active(&state.pool, id)
        .await?
        .ok_or(AppError::ProductNotFound)?;

    Ok(Json(product.into()))
}

#[axum::debug_handler]
pub async fn get_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = ProductRepository::find_by_category(&state.pool, &category).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn get_products_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = ProductRepository::find_by_brand(&state.pool, &brand).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: String,
}

#[axum::debug_handler]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = ProductRepository::search_by_name(&state.pool, &params.name).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    tracing::info!("Updating product: {}", id);

    match ProductRepository::update(&state.pool, id, req.into()).await? {
        Some(product) => {
            state.cache.invalidate_all().await;
            Ok(Json(product.into()))
        }
        // 没有任何状态变化，保留现有缓存
        None => {
            tracing::warn!("Cannot update product, not found: {}", id);
            Err(AppError::ProductNotFound)
        }
    }
}

/// 软删除：下架商品但保留记录
#[axum::debug_handler]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tracing::info!("Soft deleting product: {}", id);

    if ProductRepository::soft_delete(&state.pool, id).await? {
        state.cache.invalidate_all().await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("Cannot delete product, not found: {}", id);
        Err(AppError::ProductNotFound)
    }
}

/// 物理删除，不可恢复
#[axum::debug_handler]
pub async fn hard_delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tracing::warn!("Hard deleting product: {}", id);

    if ProductRepository::exists(&state.pool, id).await? {
        ProductRepository::hard_delete(&state.pool, id).await?;
        state.cache.invalidate_all().await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("Cannot hard delete product, not found: {}", id);
        Err(AppError::ProductNotFound)
    }
}
