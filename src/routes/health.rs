use axum::Json;
use serde_json::{Value, json};

/// 健康检查端点，不经过限流
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
