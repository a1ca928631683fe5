//! 商品处理器与读缓存协调器的联动测试
//!
//! 用真实路由和测试数据库验证：成功的写操作令缓存失效并触发
//! 下一次读的重算；未命中目标的写操作不得清缓存。回填写入只在
//! 重算之后发生，因此写入计数即重算计数。

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use catalog_backend::{
    AppState,
    cache::{CacheStore, LocalCacheStore, ProductCache, StoreError},
    config::{CacheBackend, Config},
    routes,
};

/// 本地缓存的包装，统计回填写入次数
#[derive(Default)]
struct CountingCacheStore {
    inner: LocalCacheStore,
    writes: AtomicU32,
}

impl CountingCacheStore {
    fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for CountingCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn clear_namespace(&self, prefix: &str) -> Result<(), StoreError> {
        self.inner.clear_namespace(prefix).await
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/catalog".into(),
        redis_url: None,
        server_host: "127.0.0.1".into(),
        server_port: 3000,
        rate_limit_enabled: false,
        rate_limit_max_tokens: 5,
        rate_limit_window_secs: 60,
        cache_backend: CacheBackend::Local,
        cache_ttl_minutes: 30,
    }
}

fn test_app(pool: PgPool) -> (Router, Arc<CountingCacheStore>) {
    let store = Arc::new(CountingCacheStore::default());
    let state = AppState {
        pool,
        config: test_config(),
        cache: ProductCache::new(store.clone()),
    };
    (routes::product::routes().with_state(state), store)
}

fn product_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "test product",
        "price": 9.99,
        "quantity": 3,
        "category": "tools",
        "brand": "acme",
    })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn list_names(app: &Router) -> Vec<String> {
    let response = app.clone().oneshot(get_request("/api/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn successful_mutations_invalidate_and_reads_reflect_them(pool: PgPool) {
    let (app, store) = test_app(pool);

    // 建立商品并缓存列表
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", &product_body("hammer")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    assert_eq!(list_names(&app).await, vec!["hammer"]);
    assert_eq!(store.writes(), 1);

    // 再次读取命中缓存，不重算
    assert_eq!(list_names(&app).await, vec!["hammer"]);
    assert_eq!(store.writes(), 1);

    // 更新成功后缓存失效，下一次读走重算并反映新名称
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/products/{id}"),
            &product_body("sledgehammer"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(list_names(&app).await, vec!["sledgehammer"]);
    assert_eq!(store.writes(), 2);

    // 软删除成功后同样失效，商品从列表消失
    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/products/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(list_names(&app).await.is_empty());
    assert_eq!(store.writes(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn hard_delete_invalidates_the_list_cache(pool: PgPool) {
    let (app, store) = test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", &product_body("wrench")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    assert_eq!(list_names(&app).await, vec!["wrench"]);
    assert_eq!(store.writes(), 1);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/products/{id}/hard")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(list_names(&app).await.is_empty());
    assert_eq!(store.writes(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn missed_mutations_leave_the_cache_servable(pool: PgPool) {
    let (app, store) = test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", &product_body("drill")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(list_names(&app).await, vec!["drill"]);
    assert_eq!(store.writes(), 1);

    let missing = Uuid::new_v4();

    // 更新不存在的商品：404，缓存保持可用
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/products/{missing}"),
            &product_body("ghost"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(list_names(&app).await, vec!["drill"]);
    assert_eq!(store.writes(), 1);

    // 软删除不存在的商品
    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/products/{missing}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(list_names(&app).await, vec!["drill"]);
    assert_eq!(store.writes(), 1);

    // 物理删除不存在的商品
    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/products/{missing}/hard")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(list_names(&app).await, vec!["drill"]);
    assert_eq!(store.writes(), 1);
}
