use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{Router, routing::get};
use catalog_backend::{
    AppState,
    cache::{LocalCacheStore, ProductCache, RedisCacheStore, RedisCounterStore},
    config::{CacheBackend, Config},
    middleware::{RateLimiter, log_errors, rate_limit},
    routes,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 仅在限流或共享缓存需要时建立 Redis 客户端
    let redis = if config.requires_redis() {
        let url = config
            .redis_url
            .clone()
            .expect("REDIS_URL is required when rate limiting is enabled or CACHE_BACKEND=shared");
        Some(Arc::new(
            redis::Client::open(url).expect("Failed to create Redis client"),
        ))
    } else {
        None
    };

    // 按配置选择缓存后端
    let cache = match config.cache_backend {
        CacheBackend::Local => {
            tracing::info!("Using in-process product cache");
            ProductCache::new(Arc::new(LocalCacheStore::new()))
        }
        CacheBackend::Shared => {
            tracing::info!(
                "Using shared Redis product cache with {}min TTL",
                config.cache_ttl_minutes
            );
            ProductCache::new(Arc::new(RedisCacheStore::new(
                redis.clone().expect("redis client"),
                config.cache_ttl(),
            )))
        }
    };

    let state = AppState {
        pool,
        config: config.clone(),
        cache,
    };

    let router = Router::new()
        .merge(routes::product::routes())
        .route("/health", get(routes::health::health))
        .layer(axum::middleware::from_fn(log_errors));

    // 限流中间件按配置开关，健康检查路径在中间件内部豁免
    let router = if config.rate_limit_enabled {
        tracing::info!(
            "Rate limiting enabled: {} requests per {}s window",
            config.rate_limit_max_tokens,
            config.rate_limit_window_secs
        );
        let store = RedisCounterStore::new(redis.clone().expect("redis client"));
        let limiter = Arc::new(RateLimiter::new(Arc::new(store), config.clone()));
        router.layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        router
    };

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    let app = router.with_state(state.clone());

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
