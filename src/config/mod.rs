use std::env;
use std::time::Duration;

/// 缓存后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// 进程内缓存，多实例部署时各实例互不共享
    Local,
    /// 共享 Redis 缓存，带固定 TTL
    Shared,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub rate_limit_enabled: bool,
    pub rate_limit_max_tokens: u32,
    pub rate_limit_window_secs: u64,
    pub cache_backend: CacheBackend,
    pub cache_ttl_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let cache_backend = match env::var("CACHE_BACKEND").as_deref() {
            Ok("shared") => CacheBackend::Shared,
            _ => CacheBackend::Local,
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL").ok(),
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")
                .unwrap_or_default()
                .parse()
                .unwrap_or(3000),
            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            rate_limit_max_tokens: env::var("RATE_LIMIT_MAX_TOKENS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(5),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")
                .unwrap_or_default()
                .parse()
                .unwrap_or(60),
            cache_backend,
            cache_ttl_minutes: env::var("CACHE_TTL_MINUTES")
                .unwrap_or_default()
                .parse()
                .unwrap_or(30),
        })
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }

    /// 限流开启或使用共享缓存时必须配置 Redis
    pub fn requires_redis(&self) -> bool {
        self.rate_limit_enabled || self.cache_backend == CacheBackend::Shared
    }
}
