use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

/// 存储访问失败（网络、超时等），由调用方决定降级策略
#[derive(Debug)]
pub struct StoreError(String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError(e.to_string())
    }
}

/// 查询结果缓存存储
///
/// 本地和共享两种实现契约一致，调用方只通过延迟和跨实例
/// 共享行为感知差异。
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// 清除指定前缀下的全部缓存条目
    async fn clear_namespace(&self, prefix: &str) -> Result<(), StoreError>;
}

/// 进程内缓存存储，无容量上限、无 TTL
#[derive(Default)]
pub struct LocalCacheStore {
    entries: RwLock<HashMap<String, String>>,
}

impl LocalCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().expect("cache lock poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn clear_namespace(&self, prefix: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

/// 共享 Redis 缓存存储，条目带固定 TTL
pub struct RedisCacheStore {
    redis: Arc<RedisClient>,
    ttl: Duration,
}

impl RedisCacheStore {
    pub fn new(redis: Arc<RedisClient>, ttl: Duration) -> Self {
        Self { redis, ttl }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let result: Option<String> = conn.get(key).await?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, self.ttl.as_secs()).await?;
        Ok(())
    }

    async fn clear_namespace(&self, prefix: &str) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        // 命名空间内键数量极少，KEYS 足够
        let keys: Vec<String> = conn.keys(format!("{}*", prefix)).await?;
        if !keys.is_empty() {
            let _: () = conn.del(keys).await?;
        }
        Ok(())
    }
}
