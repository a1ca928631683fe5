use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tokio::time::Instant;

use crate::cache::store::StoreError;

/// 限流计数器存储
///
/// 键带 TTL，窗口到期后整体消失，下一次请求开启新窗口。
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// 读取计数值。键存在但值不可解析时返回 `Ok(None)`，
    /// 由调用方按拒绝处理。
    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;

    async fn set_ex(&self, key: &str, value: i64, ttl: Duration) -> Result<(), StoreError>;

    async fn decr(&self, key: &str) -> Result<i64, StoreError>;
}

/// 共享 Redis 计数器存储，所有服务实例共用同一份窗口预算
pub struct RedisCounterStore {
    redis: Arc<RedisClient>,
}

impl RedisCounterStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    async fn set_ex(&self, key: &str, value: i64, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn decr(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let value: i64 = conn.decr(key, 1).await?;
        Ok(value)
    }
}

/// 进程内计数器存储，用于测试和无 Redis 的开发环境
///
/// 多实例部署时各实例预算独立，不适合生产共享限流。
#[derive(Default)]
pub struct MemoryCounterStore {
    entries: RwLock<HashMap<String, (i64, Instant)>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_value(&self, key: &str) -> Option<i64> {
        let entries = self.entries.read().expect("counter lock poisoned");
        entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| *value)
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.live_value(key).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.live_value(key))
    }

    async fn set_ex(&self, key: &str, value: i64, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.write().expect("counter lock poisoned");
        entries.insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }

    async fn decr(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.write().expect("counter lock poisoned");
        match entries.get_mut(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => {
                *value -= 1;
                Ok(*value)
            }
            // 键不存在或已过期：与 Redis DECR 一致从 0 开始递减，
            // 重建的键没有窗口 TTL。限流器在窗口边界上 get 和 decr
            // 之间过期时会走到这里，该客户端从此只会被拒
            _ => {
                let expires_at = Instant::now() + Duration::from_secs(365 * 24 * 3600);
                entries.insert(key.to_string(), (-1, expires_at));
                Ok(-1)
            }
        }
    }
}
