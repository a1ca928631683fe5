use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::keys::PRODUCT_NAMESPACE;
use crate::cache::store::CacheStore;
use crate::error::AppError;

/// 商品读缓存协调器
///
/// 读路径走 cache-aside：命中直接返回，未命中执行查询并回填。
/// 任何成功的写操作都必须调用 [`ProductCache::invalidate_all`]，
/// 失效是粗粒度的，整个商品命名空间一起清除。
#[derive(Clone)]
pub struct ProductCache {
    store: Arc<dyn CacheStore>,
}

impl ProductCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// 命中缓存时直接返回，否则执行 `compute` 并回填
    ///
    /// 缓存存储不可用时降级为直接查询并告警，不向调用方暴露存储错误。
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, compute: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        match self.store.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::debug!("Cache hit for key: {}", key);
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!("Discarding undecodable cache entry for key {}: {}", key, e);
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss for key: {}", key);
            }
            Err(e) => {
                tracing::warn!("Cache store read failed for key {}: {}", key, e);
            }
        }

        let value = compute().await?;

        match serde_json::to_string(&value) {
            Ok(json) => {
                if let Err(e) = self.store.set(key, json).await {
                    tracing::warn!("Cache store write failed for key {}: {}", key, e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry for key {}: {}", key, e);
            }
        }

        Ok(value)
    }

    /// 清除商品命名空间下的全部缓存条目
    pub async fn invalidate_all(&self) {
        if let Err(e) = self.store.clear_namespace(PRODUCT_NAMESPACE).await {
            tracing::warn!("Cache invalidation failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::cache::keys::product_list_key;
    use crate::cache::store::LocalCacheStore;

    fn cache() -> ProductCache {
        ProductCache::new(Arc::new(LocalCacheStore::new()))
    }

    #[tokio::test]
    async fn compute_runs_once_across_repeated_reads() {
        let cache = cache();
        let key = product_list_key();
        let calls = AtomicU32::new(0);

        for _ in 0..5 {
            let result: Vec<String> = cache
                .get_or_compute(&key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(vec!["laptop".to_string(), "phone".to_string()]) }
                })
                .await
                .unwrap();
            assert_eq!(result, vec!["laptop".to_string(), "phone".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_recompute() {
        let cache = cache();
        let key = product_list_key();
        let calls = AtomicU32::new(0);

        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(vec![1, 2, 3]) }
        };

        let _: Vec<i32> = cache.get_or_compute(&key, compute).await.unwrap();
        cache.invalidate_all().await;
        let _: Vec<i32> = cache.get_or_compute(&key, compute).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cached_timestamps_round_trip_exactly() {
        let cache = cache();
        let key = product_list_key();

        let original = vec![(
            "widget".to_string(),
            chrono::Utc::now(),
        )];
        let seeded = original.clone();
        let _: Vec<(String, chrono::DateTime<chrono::Utc>)> = cache
            .get_or_compute(&key, || async move { Ok(seeded) })
            .await
            .unwrap();

        let cached: Vec<(String, chrono::DateTime<chrono::Utc>)> = cache
            .get_or_compute(&key, || async {
                panic!("compute must not run on a cache hit")
            })
            .await
            .unwrap();

        assert_eq!(cached, original);
    }

    #[tokio::test]
    async fn compute_errors_are_not_cached() {
        let cache = cache();
        let key = product_list_key();
        let calls = AtomicU32::new(0);

        let failed: Result<Vec<i32>, _> = cache
            .get_or_compute(&key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::Internal("storage gone".into())) }
            })
            .await;
        assert!(failed.is_err());

        let recovered: Vec<i32> = cache
            .get_or_compute(&key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec![7]) }
            })
            .await
            .unwrap();

        assert_eq!(recovered, vec![7]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
