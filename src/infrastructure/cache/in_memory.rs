//! Process-local distributed cache stand-in

use async_trait::async_trait;

use super::memory::{MemoryCache, MemoryCacheConfig};
use crate::domain::cache::{CacheEntryOptions, CachePriority, DistributedCache};
use crate::domain::DomainError;

/// Distributed cache contract backed by process memory
///
/// Payloads are stored serialized, exactly as a networked backend would hold
/// them, but they are only visible inside this process. Useful for
/// development and tests; use [`super::RedisDistributedCache`] to share
/// entries across processes.
#[derive(Debug, Default)]
pub struct InMemoryDistributedCache {
    store: MemoryCache<String>,
}

impl InMemoryDistributedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryCacheConfig) -> Self {
        Self {
            store: MemoryCache::with_config(config),
        }
    }
}

#[async_trait]
impl DistributedCache for InMemoryDistributedCache {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.store.try_get(key)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
    ) -> Result<(), DomainError> {
        // Priority is a local-backend concept
        let options = options.with_priority(CachePriority::Normal);
        self.store.set(key, value.to_string(), &options)
    }

    async fn refresh(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.store.try_get(key)?.is_some())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        self.store.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::cache::DistributedCacheExt;

    fn options() -> CacheEntryOptions {
        CacheEntryOptions::new(Duration::from_secs(600)).with_sliding_ttl(Duration::from_secs(120))
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_and_get_typed() {
        let cache = InMemoryDistributedCache::new();

        cache.set("key1", &vec![1, 2, 3], &options()).await.unwrap();

        let result: Option<Vec<i32>> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some(vec![1, 2, 3]));
        assert_eq!(
            cache.get_raw("key1").await.unwrap(),
            Some("[1,2,3]".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_payload_is_a_hit() {
        let cache = InMemoryDistributedCache::new();

        cache.set_raw("key1", "", &options()).await.unwrap();

        assert_eq!(cache.get_raw("key1").await.unwrap(), Some(String::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_renews_sliding_window() {
        let cache = InMemoryDistributedCache::new();
        cache.set_raw("key1", "1", &options()).await.unwrap();

        tokio::time::advance(Duration::from_secs(100)).await;
        assert!(cache.refresh("key1").await.unwrap());

        tokio::time::advance(Duration::from_secs(100)).await;
        assert_eq!(cache.get_raw("key1").await.unwrap(), Some("1".to_string()));

        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(!cache.refresh("key1").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_absolute_expiration() {
        let cache = InMemoryDistributedCache::new();
        cache.set_raw("key1", "1", &options()).await.unwrap();

        tokio::time::advance(Duration::from_secs(15 * 60)).await;

        assert_eq!(cache.get_raw("key1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove() {
        let cache = InMemoryDistributedCache::new();
        cache.set_raw("key1", "1", &options()).await.unwrap();

        assert!(cache.remove("key1").await.unwrap());
        assert_eq!(cache.get_raw("key1").await.unwrap(), None);
    }
}
