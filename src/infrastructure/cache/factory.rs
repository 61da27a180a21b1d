//! Distributed cache factory for runtime backend selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::domain::cache::DistributedCache;
use crate::domain::DomainError;

use super::in_memory::InMemoryDistributedCache;
use super::memory::MemoryCacheConfig;
use super::redis::{RedisCacheConfig, RedisDistributedCache};

/// Supported distributed cache backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DistributedCacheType {
    /// Process-local stand-in
    #[default]
    InMemory,
    /// Redis server
    Redis,
}

impl std::fmt::Display for DistributedCacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributedCacheType::InMemory => write!(f, "in_memory"),
            DistributedCacheType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for DistributedCacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(DistributedCacheType::InMemory),
            "redis" => Ok(DistributedCacheType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown distributed cache type: {}. Valid types: in_memory, redis",
                s
            ))),
        }
    }
}

impl TryFrom<String> for DistributedCacheType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Settings for building the distributed cache
#[derive(Debug, Clone)]
pub struct DistributedCacheConfig {
    /// Backend to create
    pub cache_type: DistributedCacheType,
    /// Redis URL (required for the Redis backend)
    pub redis_url: Option<String>,
    /// Key prefix for namespacing (Redis only)
    pub key_prefix: Option<String>,
    /// Connection timeout (Redis only)
    pub connection_timeout: Duration,
    /// Maximum capacity (in-memory only)
    pub max_capacity: usize,
}

impl Default for DistributedCacheConfig {
    fn default() -> Self {
        Self {
            cache_type: DistributedCacheType::InMemory,
            redis_url: None,
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
            max_capacity: 10_000,
        }
    }
}

impl DistributedCacheConfig {
    /// Configuration for the in-process backend
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Configuration for a Redis backend
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            cache_type: DistributedCacheType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Factory for creating distributed cache instances
#[derive(Debug, Default)]
pub struct DistributedCacheFactory;

impl DistributedCacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a distributed cache based on configuration
    pub async fn create(
        &self,
        config: &DistributedCacheConfig,
    ) -> Result<Arc<dyn DistributedCache>, DomainError> {
        match config.cache_type {
            DistributedCacheType::InMemory => {
                info!("Using in-memory distributed cache");
                let store_config =
                    MemoryCacheConfig::default().with_max_capacity(config.max_capacity);
                Ok(Arc::new(InMemoryDistributedCache::with_config(store_config)))
            }
            DistributedCacheType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis cache type")
                })?;

                let mut redis_config =
                    RedisCacheConfig::new(url).with_connection_timeout(config.connection_timeout);

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                info!(url = %redis_config.url, "Connecting to Redis distributed cache");
                let cache = RedisDistributedCache::new(redis_config).await?;
                Ok(Arc::new(cache))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheEntryOptions, DistributedCacheExt};

    #[test]
    fn test_cache_type_from_str() {
        assert_eq!(
            "in_memory".parse::<DistributedCacheType>().unwrap(),
            DistributedCacheType::InMemory
        );
        assert_eq!(
            "memory".parse::<DistributedCacheType>().unwrap(),
            DistributedCacheType::InMemory
        );
        assert_eq!(
            "REDIS".parse::<DistributedCacheType>().unwrap(),
            DistributedCacheType::Redis
        );
    }

    #[test]
    fn test_cache_type_from_str_invalid() {
        let result = "memcached".parse::<DistributedCacheType>();
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_cache_type_deserialize() {
        let parsed: DistributedCacheType = serde_json::from_str("\"redis\"").unwrap();
        assert_eq!(parsed, DistributedCacheType::Redis);
        assert_eq!(DistributedCacheType::InMemory.to_string(), "in_memory");
    }

    #[test]
    fn test_redis_config() {
        let config = DistributedCacheConfig::redis("redis://localhost:6379").with_key_prefix("app");

        assert_eq!(config.cache_type, DistributedCacheType::Redis);
        assert_eq!(config.redis_url, Some("redis://localhost:6379".to_string()));
        assert_eq!(config.key_prefix, Some("app".to_string()));
    }

    #[tokio::test]
    async fn test_factory_create_in_memory() {
        let factory = DistributedCacheFactory::new();

        let cache = factory
            .create(&DistributedCacheConfig::in_memory())
            .await
            .unwrap();

        let options = CacheEntryOptions::new(Duration::from_secs(60));
        cache.set("test", &"value", &options).await.unwrap();

        let result: Option<String> = cache.get("test").await.unwrap();
        assert_eq!(result, Some("value".to_string()));
        assert_eq!(cache.backend_name(), "in_memory");
    }

    #[tokio::test]
    async fn test_factory_create_redis_missing_url() {
        let factory = DistributedCacheFactory::new();
        let config = DistributedCacheConfig {
            cache_type: DistributedCacheType::Redis,
            redis_url: None,
            ..Default::default()
        };

        let result = factory.create(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
