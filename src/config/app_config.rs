use std::time::Duration;

use serde::Deserialize;

use crate::domain::cache::{CacheEntryOptions, CachePolicies, CachePriority};
use crate::domain::product::CatalogLatency;
use crate::domain::DomainError;
use crate::infrastructure::cache::{DistributedCacheConfig, DistributedCacheType, MemoryCacheConfig};
use crate::infrastructure::observability::{MetricsConfig, TracingConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub tracing: TracingConfig,
    pub cache: CacheSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub local: LocalCacheSettings,
    pub distributed: DistributedCacheSettings,
    pub policies: ShapePolicies,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalCacheSettings {
    pub max_capacity: usize,
    /// Seconds between expired-entry sweeps; 0 disables the sweeper
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DistributedCacheSettings {
    #[serde(rename = "type")]
    pub cache_type: DistributedCacheType,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub connection_timeout_secs: u64,
    /// Capacity of the in-memory stand-in
    pub max_capacity: usize,
}

/// Expiration policy for one query shape, in seconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PolicySettings {
    pub absolute_secs: u64,
    #[serde(default)]
    pub sliding_secs: Option<u64>,
    #[serde(default)]
    pub priority: CachePriority,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShapePolicies {
    pub all_products: PolicySettings,
    pub product_by_id: PolicySettings,
    pub products_by_category: PolicySettings,
}

/// Simulated catalog latencies, in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub fetch_all_ms: u64,
    pub fetch_by_id_ms: u64,
    pub fetch_by_category_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LocalCacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for DistributedCacheSettings {
    fn default() -> Self {
        Self {
            cache_type: DistributedCacheType::InMemory,
            redis_url: None,
            key_prefix: None,
            connection_timeout_secs: 5,
            max_capacity: 10_000,
        }
    }
}

impl Default for ShapePolicies {
    fn default() -> Self {
        let defaults = CachePolicies::default();

        Self {
            all_products: PolicySettings::from(defaults.all_products),
            product_by_id: PolicySettings::from(defaults.product_by_id),
            products_by_category: PolicySettings::from(defaults.products_by_category),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        let latency = CatalogLatency::default();

        Self {
            fetch_all_ms: latency.fetch_all.as_millis() as u64,
            fetch_by_id_ms: latency.fetch_by_id.as_millis() as u64,
            fetch_by_category_ms: latency.fetch_by_category.as_millis() as u64,
        }
    }
}

impl From<CacheEntryOptions> for PolicySettings {
    fn from(options: CacheEntryOptions) -> Self {
        Self {
            absolute_secs: options.absolute_ttl.as_secs(),
            sliding_secs: options.sliding_ttl.map(|d| d.as_secs()),
            priority: options.priority,
        }
    }
}

impl PolicySettings {
    /// Converts to entry options; the absolute lifetime must be positive
    pub fn to_options(&self, name: &str) -> Result<CacheEntryOptions, DomainError> {
        if self.absolute_secs == 0 {
            return Err(DomainError::configuration(format!(
                "cache.policies.{}.absolute_secs must be greater than zero",
                name
            )));
        }

        let mut options = CacheEntryOptions::new(Duration::from_secs(self.absolute_secs))
            .with_priority(self.priority);

        match self.sliding_secs {
            Some(0) => {
                return Err(DomainError::configuration(format!(
                    "cache.policies.{}.sliding_secs must be greater than zero when set",
                    name
                )));
            }
            Some(secs) => options = options.with_sliding_ttl(Duration::from_secs(secs)),
            None => {}
        }

        Ok(options)
    }
}

impl ShapePolicies {
    pub fn to_policies(&self) -> Result<CachePolicies, DomainError> {
        Ok(CachePolicies {
            all_products: self.all_products.to_options("all_products")?,
            product_by_id: self.product_by_id.to_options("product_by_id")?,
            products_by_category: self.products_by_category.to_options("products_by_category")?,
        })
    }
}

impl LocalCacheSettings {
    pub fn to_memory_config(&self) -> MemoryCacheConfig {
        MemoryCacheConfig::default().with_max_capacity(self.max_capacity)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl DistributedCacheSettings {
    pub fn to_factory_config(&self) -> DistributedCacheConfig {
        DistributedCacheConfig {
            cache_type: self.cache_type,
            redis_url: self.redis_url.clone(),
            key_prefix: self.key_prefix.clone(),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
            max_capacity: self.max_capacity,
        }
    }
}

impl CatalogSettings {
    pub fn to_latency(&self) -> CatalogLatency {
        CatalogLatency {
            fetch_all: Duration::from_millis(self.fetch_all_ms),
            fetch_by_id: Duration::from_millis(self.fetch_by_id_ms),
            fetch_by_category: Duration::from_millis(self.fetch_by_category_ms),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = parse("");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.cache.local.max_capacity, 10_000);
        assert_eq!(config.cache.distributed.cache_type, DistributedCacheType::InMemory);
        assert_eq!(config.catalog.fetch_all_ms, 1000);

        let policies = config.cache.policies.to_policies().unwrap();
        assert_eq!(policies.all_products.absolute_ttl, Duration::from_secs(600));
        assert_eq!(policies.product_by_id.priority, CachePriority::High);
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [cache.distributed]
            type = "redis"
            redis_url = "redis://cache:6379"
            key_prefix = "catalog"

            [cache.policies.all_products]
            absolute_secs = 60
            sliding_secs = 10
            priority = "low"

            [catalog]
            fetch_all_ms = 0
            "#,
        );

        assert_eq!(config.logging.format, LogFormat::Json);

        let distributed = config.cache.distributed.to_factory_config();
        assert_eq!(distributed.cache_type, DistributedCacheType::Redis);
        assert_eq!(distributed.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(distributed.key_prefix.as_deref(), Some("catalog"));
        assert_eq!(distributed.connection_timeout, Duration::from_secs(5));

        let policies = config.cache.policies.to_policies().unwrap();
        assert_eq!(policies.all_products.absolute_ttl, Duration::from_secs(60));
        assert_eq!(policies.all_products.sliding_ttl, Some(Duration::from_secs(10)));
        assert_eq!(policies.all_products.priority, CachePriority::Low);
        assert_eq!(policies.products_by_category.absolute_ttl, Duration::from_secs(600));

        let latency = config.catalog.to_latency();
        assert_eq!(latency.fetch_all, Duration::ZERO);
        assert_eq!(latency.fetch_by_id, Duration::from_millis(300));
    }

    #[test]
    fn test_zero_absolute_ttl_is_rejected() {
        let policy = PolicySettings {
            absolute_secs: 0,
            sliding_secs: None,
            priority: CachePriority::Normal,
        };

        let result = policy.to_options("all_products");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_zero_sliding_ttl_is_rejected() {
        let policy = PolicySettings {
            absolute_secs: 60,
            sliding_secs: Some(0),
            priority: CachePriority::Normal,
        };

        assert!(policy.to_options("product_by_id").is_err());
    }

    #[test]
    fn test_sweep_interval() {
        let mut local = LocalCacheSettings::default();
        assert_eq!(local.sweep_interval(), Some(Duration::from_secs(60)));

        local.sweep_interval_secs = 0;
        assert_eq!(local.sweep_interval(), None);
        assert_eq!(local.to_memory_config().max_capacity, 10_000);
    }
}
