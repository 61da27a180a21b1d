//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, CatalogSettings, DistributedCacheSettings, LocalCacheSettings,
    LogFormat, LoggingConfig, PolicySettings, ServerConfig, ShapePolicies,
};
