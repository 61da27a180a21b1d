//! Product catalog read-through cache
//!
//! Serves catalog reads from an in-process cache or a distributed cache,
//! falling back to the catalog on a miss and storing the result with
//! per-query expiration policies.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::product::InMemoryProductCatalog;
use infrastructure::{
    cache::{DistributedCacheFactory, MemoryCache},
    observability::TracingEventSink,
    services::{ProductCacheService, ReadThroughCache},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let policies = config.cache.policies.to_policies()?;

    let catalog = Arc::new(
        InMemoryProductCatalog::seeded().with_latency(config.catalog.to_latency()),
    );

    let local_cache = Arc::new(MemoryCache::with_config(
        config.cache.local.to_memory_config(),
    ));

    let distributed_config = config.cache.distributed.to_factory_config();
    let distributed_cache = DistributedCacheFactory::new()
        .create(&distributed_config)
        .await?;

    info!(
        local_capacity = config.cache.local.max_capacity,
        distributed_backend = distributed_cache.backend_name(),
        "Cache backends ready"
    );

    let read_through =
        ReadThroughCache::new(catalog, Arc::new(TracingEventSink::new())).with_policies(policies);

    let product_service = ProductCacheService::new(
        read_through,
        local_cache.clone(),
        distributed_cache.clone(),
    );

    Ok(AppState::new(
        Arc::new(product_service),
        local_cache,
        distributed_cache,
    ))
}
