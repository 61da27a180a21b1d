//! Read-through lookup over a pluggable cache layer

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::cache::{
    CacheEntryOptions, CacheEvent, CacheEventSink, CacheKeyBuilder, CacheNamespace, CachePolicies,
    DistributedCache, DistributedCacheExt, ProductQuery,
};
use crate::domain::product::{ProductCatalog, ProductPayload};
use crate::domain::DomainError;
use crate::infrastructure::cache::MemoryCache;

/// A cache backend as seen by the read-through algorithm
#[async_trait]
pub trait CacheLayer: Send + Sync + Debug {
    /// Namespace used to build keys for this layer
    fn namespace(&self) -> CacheNamespace;

    /// Returns the cached payload, or `None` on a miss
    async fn lookup(&self, key: &str) -> Result<Option<ProductPayload>, DomainError>;

    /// Stores a payload, replacing any previous value
    async fn store(
        &self,
        key: &str,
        payload: &ProductPayload,
        options: &CacheEntryOptions,
    ) -> Result<(), DomainError>;
}

/// In-process layer holding payloads as values
#[derive(Debug, Clone)]
pub struct LocalCacheLayer {
    cache: Arc<MemoryCache<ProductPayload>>,
}

impl LocalCacheLayer {
    pub fn new(cache: Arc<MemoryCache<ProductPayload>>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheLayer for LocalCacheLayer {
    fn namespace(&self) -> CacheNamespace {
        CacheNamespace::Local
    }

    async fn lookup(&self, key: &str) -> Result<Option<ProductPayload>, DomainError> {
        self.cache.try_get(key)
    }

    async fn store(
        &self,
        key: &str,
        payload: &ProductPayload,
        options: &CacheEntryOptions,
    ) -> Result<(), DomainError> {
        self.cache.set(key, payload.clone(), options)
    }
}

/// Shared layer holding JSON-encoded payloads
#[derive(Debug, Clone)]
pub struct DistributedCacheLayer {
    cache: Arc<dyn DistributedCache>,
}

impl DistributedCacheLayer {
    pub fn new(cache: Arc<dyn DistributedCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheLayer for DistributedCacheLayer {
    fn namespace(&self) -> CacheNamespace {
        CacheNamespace::Distributed
    }

    async fn lookup(&self, key: &str) -> Result<Option<ProductPayload>, DomainError> {
        self.cache.get(key).await
    }

    async fn store(
        &self,
        key: &str,
        payload: &ProductPayload,
        options: &CacheEntryOptions,
    ) -> Result<(), DomainError> {
        self.cache.set(key, payload, options).await
    }
}

/// Cache-aside reads against the product catalog
///
/// A hit returns the cached payload. A miss fetches from the catalog, stores
/// the result with the policy of the query shape and returns it. Unknown
/// product IDs are reported as `NotFound` and never stored. Errors from the
/// layer or the catalog are returned as-is: there is no fallback, no retry
/// and no de-duplication of concurrent misses for the same key.
#[derive(Clone)]
pub struct ReadThroughCache {
    catalog: Arc<dyn ProductCatalog>,
    events: Arc<dyn CacheEventSink>,
    policies: CachePolicies,
}

impl Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("events", &self.events)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl ReadThroughCache {
    pub fn new(catalog: Arc<dyn ProductCatalog>, events: Arc<dyn CacheEventSink>) -> Self {
        Self {
            catalog,
            events,
            policies: CachePolicies::default(),
        }
    }

    pub fn with_policies(mut self, policies: CachePolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn policies(&self) -> &CachePolicies {
        &self.policies
    }

    /// Looks the query up in `layer`, populating it from the catalog on a miss
    #[instrument(skip(self, layer), fields(namespace = %layer.namespace(), query = %query))]
    pub async fn fetch(
        &self,
        layer: &dyn CacheLayer,
        query: &ProductQuery,
    ) -> Result<ProductPayload, DomainError> {
        let namespace = layer.namespace();
        let key = CacheKeyBuilder::new(namespace).build(query);

        if let Some(payload) = layer.lookup(&key).await? {
            self.events.record(CacheEvent::hit(namespace, &key));
            return Ok(payload);
        }

        self.events.record(CacheEvent::miss(namespace, &key));

        let payload = self.fetch_uncached(query).await?;
        let options = self.policies.for_shape(query.shape());

        layer.store(&key, &payload, &options).await?;
        debug!(key = %key, entries = payload.len(), "Stored catalog result");

        Ok(payload)
    }

    /// Reads straight from the catalog, bypassing every cache
    pub async fn fetch_uncached(&self, query: &ProductQuery) -> Result<ProductPayload, DomainError> {
        match query {
            ProductQuery::AllProducts => Ok(self.catalog.fetch_all().await?.into()),
            ProductQuery::ProductById(id) => self
                .catalog
                .fetch_by_id(*id)
                .await?
                .map(ProductPayload::from)
                .ok_or_else(|| DomainError::not_found(format!("Product '{}' not found", id))),
            ProductQuery::ProductsByCategory(category) => {
                Ok(self.catalog.fetch_by_category(category).await?.into())
            }
        }
    }
}
