//! Product reads with a selectable caching strategy

use std::fmt;
use std::sync::Arc;

use super::read_through::{CacheLayer, DistributedCacheLayer, LocalCacheLayer, ReadThroughCache};
use crate::domain::cache::{DistributedCache, ProductQuery};
use crate::domain::product::{Product, ProductPayload};
use crate::domain::DomainError;
use crate::infrastructure::cache::MemoryCache;

/// Where a read is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStrategy {
    /// Straight to the catalog; the baseline for comparison
    NoCache,
    /// In-process cache
    Local,
    /// Shared cache
    Distributed,
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCache => write!(f, "no_cache"),
            Self::Local => write!(f, "local"),
            Self::Distributed => write!(f, "distributed"),
        }
    }
}

/// Service for reading products through the configured caches
#[derive(Debug, Clone)]
pub struct ProductCacheService {
    read_through: ReadThroughCache,
    local: LocalCacheLayer,
    distributed: DistributedCacheLayer,
}

impl ProductCacheService {
    pub fn new(
        read_through: ReadThroughCache,
        local: Arc<MemoryCache<ProductPayload>>,
        distributed: Arc<dyn DistributedCache>,
    ) -> Self {
        Self {
            read_through,
            local: LocalCacheLayer::new(local),
            distributed: DistributedCacheLayer::new(distributed),
        }
    }

    /// Runs a query using the given strategy
    pub async fn get(
        &self,
        strategy: CacheStrategy,
        query: &ProductQuery,
    ) -> Result<ProductPayload, DomainError> {
        match strategy {
            CacheStrategy::NoCache => self.read_through.fetch_uncached(query).await,
            CacheStrategy::Local => self.fetch_from(&self.local, query).await,
            CacheStrategy::Distributed => self.fetch_from(&self.distributed, query).await,
        }
    }

    /// All products
    pub async fn get_all(&self, strategy: CacheStrategy) -> Result<Vec<Product>, DomainError> {
        let query = ProductQuery::AllProducts;
        let payload = self.get(strategy, &query).await?;
        payload.into_list().ok_or_else(|| unexpected_shape(&query))
    }

    /// A single product; `NotFound` when the ID is unknown
    pub async fn get_by_id(&self, strategy: CacheStrategy, id: i32) -> Result<Product, DomainError> {
        let query = ProductQuery::ProductById(id);
        let payload = self.get(strategy, &query).await?;
        payload.into_single().ok_or_else(|| unexpected_shape(&query))
    }

    /// Products in a category; an unknown category yields an empty list
    pub async fn get_by_category(
        &self,
        strategy: CacheStrategy,
        category: &str,
    ) -> Result<Vec<Product>, DomainError> {
        let query = ProductQuery::ProductsByCategory(category.to_string());
        let payload = self.get(strategy, &query).await?;
        payload.into_list().ok_or_else(|| unexpected_shape(&query))
    }

    async fn fetch_from(
        &self,
        layer: &dyn CacheLayer,
        query: &ProductQuery,
    ) -> Result<ProductPayload, DomainError> {
        self.read_through.fetch(layer, query).await
    }
}

fn unexpected_shape(query: &ProductQuery) -> DomainError {
    DomainError::serialization(format!("Cached payload for {} has an unexpected shape", query))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::cache::{
        CacheEntryOptions, CacheOutcome, DistributedCacheExt, MockDistributedCache,
        RecordingEventSink,
    };
    use crate::domain::product::InMemoryProductCatalog;
    use crate::infrastructure::cache::InMemoryDistributedCache;

    struct Fixture {
        service: ProductCacheService,
        catalog: Arc<InMemoryProductCatalog>,
        sink: Arc<RecordingEventSink>,
    }

    fn fixture_with(distributed: Arc<dyn DistributedCache>) -> Fixture {
        let catalog = Arc::new(InMemoryProductCatalog::seeded());
        let sink = Arc::new(RecordingEventSink::new());
        let read_through = ReadThroughCache::new(catalog.clone(), sink.clone());
        let service =
            ProductCacheService::new(read_through, Arc::new(MemoryCache::new()), distributed);

        Fixture {
            service,
            catalog,
            sink,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemoryDistributedCache::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_product_by_id_scenario() {
        let f = fixture();

        let first = f.service.get_by_id(CacheStrategy::Local, 1).await.unwrap();
        let second = f.service.get_by_id(CacheStrategy::Local, 1).await.unwrap();

        assert_eq!(first, Product::new(1, "Laptop", 1200.0, "Electronics"));
        assert_eq!(second, first);
        assert_eq!(f.catalog.fetch_count(), 1);
        assert_eq!(
            f.sink.outcomes(),
            vec![
                ("local:Product:1".to_string(), CacheOutcome::Miss),
                ("local:Product:1".to_string(), CacheOutcome::Hit),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_distributed_all_products_after_pause_scenario() {
        let f = fixture();

        let first = f.service.get_all(CacheStrategy::Distributed).await.unwrap();
        tokio::time::advance(Duration::from_secs(15 * 60)).await;
        let second = f.service.get_all(CacheStrategy::Distributed).await.unwrap();

        assert_eq!(first.len(), 7);
        assert_eq!(second, first);
        assert_eq!(f.catalog.fetch_count(), 2);
        assert_eq!(
            f.sink.outcomes(),
            vec![
                ("distributed:AllProducts".to_string(), CacheOutcome::Miss),
                ("distributed:AllProducts".to_string(), CacheOutcome::Miss),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_product_scenario() {
        let f = fixture();

        for _ in 0..2 {
            let result = f.service.get_by_id(CacheStrategy::Local, 999).await;
            assert!(matches!(result, Err(DomainError::NotFound { .. })));
        }

        assert_eq!(f.catalog.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_cache_always_reads_catalog() {
        let f = fixture();

        f.service.get_all(CacheStrategy::NoCache).await.unwrap();
        f.service.get_all(CacheStrategy::NoCache).await.unwrap();

        assert_eq!(f.catalog.fetch_count(), 2);
        assert!(f.sink.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_distributed_hit_skips_catalog_latency() {
        let f = fixture();

        f.service.get_all(CacheStrategy::Distributed).await.unwrap();

        let start = tokio::time::Instant::now();
        f.service.get_all(CacheStrategy::Distributed).await.unwrap();

        assert!(start.elapsed() < Duration::from_millis(1000));
        assert_eq!(f.catalog.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_by_category() {
        let f = fixture();

        let clothing = f
            .service
            .get_by_category(CacheStrategy::Local, "Clothing")
            .await
            .unwrap();
        let again = f
            .service
            .get_by_category(CacheStrategy::Local, "Clothing")
            .await
            .unwrap();

        assert_eq!(clothing.len(), 2);
        assert_eq!(again, clothing);
        assert_eq!(f.catalog.fetch_count(), 1);

        let unknown = f
            .service
            .get_by_category(CacheStrategy::Distributed, "Garden")
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatched_payload_shape_is_an_error() {
        let backend = Arc::new(MockDistributedCache::new());
        let options = CacheEntryOptions::new(Duration::from_secs(60));
        backend
            .set(
                "distributed:AllProducts",
                &ProductPayload::Single(Product::new(1, "Laptop", 1200.0, "Electronics")),
                &options,
            )
            .await
            .unwrap();

        let f = fixture_with(backend);
        let result = f.service.get_all(CacheStrategy::Distributed).await;

        assert!(matches!(result, Err(DomainError::Serialization { .. })));
        assert_eq!(f.catalog.fetch_count(), 0);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(CacheStrategy::NoCache.to_string(), "no_cache");
        assert_eq!(CacheStrategy::Local.to_string(), "local");
        assert_eq!(CacheStrategy::Distributed.to_string(), "distributed");
    }
}
