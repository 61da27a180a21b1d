//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod product;

pub use cache::{
    CacheEntryOptions, CacheEvent, CacheEventSink, CacheKeyBuilder, CacheNamespace, CacheOutcome,
    CachePolicies, CachePriority, DistributedCache, DistributedCacheExt, ProductQuery, QueryShape,
    RecordingEventSink,
};
pub use error::DomainError;
pub use product::{
    default_products, CatalogLatency, InMemoryProductCatalog, Product, ProductCatalog,
    ProductPayload,
};
