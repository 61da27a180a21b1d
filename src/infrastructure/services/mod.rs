//! Infrastructure services

mod product_cache_service;
mod read_through;

pub use product_cache_service::{CacheStrategy, ProductCacheService};
pub use read_through::{CacheLayer, DistributedCacheLayer, LocalCacheLayer, ReadThroughCache};
