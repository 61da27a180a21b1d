//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::cache::DistributedCache;
use crate::domain::product::ProductPayload;
use crate::infrastructure::cache::MemoryCache;
use crate::infrastructure::services::ProductCacheService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub product_service: Arc<ProductCacheService>,
    pub local_cache: Arc<MemoryCache<ProductPayload>>,
    pub distributed_cache: Arc<dyn DistributedCache>,
}

impl AppState {
    pub fn new(
        product_service: Arc<ProductCacheService>,
        local_cache: Arc<MemoryCache<ProductPayload>>,
        distributed_cache: Arc<dyn DistributedCache>,
    ) -> Self {
        Self {
            product_service,
            local_cache,
            distributed_cache,
        }
    }
}
