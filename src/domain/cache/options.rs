//! Entry expiration options and per-shape cache policies

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::QueryShape;

/// Eviction priority under capacity pressure (local backend only)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CachePriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Expiration settings applied when an entry is stored
///
/// An entry expires at `absolute_ttl` after insertion no matter how often it
/// is read. With a sliding window, it also expires once it has gone unread
/// for longer than the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntryOptions {
    pub absolute_ttl: Duration,
    pub sliding_ttl: Option<Duration>,
    pub priority: CachePriority,
}

impl CacheEntryOptions {
    pub fn new(absolute_ttl: Duration) -> Self {
        Self {
            absolute_ttl,
            sliding_ttl: None,
            priority: CachePriority::Normal,
        }
    }

    pub fn with_sliding_ttl(mut self, sliding_ttl: Duration) -> Self {
        self.sliding_ttl = Some(sliding_ttl);
        self
    }

    pub fn with_priority(mut self, priority: CachePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Lifetime granted right after a write or a renewing read, given the
    /// time left until the absolute deadline
    pub fn renewed_lifetime(&self, until_absolute: Duration) -> Duration {
        match self.sliding_ttl {
            Some(sliding) => sliding.min(until_absolute),
            None => until_absolute,
        }
    }
}

/// Expiration policy for each query shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicies {
    pub all_products: CacheEntryOptions,
    pub product_by_id: CacheEntryOptions,
    pub products_by_category: CacheEntryOptions,
}

impl Default for CachePolicies {
    fn default() -> Self {
        Self {
            all_products: CacheEntryOptions::new(Duration::from_secs(10 * 60))
                .with_sliding_ttl(Duration::from_secs(2 * 60)),
            product_by_id: CacheEntryOptions::new(Duration::from_secs(30 * 60))
                .with_sliding_ttl(Duration::from_secs(5 * 60))
                .with_priority(CachePriority::High),
            products_by_category: CacheEntryOptions::new(Duration::from_secs(10 * 60))
                .with_sliding_ttl(Duration::from_secs(2 * 60)),
        }
    }
}

impl CachePolicies {
    pub fn for_shape(&self, shape: QueryShape) -> CacheEntryOptions {
        match shape {
            QueryShape::AllProducts => self.all_products,
            QueryShape::ProductById => self.product_by_id,
            QueryShape::ProductsByCategory => self.products_by_category,
        }
    }
}
