//! Default cache event sink

use tracing::info;

use super::metrics::record_cache_outcome;
use crate::domain::cache::{CacheEvent, CacheEventSink};

/// Writes each lookup as a structured log line and bumps the hit/miss counters
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl CacheEventSink for TracingEventSink {
    fn record(&self, event: CacheEvent) {
        info!(
            target: "product_cache::events",
            timestamp = %event.timestamp.to_rfc3339(),
            backend = %event.namespace,
            key = %event.key,
            outcome = %event.outcome,
            "Cache {}",
            event.outcome
        );

        record_cache_outcome(event.namespace, event.outcome);
    }
}
