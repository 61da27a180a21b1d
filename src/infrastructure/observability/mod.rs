//! Observability infrastructure - Tracing, metrics and cache events

mod cache_events;
mod config;
mod metrics;
mod tracing_setup;

pub use cache_events::TracingEventSink;
pub use self::config::{MetricsConfig, TracingConfig};
pub use self::metrics::{
    create_metrics_router, init_metrics, record_cache_outcome, record_http_request,
    PrometheusMetrics, CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
