//! Prometheus metrics

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::cache::{CacheNamespace, CacheOutcome};

pub const CACHE_HITS_TOTAL: &str = "product_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "product_cache_misses_total";

/// Handle used to render the scrape output
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Installs the global Prometheus recorder; `None` when disabled or already installed
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn describe_metrics() {
    describe_counter!(CACHE_HITS_TOTAL, "Product lookups served from a cache");
    describe_counter!(CACHE_MISSES_TOTAL, "Product lookups that went to the catalog");
    describe_counter!("http_requests_total", "HTTP requests handled");
    describe_histogram!("http_request_duration_seconds", "HTTP request latency");

    gauge!("product_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Router serving the scrape endpoint at `path`
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Records one handled HTTP request; `route` should be the matched route pattern
pub fn record_http_request(method: &str, route: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Counts a cache hit or miss against the backend that produced it
pub fn record_cache_outcome(namespace: CacheNamespace, outcome: CacheOutcome) {
    let name = match outcome {
        CacheOutcome::Hit => CACHE_HITS_TOTAL,
        CacheOutcome::Miss => CACHE_MISSES_TOTAL,
    };

    counter!(name, "backend" => namespace.as_str()).increment(1);
}
