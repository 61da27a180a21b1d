//! Observability configuration

use serde::Deserialize;

/// OpenTelemetry export settings
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    /// Export spans over OTLP
    #[serde(default)]
    pub enabled: bool,
    /// OTLP collector endpoint
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fraction of traces kept, clamped to 0.0..=1.0
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Install the recorder and expose the scrape endpoint
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Route the scrape endpoint is mounted on
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "product-cache".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tracing = TracingConfig::default();
        assert!(!tracing.enabled);
        assert_eq!(tracing.otlp_endpoint, "http://localhost:4317");
        assert_eq!(tracing.service_name, "product-cache");
        assert_eq!(tracing.sampling_ratio, 1.0);

        let metrics = MetricsConfig::default();
        assert!(metrics.enabled);
        assert_eq!(metrics.path, "/metrics");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let tracing: TracingConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(tracing.enabled);
        assert_eq!(tracing.service_name, "product-cache");

        let metrics: MetricsConfig = serde_json::from_str(r#"{"path": "/prom"}"#).unwrap();
        assert!(metrics.enabled);
        assert_eq!(metrics.path, "/prom");
    }
}
