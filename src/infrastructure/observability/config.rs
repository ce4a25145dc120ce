//! Observability configuration (`[observability]` section)

use serde::Deserialize;

/// Tracing export and metrics settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP span export; spans are only exported when `enabled`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC collector endpoint
    pub otlp_endpoint: String,
    /// Reported as `service.name` and used as the tracer name
    pub service_name: String,
    /// Reported as `deployment.environment` when set
    pub environment: Option<String>,
    /// Fraction of traces kept; values outside 0..1 are clamped
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            environment: None,
            sampling_ratio: 1.0,
        }
    }
}

impl TracingConfig {
    /// `(key, value)` pairs describing this process to the collector
    pub fn resource_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![
            ("service.name", self.service_name.clone()),
            ("service.version", env!("CARGO_PKG_VERSION").to_string()),
        ];

        if let Some(environment) = self.environment.as_deref().filter(|e| !e.is_empty()) {
            attributes.push(("deployment.environment", environment.to_string()));
        }

        attributes
    }
}

/// Prometheus exposition
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the text exposition format
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}
