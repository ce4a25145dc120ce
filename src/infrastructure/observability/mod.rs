//! Observability infrastructure - Tracing and Metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{PrometheusMetrics, create_metrics_router, init_metrics, record_http_request};
pub use tracing_setup::{init_tracing, shutdown_tracing};
