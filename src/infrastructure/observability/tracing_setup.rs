//! Subscriber setup: formatted logs plus optional OTLP span export

use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{RandomIdGenerator, Sampler, Tracer, TracerProvider},
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::config::TracingConfig;
use crate::config::LogFormat;
use crate::infrastructure::logging::{LoggingConfig, env_filter};

/// Installs the global subscriber
///
/// Exactly one of the JSON or pretty layers is active. When export is enabled
/// but the exporter cannot be built, logging still comes up and the failure
/// is reported once the subscriber is live.
pub fn init_tracing(logging_config: &LoggingConfig, tracing_config: &TracingConfig) {
    let json = matches!(logging_config.format, LogFormat::Json);

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });
    let pretty_layer = (!json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    let export = tracing_config.enabled.then(|| otel_tracer(tracing_config));
    let (tracer, export_error) = match export {
        Some(Ok(tracer)) => (Some(tracer), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let exporting = tracer.is_some();
    let telemetry_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    tracing_subscriber::registry()
        .with(env_filter(logging_config))
        .with(json_layer)
        .with(pretty_layer)
        .with(telemetry_layer)
        .init();

    match export_error {
        Some(e) => tracing::warn!(error = %e, "OpenTelemetry export unavailable, logging only"),
        None if exporting => tracing::info!(
            service = %tracing_config.service_name,
            endpoint = %tracing_config.otlp_endpoint,
            "Exporting spans over OTLP"
        ),
        None => tracing::info!("Tracing initialized (span export disabled)"),
    }
}

/// Builds a batch-exporting tracer and registers its provider globally so
/// [`shutdown_tracing`] can flush it
fn otel_tracer(config: &TracingConfig) -> Result<Tracer, opentelemetry::trace::TraceError> {
    let resource = Resource::new(
        config
            .resource_attributes()
            .into_iter()
            .map(|(key, value)| KeyValue::new(key, value)),
    );

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler_for(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider);

    Ok(tracer)
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

/// Flushes pending spans
pub fn shutdown_tracing() {
    global::shutdown_tracer_provider();
    tracing::info!("Tracing shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_for_ratio() {
        assert!(matches!(sampler_for(1.0), Sampler::AlwaysOn));
        assert!(matches!(sampler_for(1.5), Sampler::AlwaysOn));
        assert!(matches!(sampler_for(0.0), Sampler::AlwaysOff));
        assert!(matches!(sampler_for(-1.0), Sampler::AlwaysOff));
        assert!(matches!(sampler_for(0.5), Sampler::TraceIdRatioBased(r) if r == 0.5));
    }
}
