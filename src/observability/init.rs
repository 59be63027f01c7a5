//! Tracing subscriber setup.

use super::{tracer, SERVICE_NAME, TRACE_FILE_NAME};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when `trace_level` is unset or not a valid filter directive.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Where spans are written, inside the plugin's `/data` directory.
#[must_use]
pub fn trace_file_path() -> PathBuf {
    crate::infrastructure::get_data_dir().join(TRACE_FILE_NAME)
}

/// Installs the global subscriber: an [`EnvFilter`] built from
/// `config.trace_level` feeding an OpenTelemetry layer with file export.
///
/// Observability is optional. If the data directory cannot be created, or a
/// subscriber is already installed, this does nothing.
///
/// ```rust,no_run
/// use voy::observability::init_tracing;
/// use voy::Config;
///
/// init_tracing(&Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// });
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let trace_file = trace_file_path();
    if let Some(dir) = trace_file.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return;
        }
    }

    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(env_filter(config.trace_level.as_deref()))
        .with(otel_layer)
        .try_init();
}

fn env_filter(level: Option<&str>) -> EnvFilter {
    level
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_TRACE_LEVEL))
}
