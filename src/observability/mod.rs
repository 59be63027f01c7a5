//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → /data/voy-otlp.json
//! ```
//!
//! The plugin and its worker each install the subscriber once. Worker spans
//! are linked to the plugin span that posted the message through the
//! [`TraceContext`](crate::worker::TraceContext) carried in every request, so a
//! key press and the listing it caused show up in one trace.
//!
//! The trace file rotates at 10 MB and keeps three numbered backups. The
//! level comes from the `trace_level` plugin option and defaults to `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with file export
//! - [`span_formatter`]: OTLP JSON span serialization
//! - [`file_writer`]: Rotating file writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, trace_file_path, DEFAULT_TRACE_LEVEL};

/// `service.name` resource attribute and instrumentation scope name.
pub const SERVICE_NAME: &str = "voy";

/// File name of the live trace file.
pub const TRACE_FILE_NAME: &str = "voy-otlp.json";
