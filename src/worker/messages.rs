//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the main plugin
//! thread and the background worker thread that handles filesystem I/O. It
//! also implements distributed tracing context propagation across thread boundaries.
//!
//! All paths in messages are host paths. The worker maps them into the sandbox.

use crate::domain::{FileEntry, PreviewContent, SortSpec};
use crate::fs::FileOperation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is always
    /// the case when tracing is disabled.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(trace_id = %trace_id, parent_span_id = %parent_span_id, "capturing trace context");

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Macro to generate builder methods for `WorkerMessage` variants.
///
/// Generates convenience constructors that automatically attach the current
/// trace context to each message variant.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    list_directory(ListDirectory { path: PathBuf, show_hidden: bool, sort: SortSpec }),
    load_preview(LoadPreview { entry: FileEntry }),
    file_operation(RunOperation { operation: FileOperation }),
}

/// Messages sent from the main thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// List `path` and its parent directory.
    ListDirectory {
        path: PathBuf,
        show_hidden: bool,
        sort: SortSpec,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Build the preview for `entry`.
    LoadPreview {
        entry: FileEntry,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Run a file operation.
    RunOperation {
        operation: FileOperation,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    pub(crate) const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::ListDirectory { trace_context, .. }
            | Self::LoadPreview { trace_context, .. }
            | Self::RunOperation { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A directory and its parent were listed.
    DirectoryLoaded {
        path: PathBuf,
        files: Vec<FileEntry>,
        /// `None` at the filesystem root.
        parent_path: Option<PathBuf>,
        parent_files: Vec<FileEntry>,
    },

    /// The requested directory could not be read.
    DirectoryFailed { path: PathBuf, message: String },

    /// Preview for the entry at `path`. Read failures arrive as an error preview.
    PreviewLoaded { path: PathBuf, preview: PreviewContent },

    /// A file operation finished successfully.
    OperationCompleted { operation: FileOperation },

    /// A file operation failed part way or entirely.
    OperationFailed { operation: FileOperation, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_omit_missing_trace_context() {
        let message = WorkerMessage::list_directory("/tmp".into(), true, SortSpec::default());
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("trace_context"));
        assert_eq!(serde_json::from_str::<WorkerMessage>(&json).unwrap(), message);
    }

    #[test]
    fn operation_responses_carry_the_operation() {
        let response = WorkerResponse::OperationFailed {
            operation: FileOperation::Delete {
                paths: vec!["/tmp/x".into()],
            },
            message: "denied".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(serde_json::from_str::<WorkerResponse>(&json).unwrap(), response);
    }
}
