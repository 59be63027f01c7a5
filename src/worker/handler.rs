//! Worker thread implementation for filesystem I/O.
//!
//! This module implements the Zellij worker thread interface. Listings,
//! previews and file operations run here so the plugin's render loop never
//! blocks on the disk. Host paths from messages are mapped into the sandbox
//! before use and mapped back in every response.

use crate::domain::{FileEntry, PreviewContent, SortSpec};
use crate::fs::{self, FileOperation};
use crate::infrastructure::{to_host, to_sandbox};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker thread state. The worker keeps nothing between messages.
#[derive(Serialize, Deserialize, Default)]
pub struct FsWorker;

impl FsWorker {
    fn handle_list_directory(path: PathBuf, show_hidden: bool, sort: SortSpec) -> WorkerResponse {
        let files = match fs::read_directory(&to_sandbox(&path), show_hidden, sort) {
            Ok(files) => host_entries(files),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "failed to list directory");
                return WorkerResponse::DirectoryFailed {
                    path,
                    message: e.to_string(),
                };
            }
        };

        let parent_path = path.parent().map(Path::to_path_buf);
        let parent_files = parent_path.as_ref().map_or_else(Vec::new, |parent| {
            fs::read_directory(&to_sandbox(parent), show_hidden, sort)
                .map(host_entries)
                .unwrap_or_else(|e| {
                    tracing::debug!(path = %parent.display(), error = %e, "failed to list parent directory");
                    Vec::new()
                })
        });

        tracing::debug!(
            path = %path.display(),
            file_count = files.len(),
            parent_count = parent_files.len(),
            "directory listed"
        );

        WorkerResponse::DirectoryLoaded {
            path,
            files,
            parent_path,
            parent_files,
        }
    }

    fn handle_load_preview(entry: FileEntry) -> WorkerResponse {
        let path = entry.path.clone();
        let sandboxed = FileEntry {
            path: to_sandbox(&entry.path),
            ..entry
        };

        let preview = fs::load_preview(&sandboxed);
        tracing::debug!(path = %path.display(), kind = ?preview.kind, "preview loaded");

        WorkerResponse::PreviewLoaded {
            path,
            preview: PreviewContent {
                entries: host_entries(preview.entries),
                ..preview
            },
        }
    }

    fn handle_operation(operation: FileOperation) -> WorkerResponse {
        let result = operation.clone().map_paths(to_sandbox).execute();
        match result {
            Ok(()) => {
                tracing::debug!(operation = ?operation, "file operation completed");
                WorkerResponse::OperationCompleted { operation }
            }
            Err(e) => {
                tracing::debug!(operation = ?operation, error = %e, "file operation failed");
                WorkerResponse::OperationFailed {
                    operation,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// This function reconstructs the OpenTelemetry context from the serialized
    /// trace information in the message, allowing spans created in the worker
    /// thread to be linked to their parent spans in the main thread.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response to post back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::ListDirectory {
                path,
                show_hidden,
                sort,
                ..
            } => Self::handle_list_directory(path, show_hidden, sort),
            WorkerMessage::LoadPreview { entry, .. } => Self::handle_load_preview(entry),
            WorkerMessage::RunOperation { operation, .. } => Self::handle_operation(operation),
        }
    }
}

fn host_entries(entries: Vec<FileEntry>) -> Vec<FileEntry> {
    entries
        .into_iter()
        .map(|entry| FileEntry {
            path: to_host(&entry.path),
            ..entry
        })
        .collect()
}

/// Tracks whether worker tracing has been initialized.
///
/// Used to ensure tracing is only set up once per worker thread lifetime.
static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for FsWorker {
    /// Handles incoming messages from the main plugin thread.
    ///
    /// Initializes tracing on the first message, deserializes the payload,
    /// processes it and posts the serialized response back under the same
    /// message name.
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            crate::observability::init_tracing(&crate::Config::default());
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            }),
            Err(e) => tracing::debug!(error = %e, "failed to serialize worker response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_operations_keep_the_host_paths() {
        let operation = FileOperation::Rename {
            path: PathBuf::from("/definitely/not/here.txt"),
            new_name: "x.txt".to_string(),
        };
        match FsWorker.handle_message(WorkerMessage::file_operation(operation.clone())) {
            WorkerResponse::OperationFailed { operation: failed, .. } => assert_eq!(failed, operation),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn unreadable_directory_reports_failure() {
        let message = WorkerMessage::list_directory("/definitely/not/here".into(), false, SortSpec::default());
        assert!(matches!(
            FsWorker.handle_message(message),
            WorkerResponse::DirectoryFailed { .. }
        ));
    }

    #[test]
    fn host_entries_strip_the_mount() {
        let entry = FileEntry {
            name: "a".into(),
            path: PathBuf::from("/host/home/me/a"),
            is_directory: false,
            is_symlink: false,
            size: 0,
            modified: 0,
            permissions: String::new(),
        };
        assert_eq!(host_entries(vec![entry])[0].path, PathBuf::from("/home/me/a"));
    }
}
