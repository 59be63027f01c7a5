//! Background worker thread for filesystem I/O.
//!
//! This module implements the worker thread that handles all disk access to avoid
//! blocking the main plugin UI thread. It uses Zellij's worker API for cross-thread
//! communication and includes distributed tracing support for observability.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::FsWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
