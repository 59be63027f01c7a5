//! Domain layer for the voy plugin.
//!
//! Core types shared by the engine, the worker and the renderer, independent of
//! Zellij APIs.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`entry`]: File entries, preview content, clipboard and sort specs
//!
//! # Examples
//!
//! ```
//! use voy::domain::{PreviewContent, PreviewKind};
//!
//! let preview = PreviewContent::new(PreviewKind::Text, "fn main() {}\n");
//! assert_eq!(preview.line_count(), 2);
//! ```

pub mod entry;
pub mod error;

pub use entry::{
    ClipboardEntry, ClipboardOp, FileEntry, PreviewContent, PreviewKind, SortField, SortOrder,
    SortSpec,
};
pub use error::{Result, VoyError};
