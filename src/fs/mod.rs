//! Filesystem provider.
//!
//! Everything here does blocking I/O and runs on the worker thread. Functions
//! operate on whatever paths they are given; the worker is responsible for
//! translating host paths into the plugin sandbox first.
//!
//! - [`listing`]: directory listings with metadata, filtering and sorting
//! - [`preview`]: text, directory and binary previews
//! - [`operations`]: copy, move, delete, rename, mkdir, touch

pub mod listing;
pub mod operations;
pub mod preview;

pub use listing::read_directory;
pub use operations::FileOperation;
pub use preview::load_preview;
