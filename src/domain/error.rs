//! Error types for the voy plugin.
//!
//! This module defines the centralized error type [`VoyError`] and a type alias
//! [`Result`] used by the fallible layers of the crate (filesystem provider
//! and theme loading). The modal engine itself never returns errors: failures
//! reaching it are turned into a status message on the application state.

use thiserror::Error;

/// The main error type for voy operations.
///
/// Most variants carry a human-readable description. I/O failures wrap the
/// underlying `std::io::Error` via `#[from]` so `?` works inside the filesystem
/// provider.
///
/// # Examples
///
/// ```
/// use voy::domain::VoyError;
///
/// fn rename_target(exists: bool) -> Result<(), VoyError> {
///     if exists {
///         return Err(VoyError::Operation("b.txt already exists".to_string()));
///     }
///     Ok(())
/// }
/// assert_eq!(rename_target(true).unwrap_err().to_string(), "b.txt already exists");
/// ```
#[derive(Debug, Error)]
pub enum VoyError {
    /// Filesystem or I/O operation failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// A file operation could not be carried out for a reason other than I/O,
    /// e.g. a rename target that already exists.
    #[error("{0}")]
    Operation(String),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),
}

/// A specialized `Result` type for voy operations.
pub type Result<T> = std::result::Result<T, VoyError>;
