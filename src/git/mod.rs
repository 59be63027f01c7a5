//! Git and GitHub provider.
//!
//! - [`commands`]: command builders, the command context round-trip and
//!   interpretation of finished commands
//! - [`status`]: porcelain status parsing and display markers

pub mod commands;
pub mod status;

pub use commands::{CommandKind, CommandOutput, CommandRequest, GitOutcome, GitRequest};
pub use status::{GitFileStatus, GitInfo, GitStatusCode};
