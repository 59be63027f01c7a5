//! Side effects the session asks the plugin runtime to perform.
//!
//! The session never calls Zellij directly. Each handled event returns a list of
//! [`Effect`]s that the plugin shim (main.rs) executes in order, which keeps the
//! whole engine testable off-host.

use crate::git::CommandRequest;
use crate::keymap::TimerId;
use crate::worker::WorkerMessage;
use std::path::PathBuf;
use std::time::Duration;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Closes the plugin pane.
    Exit,

    /// Posts a message to the filesystem worker thread.
    PostToWorker(WorkerMessage),

    /// Starts the key sequence disambiguation timer.
    ///
    /// Timers cannot be canceled; the session ignores fires that no longer
    /// match the pending sequence.
    ArmTimer {
        id: TimerId,
        after: Duration,
    },

    /// Runs an external command; the result comes back as a command event.
    RunCommand(CommandRequest),

    /// Opens a file for editing, at a 1-based line when given.
    ///
    /// With no configured `editor` the host's default editor is used.
    OpenEditor {
        path: PathBuf,
        line: Option<usize>,
        editor: Option<String>,
    },
}
