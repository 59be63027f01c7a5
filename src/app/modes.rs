//! Input mode state machine type.
//!
//! Exactly one [`Mode`] is active at a time. It decides which handling path a key
//! takes:
//!
//! - **Normal**, **Visual**, **Preview**: keys are normalized into tokens and run
//!   through the sequence matcher against the bindings registered for the mode.
//! - **Command**, **Search**, **Prompt**: keys go to the free-text line editors.
//!
//! # Example
//!
//! ```rust
//! use voy::app::Mode;
//!
//! assert!(Mode::Visual.uses_bindings());
//! assert!(Mode::Search.is_text_input());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Default navigation mode: cursor movement, file operations, git actions.
    #[default]
    Normal,

    /// Range selection anchored at the cursor position where it was entered.
    Visual,

    /// `:` command line.
    Command,

    /// `/` incremental search over file names.
    Search,

    /// Single-line prompt (rename, confirm delete, new file, commit message).
    ///
    /// Active exactly when `AppState::prompt` is set.
    Prompt,

    /// Scrolling and line selection inside the preview pane.
    Preview,
}

impl Mode {
    /// Whether keys in this mode are resolved through the binding registry.
    #[must_use]
    pub const fn uses_bindings(self) -> bool {
        matches!(self, Self::Normal | Self::Visual | Self::Preview)
    }

    /// Whether keys in this mode edit a line of text.
    #[must_use]
    pub const fn is_text_input(self) -> bool {
        matches!(self, Self::Command | Self::Search | Self::Prompt)
    }

    /// Label shown in the status bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Visual => "VISUAL",
            Self::Command => "COMMAND",
            Self::Search => "SEARCH",
            Self::Prompt => "PROMPT",
            Self::Preview => "PREVIEW",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
