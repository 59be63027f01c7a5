//! Application state: the single source of truth for the UI.
//!
//! [`AppState`] is plain data. It is only ever replaced through
//! [`reduce`](crate::app::reducer::reduce), and the renderer reads it without
//! mutating it. Anything that needs I/O (listings, previews, git status) arrives
//! here as the payload of a reducer action.
//!
//! # Invariants
//!
//! - `cursor < files.len()` when `files` is non-empty, otherwise `0`
//! - `preview_scroll <= preview_cursor < preview_scroll + height` after any
//!   preview cursor action with viewport `height`
//! - `mode == Mode::Prompt` exactly when `prompt.is_some()`
//! - outside preview mode `preview_scroll == 0` and no preview lines are selected
//!
//! # Example
//!
//! ```rust
//! use voy::app::AppState;
//! use voy::domain::SortSpec;
//!
//! let state = AppState::new("/tmp".into(), false, SortSpec::default());
//! assert_eq!(state.cursor, 0);
//! assert!(state.current_entry().is_none());
//! ```

use super::modes::Mode;
use crate::domain::{ClipboardEntry, FileEntry, PreviewContent, SortSpec};
use crate::git::GitInfo;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Incremental search results over the current listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: String,
    /// Indices into `AppState::files`, in listing order.
    pub matches: Vec<usize>,
    /// Position in `matches` of the match the cursor was last moved to.
    pub current: usize,
}

impl SearchState {
    /// Case-insensitive substring search over file names.
    #[must_use]
    pub fn compute(query: &str, files: &[FileEntry]) -> Self {
        let needle = query.to_lowercase();
        let matches = files
            .iter()
            .enumerate()
            .filter(|(_, file)| file.name.to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect();

        Self {
            query: query.to_string(),
            matches,
            current: 0,
        }
    }
}

/// What happens with a prompt's value on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSubmit {
    /// Delete `files` when the answer is `y` or `Y`.
    ConfirmDelete { files: Vec<FileEntry> },
    /// Rename `entry` to the submitted name.
    Rename { entry: FileEntry },
    /// Create an empty file in the current directory.
    NewFile,
    /// Create a directory (with parents) in the current directory.
    NewDirectory,
    /// `git commit -m <value>` in the current directory.
    Commit,
}

/// An active single-line prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub title: String,
    pub value: String,
    pub on_submit: PromptSubmit,
}

impl PromptState {
    #[must_use]
    pub fn new(title: impl Into<String>, value: impl Into<String>, on_submit: PromptSubmit) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            on_submit,
        }
    }
}

/// Central application state container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Directory shown in the middle pane (host path).
    pub current_path: PathBuf,
    pub parent_path: PathBuf,
    pub files: Vec<FileEntry>,
    pub parent_files: Vec<FileEntry>,
    pub cursor: usize,
    /// Row of the current directory inside the parent listing.
    pub parent_cursor: usize,
    pub mode: Mode,
    pub clipboard: Option<ClipboardEntry>,
    /// Multi-selected indices into `files`.
    pub selected: BTreeSet<usize>,
    pub preview: PreviewContent,
    pub preview_cursor: usize,
    pub preview_scroll: usize,
    pub preview_selected_lines: BTreeSet<usize>,
    /// Start of a pending line range in preview mode.
    pub preview_visual_anchor: Option<usize>,
    /// Text typed in command or search mode.
    pub input: String,
    pub search: Option<SearchState>,
    pub prompt: Option<PromptState>,
    /// Last error or status message, cleared by the next key.
    pub error: Option<String>,
    pub sort: SortSpec,
    pub show_hidden: bool,
    /// Cursor position visual mode was entered at.
    pub visual_anchor: usize,
    /// Previously visited directories, most recent last.
    pub history: Vec<PathBuf>,
    /// Repository info for `current_path`, `None` outside a repository.
    pub git: Option<GitInfo>,
}

impl AppState {
    /// Creates the startup state: cursor 0, normal mode, nothing loaded yet.
    #[must_use]
    pub fn new(current_path: PathBuf, show_hidden: bool, sort: SortSpec) -> Self {
        Self {
            current_path,
            show_hidden,
            sort,
            ..Self::default()
        }
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.files.get(self.cursor)
    }

    /// Multi-selected entries in listing order, or the entry under the cursor
    /// when nothing is selected.
    #[must_use]
    pub fn targets(&self) -> Vec<FileEntry> {
        if self.selected.is_empty() {
            return self.current_entry().cloned().into_iter().collect();
        }
        self.selected
            .iter()
            .filter_map(|&index| self.files.get(index))
            .cloned()
            .collect()
    }

    /// Number of lines in the preview content.
    #[must_use]
    pub fn preview_line_count(&self) -> usize {
        self.preview.line_count()
    }

    /// Selected preview lines joined with newlines, or the cursor line when no
    /// line is selected. Returns the text and how many lines it holds.
    #[must_use]
    pub fn preview_selection_text(&self) -> (String, usize) {
        let lines: Vec<&str> = self.preview.content.split('\n').collect();
        if self.preview_selected_lines.is_empty() {
            let line = lines.get(self.preview_cursor).copied().unwrap_or_default();
            return (line.to_string(), 1);
        }

        let text = self
            .preview_selected_lines
            .iter()
            .map(|&i| lines.get(i).copied().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
        (text, self.preview_selected_lines.len())
    }
}
