//! View model types representing renderable UI state.
//!
//! [`ViewModel::compute`] turns an [`AppState`] into display-ready data: the
//! rows each pane shows after scrolling, per-row styling flags, the status bar
//! text and the key hints that fit the screen. The renderer only positions and
//! colors what it is given, so everything worth testing about the screen lives
//! here.
//!
//! # Example
//!
//! ```rust
//! use voy::app::AppState;
//! use voy::ui::viewmodel::{InputLine, ViewModel};
//!
//! let state = AppState::new("/tmp".into(), false, Default::default());
//! let vm = ViewModel::compute(&state, "", 24, 80);
//! assert_eq!(vm.status.position, "0/0");
//! assert_eq!(vm.input, InputLine::Empty);
//! ```

use super::layout::{preview_height, PaneWidths};
use crate::app::{AppState, Mode};
use crate::domain::{ClipboardOp, FileEntry, PreviewKind};
use std::collections::BTreeSet;

/// Complete screen contents for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub widths: PaneWidths,
    pub parent: Vec<FileRow>,
    pub current: Vec<FileRow>,
    pub preview: PreviewPane,
    pub status: StatusLine,
    pub input: InputLine,
    /// `(keys, description)` pairs that fit on the hint bar.
    pub hints: Vec<(&'static str, &'static str)>,
    /// The current pane is drawn subdued while the preview has focus.
    pub current_dimmed: bool,
}

/// How an entry name is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStyle {
    File,
    Directory,
    Symlink,
    Hidden,
}

impl EntryStyle {
    fn of(entry: &FileEntry) -> Self {
        if entry.is_symlink {
            Self::Symlink
        } else if entry.is_directory {
            Self::Directory
        } else if entry.is_hidden() {
            Self::Hidden
        } else {
            Self::File
        }
    }
}

/// One visible row of a file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    /// Name with a trailing `/` for directories and `@` for symlinks.
    pub name: String,
    pub style: EntryStyle,
    pub is_cursor: bool,
    pub is_selected: bool,
    pub is_match: bool,
    pub git: Option<char>,
    /// Size and modification time, only filled for the current pane.
    pub meta: Option<String>,
}

/// Coloring hint for a preview line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTone {
    Plain,
    Added,
    Removed,
    Hunk,
    Muted,
    Error,
}

/// One visible row of the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    /// 1-based line number, shown for scrollable content.
    pub number: Option<usize>,
    pub text: String,
    pub tone: LineTone,
    pub is_cursor: bool,
    pub is_selected: bool,
}

/// The preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPane {
    pub kind: PreviewKind,
    pub lines: Vec<PreviewLine>,
    /// Preview mode is active; the border is highlighted.
    pub focused: bool,
}

/// Contents of the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub mode: Mode,
    pub path: String,
    pub branch: Option<String>,
    /// Permissions and size of the entry under the cursor.
    pub entry_info: Option<String>,
    /// `cursor/len`, 1-based, or `0/0` for an empty listing.
    pub position: String,
    pub selected: usize,
    pub clipboard: Option<(ClipboardOp, usize)>,
    /// Keys typed so far of an unfinished sequence.
    pub pending: String,
}

impl StatusLine {
    /// Right-aligned part: position, selection count and clipboard.
    #[must_use]
    pub fn right(&self) -> String {
        let mut text = self.position.clone();
        if self.selected > 0 {
            text.push_str(&format!(" [{} selected]", self.selected));
        }
        if let Some((op, count)) = self.clipboard {
            let label = match op {
                ClipboardOp::Copy => "copy",
                ClipboardOp::Cut => "cut",
            };
            text.push_str(&format!(" [{label}: {count}]"));
        }
        text
    }
}

/// What the line above the hint bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Prompt { title: String, value: String },
    Command(String),
    Search {
        query: String,
        /// `(current, total)` with `current` 1-based.
        matches: Option<(usize, usize)>,
    },
    Error(String),
    /// Mode banner such as `-- VISUAL --`.
    Banner(String),
    Empty,
}

const NORMAL_HINTS: &[(&str, &str)] = &[
    ("j/k", "Move"),
    ("l", "Enter"),
    ("h", "Back"),
    ("P", "Preview"),
    ("v", "Visual"),
    ("Space", "Select"),
    ("yy", "Copy"),
    ("x", "Cut"),
    ("dd/D", "Delete"),
    ("pp", "Paste"),
    ("o/O", "New"),
    ("g", "Git"),
    ("~", "Home"),
    ("C-o", "Back"),
    ("/", "Search"),
    (":", "Command"),
    ("q", "Quit"),
];
const VISUAL_HINTS: &[(&str, &str)] = &[("j/k", "Extend"), ("v", "Confirm"), ("Esc", "Cancel")];
const PREVIEW_HINTS: &[(&str, &str)] = &[
    ("j/k", "Move"),
    ("v", "Visual"),
    ("Space", "Toggle"),
    ("y", "Copy"),
    ("e", "Edit"),
    ("gg/G", "Top/Bot"),
    ("Esc", "Back"),
];
const PREVIEW_VISUAL_HINTS: &[(&str, &str)] = &[
    ("j/k", "Select"),
    ("v", "Confirm"),
    ("y", "Copy"),
    ("Esc", "Cancel"),
];
const COMMAND_HINTS: &[(&str, &str)] = &[("Enter", "Execute"), ("Esc", "Cancel")];
const SEARCH_HINTS: &[(&str, &str)] = &[
    ("Enter", "Confirm"),
    ("n/N", "Next/Prev"),
    ("Esc", "Cancel"),
];
const PROMPT_HINTS: &[(&str, &str)] = &[("Enter", "Submit"), ("Esc", "Cancel")];

/// Separator between rendered hints.
pub const HINT_GAP: usize = 2;

impl ViewModel {
    /// Computes the view model for a `rows` x `cols` screen.
    #[must_use]
    pub fn compute(state: &AppState, pending_keys: &str, rows: usize, cols: usize) -> Self {
        let height = preview_height(rows);
        let no_matches = Vec::new();
        let matches = state.search.as_ref().map_or(&no_matches, |s| &s.matches);

        let parent = file_rows(state, &state.parent_files, state.parent_cursor, &BTreeSet::new(), &[], height, false);
        let current = file_rows(state, &state.files, state.cursor, &state.selected, matches, height, true);

        Self {
            widths: PaneWidths::split(cols),
            parent,
            current,
            preview: preview_pane(state, height),
            status: status_line(state, pending_keys),
            input: input_line(state),
            hints: fit_hints(hints_for(state), cols),
            current_dimmed: state.mode == Mode::Preview,
        }
    }
}

/// First visible index so that `cursor` sits near the middle of `height` rows.
#[must_use]
pub fn scroll_start(cursor: usize, len: usize, height: usize) -> usize {
    if len <= height {
        return 0;
    }
    cursor.saturating_sub(height / 2).min(len - height)
}

fn file_rows(
    state: &AppState,
    files: &[FileEntry],
    cursor: usize,
    selected: &BTreeSet<usize>,
    matches: &[usize],
    height: usize,
    with_meta: bool,
) -> Vec<FileRow> {
    let start = scroll_start(cursor, files.len(), height);

    files
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(index, entry)| {
            let suffix = if entry.is_directory {
                "/"
            } else if entry.is_symlink {
                "@"
            } else {
                ""
            };
            let meta = with_meta.then(|| {
                let size = if entry.is_directory {
                    "<DIR>".to_string()
                } else {
                    entry.size_display()
                };
                format!("{size:>6} {}", entry.modified_display())
            });

            FileRow {
                name: format!("{}{suffix}", entry.name),
                style: EntryStyle::of(entry),
                is_cursor: index == cursor,
                is_selected: selected.contains(&index),
                is_match: matches.contains(&index),
                git: state
                    .git
                    .as_ref()
                    .and_then(|git| git.status_for(entry))
                    .map(|code| code.symbol()),
                meta,
            }
        })
        .collect()
}

fn preview_pane(state: &AppState, height: usize) -> PreviewPane {
    let preview = &state.preview;
    let focused = state.mode == Mode::Preview;

    if preview.kind == PreviewKind::None {
        return PreviewPane {
            kind: preview.kind,
            lines: vec![PreviewLine {
                number: None,
                text: "No preview".to_string(),
                tone: LineTone::Muted,
                is_cursor: false,
                is_selected: false,
            }],
            focused,
        };
    }

    let numbered = preview.kind.is_scrollable();
    let start = if focused { state.preview_scroll } else { 0 };

    let lines = preview
        .content
        .split('\n')
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(index, text)| PreviewLine {
            number: numbered.then_some(index + 1),
            text: text.to_string(),
            tone: tone_for(preview.kind, text),
            is_cursor: focused && index == state.preview_cursor,
            is_selected: focused && state.preview_selected_lines.contains(&index),
        })
        .collect();

    PreviewPane {
        kind: preview.kind,
        lines,
        focused,
    }
}

fn tone_for(kind: PreviewKind, line: &str) -> LineTone {
    match kind {
        PreviewKind::Error => LineTone::Error,
        PreviewKind::Binary => LineTone::Muted,
        PreviewKind::Diff => {
            if line.starts_with("@@") {
                LineTone::Hunk
            } else if line.starts_with('+') && !line.starts_with("+++") {
                LineTone::Added
            } else if line.starts_with('-') && !line.starts_with("---") {
                LineTone::Removed
            } else {
                LineTone::Plain
            }
        }
        _ => LineTone::Plain,
    }
}

fn status_line(state: &AppState, pending_keys: &str) -> StatusLine {
    let entry = state.current_entry();
    let position = if state.files.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", state.cursor + 1, state.files.len())
    };

    StatusLine {
        mode: state.mode,
        path: state.current_path.display().to_string(),
        branch: state.git.as_ref().map(|git| git.branch.clone()),
        entry_info: entry.map(|e| {
            if e.is_directory {
                e.permissions.clone()
            } else {
                format!("{} {}", e.permissions, e.size_display())
            }
        }),
        position,
        selected: state.selected.len(),
        clipboard: state
            .clipboard
            .as_ref()
            .map(|clip| (clip.operation, clip.files.len())),
        pending: pending_keys.to_string(),
    }
}

fn input_line(state: &AppState) -> InputLine {
    match state.mode {
        Mode::Prompt => {
            if let Some(prompt) = &state.prompt {
                return InputLine::Prompt {
                    title: prompt.title.clone(),
                    value: prompt.value.clone(),
                };
            }
        }
        Mode::Command => return InputLine::Command(state.input.clone()),
        Mode::Search => {
            return InputLine::Search {
                query: state.input.clone(),
                matches: state
                    .search
                    .as_ref()
                    .filter(|s| !s.matches.is_empty())
                    .map(|s| (s.current + 1, s.matches.len())),
            };
        }
        _ => {}
    }

    if let Some(error) = &state.error {
        return InputLine::Error(error.clone());
    }

    match state.mode {
        Mode::Visual => InputLine::Banner("-- VISUAL --".to_string()),
        Mode::Preview if !state.preview_selected_lines.is_empty() => InputLine::Banner(format!(
            "-- PREVIEW VISUAL -- ({} lines)",
            state.preview_selected_lines.len()
        )),
        Mode::Preview => InputLine::Banner("-- PREVIEW --".to_string()),
        _ => InputLine::Empty,
    }
}

fn hints_for(state: &AppState) -> &'static [(&'static str, &'static str)] {
    match state.mode {
        Mode::Normal => NORMAL_HINTS,
        Mode::Visual => VISUAL_HINTS,
        Mode::Preview if state.preview_visual_anchor.is_some() => PREVIEW_VISUAL_HINTS,
        Mode::Preview => PREVIEW_HINTS,
        Mode::Command => COMMAND_HINTS,
        Mode::Search => SEARCH_HINTS,
        Mode::Prompt => PROMPT_HINTS,
    }
}

/// Keeps leading hints while `keys description` plus gaps fit in `cols`.
fn fit_hints(
    hints: &'static [(&'static str, &'static str)],
    cols: usize,
) -> Vec<(&'static str, &'static str)> {
    let mut used = 0;
    hints
        .iter()
        .take_while(|(keys, desc)| {
            let width = keys.chars().count() + 1 + desc.chars().count();
            let needed = if used == 0 { width } else { used + HINT_GAP + width };
            if needed > cols {
                return false;
            }
            used = needed;
            true
        })
        .copied()
        .collect()
}
