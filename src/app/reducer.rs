//! Pure state transition function.
//!
//! [`reduce`] takes the state by value and returns the next one. It never
//! panics and never performs I/O: out-of-range indices are clamped, and
//! requests to load listings or previews are the caller's job.

use super::modes::Mode;
use super::state::{AppState, PromptState, SearchState};
use crate::domain::{ClipboardEntry, FileEntry, PreviewContent, SortSpec};
use crate::git::GitInfo;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Upper bound on remembered directories.
pub const HISTORY_LIMIT: usize = 100;

/// State transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Changes directory; resets cursor, selection, search and error.
    SetPath(PathBuf),
    /// Replaces the current listing, clamping the cursor.
    SetFiles(Vec<FileEntry>),
    SetParentFiles(Vec<FileEntry>),
    SetParentPath(PathBuf),
    MoveCursor { delta: isize },
    SetCursor { index: usize },
    SetParentCursor { index: usize },
    SetMode(Mode),
    ToggleSelection { index: usize },
    /// Adds the inclusive range between `from` and `to`, in either order.
    SelectRange { from: usize, to: usize },
    ClearSelection,
    SetClipboard(ClipboardEntry),
    ClearClipboard,
    /// Replaces the preview and resets its cursor, scroll and line selection.
    SetPreview(PreviewContent),
    SetCommandInput(String),
    SetSearch(Option<SearchState>),
    /// `Some` enters prompt mode, `None` returns to normal mode.
    SetPrompt(Option<PromptState>),
    SetError(Option<String>),
    ToggleHidden,
    SetVisualAnchor { index: usize },
    SetPreviewVisualAnchor(Option<usize>),
    MovePreviewCursor { delta: isize, height: usize },
    SetPreviewCursor { index: usize, height: usize },
    TogglePreviewLineSelection { line: usize },
    SelectPreviewLineRange { from: usize, to: usize },
    ClearPreviewSelection,
    SetSort(SortSpec),
    /// Remembers a directory for `C-o`.
    PushHistory(PathBuf),
    /// Forgets the most recent history entry.
    PopHistory,
    SetGitInfo(Option<GitInfo>),
}

/// Applies `action` to `state`.
///
/// # Example
///
/// ```rust
/// use voy::app::{reduce, Action, AppState};
///
/// let state = reduce(AppState::default(), Action::MoveCursor { delta: 5 });
/// assert_eq!(state.cursor, 0);
/// ```
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetPath(path) => {
            state.current_path = path;
            state.cursor = 0;
            state.selected.clear();
            state.search = None;
            state.error = None;
        }
        Action::SetFiles(files) => {
            state.files = files;
            state.cursor = clamp_index(state.cursor, state.files.len());
        }
        Action::SetParentFiles(files) => {
            state.parent_files = files;
            state.parent_cursor = clamp_index(state.parent_cursor, state.parent_files.len());
        }
        Action::SetParentPath(path) => state.parent_path = path,
        Action::MoveCursor { delta } => {
            state.cursor = offset_index(state.cursor, delta, state.files.len());
        }
        Action::SetCursor { index } => {
            state.cursor = clamp_index(index, state.files.len());
        }
        Action::SetParentCursor { index } => {
            state.parent_cursor = clamp_index(index, state.parent_files.len());
        }
        // Prompt mode is only reachable through `SetPrompt`.
        Action::SetMode(Mode::Prompt) if state.prompt.is_none() => {}
        Action::SetMode(mode) => {
            if mode != Mode::Prompt {
                state.prompt = None;
            }
            enter_mode(&mut state, mode);
        }
        Action::ToggleSelection { index } => toggle(&mut state.selected, index),
        Action::SelectRange { from, to } => select_range(&mut state.selected, from, to),
        Action::ClearSelection => state.selected.clear(),
        Action::SetClipboard(entry) => state.clipboard = Some(entry),
        Action::ClearClipboard => state.clipboard = None,
        Action::SetPreview(preview) => {
            state.preview = preview;
            state.preview_cursor = 0;
            state.preview_scroll = 0;
            state.preview_selected_lines.clear();
            state.preview_visual_anchor = None;
        }
        Action::SetCommandInput(input) => state.input = input,
        Action::SetSearch(search) => state.search = search,
        Action::SetPrompt(prompt) => {
            let mode = if prompt.is_some() { Mode::Prompt } else { Mode::Normal };
            enter_mode(&mut state, mode);
            state.prompt = prompt;
        }
        Action::SetError(error) => state.error = error,
        Action::ToggleHidden => state.show_hidden = !state.show_hidden,
        Action::SetVisualAnchor { index } => state.visual_anchor = index,
        Action::SetPreviewVisualAnchor(anchor) => state.preview_visual_anchor = anchor,
        Action::MovePreviewCursor { delta, height } => {
            let cursor = offset_index(state.preview_cursor, delta, state.preview_line_count());
            place_preview_cursor(&mut state, cursor, height);
        }
        Action::SetPreviewCursor { index, height } => {
            let cursor = clamp_index(index, state.preview_line_count());
            place_preview_cursor(&mut state, cursor, height);
        }
        Action::TogglePreviewLineSelection { line } => {
            toggle(&mut state.preview_selected_lines, line);
        }
        Action::SelectPreviewLineRange { from, to } => {
            select_range(&mut state.preview_selected_lines, from, to);
        }
        Action::ClearPreviewSelection => state.preview_selected_lines.clear(),
        Action::SetSort(sort) => state.sort = sort,
        Action::PushHistory(path) => {
            if state.history.last() != Some(&path) {
                state.history.push(path);
            }
            if state.history.len() > HISTORY_LIMIT {
                let excess = state.history.len() - HISTORY_LIMIT;
                state.history.drain(..excess);
            }
        }
        Action::PopHistory => {
            state.history.pop();
        }
        Action::SetGitInfo(info) => state.git = info,
    }
    state
}

/// Switches mode, clearing the input when entering command or search and the
/// preview position when leaving preview.
fn enter_mode(state: &mut AppState, mode: Mode) {
    if matches!(mode, Mode::Command | Mode::Search) {
        state.input.clear();
    }
    if state.mode == Mode::Preview && mode != Mode::Preview {
        state.preview_scroll = 0;
        state.preview_selected_lines.clear();
        state.preview_visual_anchor = None;
    }
    state.mode = mode;
}

/// Clamps `index` into `[0, len - 1]`, or `0` when `len == 0`.
const fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if index >= len {
        len - 1
    } else {
        index
    }
}

fn offset_index(index: usize, delta: isize, len: usize) -> usize {
    clamp_index(index.saturating_add_signed(delta), len)
}

/// Moves the preview cursor and scrolls the minimum needed to keep it inside
/// `[scroll, scroll + height)`.
fn place_preview_cursor(state: &mut AppState, cursor: usize, height: usize) {
    let height = height.max(1);
    state.preview_cursor = cursor;
    if cursor < state.preview_scroll {
        state.preview_scroll = cursor;
    } else if cursor >= state.preview_scroll + height {
        state.preview_scroll = cursor + 1 - height;
    }
}

fn toggle(set: &mut BTreeSet<usize>, index: usize) {
    if !set.remove(&index) {
        set.insert(index);
    }
}

fn select_range(set: &mut BTreeSet<usize>, from: usize, to: usize) {
    set.extend(from.min(to)..=from.max(to));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::PromptSubmit;
    use crate::domain::{ClipboardOp, PreviewKind};

    fn file(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: PathBuf::from("/w").join(name),
            is_directory: false,
            is_symlink: false,
            size: 0,
            modified: 0,
            permissions: "rw-r--r--".to_string(),
        }
    }

    fn with_files(count: usize) -> AppState {
        let files = (0..count).map(|i| file(&format!("f{i}"))).collect();
        reduce(AppState::default(), Action::SetFiles(files))
    }

    fn with_preview(lines: usize) -> AppState {
        let content = (0..lines).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let state = reduce(AppState::default(), Action::SetPreview(PreviewContent::new(PreviewKind::Text, content)));
        reduce(state, Action::SetMode(Mode::Preview))
    }

    #[test]
    fn set_files_clamps_cursor() {
        let mut state = with_files(10);
        state.cursor = 5;
        let state = reduce(state, Action::SetFiles(vec![file("a"), file("b")]));
        assert_eq!(state.cursor, 1);

        let state = reduce(state, Action::SetFiles(vec![]));
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn cursor_moves_clamp_both_ends() {
        let state = with_files(3);
        let state = reduce(state, Action::MoveCursor { delta: -4 });
        assert_eq!(state.cursor, 0);
        let state = reduce(state, Action::MoveCursor { delta: isize::MAX });
        assert_eq!(state.cursor, 2);
        let state = reduce(state, Action::SetCursor { index: usize::MAX });
        assert_eq!(state.cursor, 2);
        let state = reduce(AppState::default(), Action::SetCursor { index: 7 });
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn set_path_resets_navigation_state() {
        let mut state = with_files(4);
        state.cursor = 3;
        state.selected.insert(1);
        state.search = Some(SearchState::default());
        state.error = Some("boom".to_string());
        let state = reduce(state, Action::SetPath("/elsewhere".into()));
        assert_eq!(state.current_path, PathBuf::from("/elsewhere"));
        assert_eq!(state.cursor, 0);
        assert!(state.selected.is_empty());
        assert!(state.search.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn select_range_is_order_independent() {
        let mut base = AppState::default();
        base.selected.insert(9);
        let forward = reduce(base.clone(), Action::SelectRange { from: 2, to: 5 });
        let backward = reduce(base, Action::SelectRange { from: 5, to: 2 });
        assert_eq!(forward.selected, backward.selected);
        assert_eq!(forward.selected.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 9]);
    }

    #[test]
    fn toggling_twice_restores_selection() {
        let state = AppState::default();
        let once = reduce(state.clone(), Action::ToggleSelection { index: 2 });
        assert!(once.selected.contains(&2));
        let twice = reduce(once, Action::ToggleSelection { index: 2 });
        assert_eq!(twice.selected, state.selected);
    }

    #[test]
    fn prompt_drives_mode() {
        let prompt = PromptState::new("New file:", "", PromptSubmit::NewFile);
        let state = reduce(AppState::default(), Action::SetPrompt(Some(prompt)));
        assert_eq!(state.mode, Mode::Prompt);
        let state = reduce(state, Action::SetPrompt(None));
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn entering_text_modes_clears_input() {
        let mut state = AppState::default();
        state.input = "stale".to_string();
        let state = reduce(state, Action::SetMode(Mode::Visual));
        assert_eq!(state.input, "stale");
        let state = reduce(state, Action::SetMode(Mode::Search));
        assert!(state.input.is_empty());
    }

    #[test]
    fn leaving_preview_resets_scroll_and_lines() {
        let state = with_preview(50);
        let state = reduce(state, Action::SetPreviewCursor { index: 40, height: 10 });
        let state = reduce(state, Action::TogglePreviewLineSelection { line: 40 });
        let state = reduce(state, Action::SetPreviewVisualAnchor(Some(40)));

        let same = reduce(state.clone(), Action::SetMode(Mode::Preview));
        assert_eq!(same.preview_scroll, state.preview_scroll);
        assert_eq!(same.preview_selected_lines, state.preview_selected_lines);

        let left = reduce(state, Action::SetMode(Mode::Normal));
        assert_eq!(left.preview_scroll, 0);
        assert!(left.preview_selected_lines.is_empty());
        assert!(left.preview_visual_anchor.is_none());
    }

    #[test]
    fn opening_a_prompt_from_preview_resets_scroll_and_lines() {
        let state = with_preview(50);
        let state = reduce(state, Action::SetPreviewCursor { index: 40, height: 10 });
        let state = reduce(state, Action::TogglePreviewLineSelection { line: 40 });
        let state = reduce(state, Action::SetPreviewVisualAnchor(Some(40)));

        let prompt = PromptState::new("Commit message:", "", PromptSubmit::Commit);
        let state = reduce(state, Action::SetPrompt(Some(prompt)));
        assert_eq!(state.mode, Mode::Prompt);
        assert_eq!(state.preview_scroll, 0);
        assert!(state.preview_selected_lines.is_empty());
        assert!(state.preview_visual_anchor.is_none());
    }

    #[test]
    fn closing_a_prompt_from_preview_resets_scroll() {
        let mut state = with_preview(50);
        state = reduce(state, Action::SetPreviewCursor { index: 40, height: 10 });
        state.prompt = Some(PromptState::new("New file:", "", PromptSubmit::NewFile));

        let state = reduce(state, Action::SetPrompt(None));
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.preview_scroll, 0);
    }

    #[test]
    fn prompt_mode_requires_a_prompt() {
        let state = reduce(AppState::default(), Action::SetMode(Mode::Prompt));
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn leaving_prompt_mode_drops_the_prompt() {
        let prompt = PromptState::new("Rename:", "a", PromptSubmit::NewFile);
        let state = reduce(AppState::default(), Action::SetPrompt(Some(prompt.clone())));

        let same = reduce(state.clone(), Action::SetMode(Mode::Prompt));
        assert_eq!(same.prompt, Some(prompt));

        let state = reduce(state, Action::SetMode(Mode::Command));
        assert_eq!(state.mode, Mode::Command);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn mode_changes_outside_preview_keep_preview_fields() {
        let mut state = AppState::default();
        state.preview_scroll = 3;
        state.preview_selected_lines.insert(1);
        let state = reduce(state, Action::SetMode(Mode::Visual));
        assert_eq!(state.preview_scroll, 3);
        assert_eq!(state.preview_selected_lines.len(), 1);
    }

    #[test]
    fn preview_cursor_stays_inside_viewport() {
        let height = 7;
        let mut state = with_preview(100);
        let deltas = [3, 10, -2, 50, -60, 99, -1, 8, -30, 200];
        for delta in deltas {
            state = reduce(state, Action::MovePreviewCursor { delta, height });
            assert!(state.preview_scroll <= state.preview_cursor);
            assert!(state.preview_cursor < state.preview_scroll + height);
            assert!(state.preview_cursor < 100);
        }
        for index in [0, 64, 12, 99, 1000, 5] {
            state = reduce(state, Action::SetPreviewCursor { index, height });
            assert!(state.preview_scroll <= state.preview_cursor);
            assert!(state.preview_cursor < state.preview_scroll + height);
        }
    }

    #[test]
    fn preview_scroll_moves_minimally() {
        let state = with_preview(100);
        let state = reduce(state, Action::SetPreviewCursor { index: 20, height: 10 });
        assert_eq!(state.preview_scroll, 11);
        let state = reduce(state, Action::MovePreviewCursor { delta: -5, height: 10 });
        assert_eq!(state.preview_scroll, 11);
        let state = reduce(state, Action::MovePreviewCursor { delta: -5, height: 10 });
        assert_eq!((state.preview_cursor, state.preview_scroll), (10, 10));
    }

    #[test]
    fn new_preview_resets_preview_position() {
        let state = with_preview(30);
        let state = reduce(state, Action::SetPreviewCursor { index: 25, height: 5 });
        let state = reduce(state, Action::SetPreview(PreviewContent::new(PreviewKind::Text, "short")));
        assert_eq!((state.preview_cursor, state.preview_scroll), (0, 0));
    }

    #[test]
    fn clipboard_round_trip() {
        let entry = ClipboardEntry {
            operation: ClipboardOp::Cut,
            files: vec![file("a")],
        };
        let state = reduce(AppState::default(), Action::SetClipboard(entry.clone()));
        assert_eq!(state.clipboard, Some(entry));
        let state = reduce(state, Action::ClearClipboard);
        assert!(state.clipboard.is_none());
    }

    #[test]
    fn history_is_bounded() {
        let mut state = AppState::default();
        for i in 0..(HISTORY_LIMIT + 20) {
            state = reduce(state, Action::PushHistory(PathBuf::from(format!("/d{i}"))));
        }
        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history.last(), Some(&PathBuf::from(format!("/d{}", HISTORY_LIMIT + 19))));

        let state = reduce(state, Action::PopHistory);
        assert_eq!(state.history.len(), HISTORY_LIMIT - 1);
    }

    #[test]
    fn parent_cursor_is_clamped() {
        let state = reduce(AppState::default(), Action::SetParentFiles(vec![file("a"), file("b")]));
        let state = reduce(state, Action::SetParentCursor { index: 9 });
        assert_eq!(state.parent_cursor, 1);
    }
}
