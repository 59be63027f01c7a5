//! Binding intents and what they do.
//!
//! Every binding maps to one [`Intent`]. [`Intent::run`] is the single place
//! that turns an intent into reducer actions and capability requests, reading
//! only the snapshot in the [`ActionContext`].

use super::context::{ActionContext, Request};
use crate::app::reducer::Action;
use crate::app::state::{PromptState, PromptSubmit, SearchState};
use crate::app::Mode;
use crate::domain::{ClipboardEntry, ClipboardOp};
use crate::fs::FileOperation;
use crate::git::GitRequest;

/// Rows moved by `C-d` / `C-u` in the file list.
pub const HALF_PAGE: isize = 15;

/// What a binding does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    // Normal mode
    MoveDown,
    MoveUp,
    EnterOrPreview,
    ParentDirectory,
    GoTop,
    GoBottom,
    HalfPageDown,
    HalfPageUp,
    ToggleSelection,
    EnterVisual,
    ToggleSelectAll,
    Yank,
    Cut,
    Delete,
    Paste,
    EnterPreview,
    OpenEditor,
    Rename,
    NewFile,
    NewDirectory,
    ToggleHidden,
    GoHome,
    HistoryBack,
    CommandMode,
    SearchMode,
    NextMatch,
    PrevMatch,
    Quit,
    GitStage,
    GitCommit,
    GitPush,
    GitDiff,
    GitLog,
    GitIssues,
    GitPullRequests,
    GitBrowse,

    // Visual mode
    VisualDown,
    VisualUp,
    VisualYank,
    VisualDelete,
    VisualConfirm,
    VisualCancel,

    // Preview mode
    PreviewDown,
    PreviewUp,
    PreviewHalfPageDown,
    PreviewHalfPageUp,
    PreviewTop,
    PreviewBottom,
    PreviewToggleLine,
    PreviewVisual,
    PreviewToggleSelectAll,
    PreviewCopy,
    PreviewOpenEditor,
    PreviewQuit,
    PreviewEscape,
}

impl Intent {
    /// Runs the intent against `ctx`.
    #[allow(clippy::too_many_lines)]
    pub fn run(self, ctx: &mut ActionContext<'_>) {
        let state = ctx.state();
        let delta = ctx.delta();
        let height = ctx.preview_height();

        match self {
            Self::MoveDown => ctx.dispatch(Action::MoveCursor { delta }),
            Self::MoveUp => ctx.dispatch(Action::MoveCursor { delta: -delta }),
            Self::EnterOrPreview => {
                let Some(entry) = state.current_entry() else {
                    return;
                };
                if entry.is_directory {
                    ctx.enter_directory();
                } else if state.preview.kind.is_scrollable() {
                    ctx.dispatch(Action::SetMode(Mode::Preview));
                }
            }
            Self::ParentDirectory => ctx.parent_directory(),
            Self::GoTop => ctx.dispatch(Action::SetCursor { index: 0 }),
            Self::GoBottom => ctx.dispatch(Action::SetCursor {
                index: state.files.len().saturating_sub(1),
            }),
            Self::HalfPageDown => ctx.dispatch(Action::MoveCursor { delta: HALF_PAGE }),
            Self::HalfPageUp => ctx.dispatch(Action::MoveCursor { delta: -HALF_PAGE }),
            Self::ToggleSelection => {
                if state.files.is_empty() {
                    return;
                }
                ctx.dispatch(Action::ToggleSelection { index: state.cursor });
                ctx.dispatch(Action::MoveCursor { delta: 1 });
            }
            Self::EnterVisual => {
                ctx.dispatch(Action::SetMode(Mode::Visual));
                ctx.dispatch(Action::SetVisualAnchor { index: state.cursor });
            }
            Self::ToggleSelectAll => {
                if !state.selected.is_empty() {
                    ctx.dispatch(Action::ClearSelection);
                } else if !state.files.is_empty() {
                    ctx.dispatch(Action::SelectRange {
                        from: 0,
                        to: state.files.len() - 1,
                    });
                }
            }
            Self::Yank => set_clipboard(ctx, ClipboardOp::Copy),
            Self::Cut => set_clipboard(ctx, ClipboardOp::Cut),
            Self::Delete => confirm_delete(ctx),
            Self::Paste => {
                let Some(clipboard) = &state.clipboard else {
                    return;
                };
                let sources = clipboard.files.iter().map(|f| f.path.clone()).collect();
                let dest_dir = state.current_path.clone();
                let operation = match clipboard.operation {
                    ClipboardOp::Copy => FileOperation::Copy { sources, dest_dir },
                    ClipboardOp::Cut => FileOperation::Move { sources, dest_dir },
                };
                ctx.request(Request::FileOperation(operation));
            }
            Self::EnterPreview => {
                if state.preview.kind.is_scrollable() {
                    ctx.dispatch(Action::SetMode(Mode::Preview));
                }
            }
            Self::OpenEditor => {
                if let Some(entry) = state.current_entry().filter(|e| !e.is_directory) {
                    ctx.open_editor(entry.path.clone(), None);
                }
            }
            Self::Rename => {
                let Some(entry) = state.current_entry() else {
                    return;
                };
                ctx.dispatch(Action::SetPrompt(Some(PromptState::new(
                    "Rename:",
                    entry.name.clone(),
                    PromptSubmit::Rename { entry: entry.clone() },
                ))));
            }
            Self::NewFile => ctx.dispatch(Action::SetPrompt(Some(PromptState::new(
                "New file:",
                "",
                PromptSubmit::NewFile,
            )))),
            Self::NewDirectory => ctx.dispatch(Action::SetPrompt(Some(PromptState::new(
                "New directory:",
                "",
                PromptSubmit::NewDirectory,
            )))),
            Self::ToggleHidden => {
                ctx.dispatch(Action::ToggleHidden);
                ctx.refresh();
            }
            Self::GoHome => ctx.request(Request::Home),
            Self::HistoryBack => ctx.request(Request::Back),
            Self::CommandMode => ctx.dispatch(Action::SetMode(Mode::Command)),
            Self::SearchMode => ctx.dispatch(Action::SetMode(Mode::Search)),
            Self::NextMatch => cycle_match(ctx, 1),
            Self::PrevMatch => cycle_match(ctx, -1),
            Self::Quit => ctx.exit(),
            Self::GitStage => {
                let paths: Vec<_> = state.targets().into_iter().map(|f| f.path).collect();
                if !paths.is_empty() {
                    ctx.request(Request::Git(GitRequest::Stage { paths }));
                }
            }
            Self::GitCommit => ctx.dispatch(Action::SetPrompt(Some(PromptState::new(
                "Commit message:",
                "",
                PromptSubmit::Commit,
            )))),
            Self::GitPush => ctx.request(Request::Git(GitRequest::Push)),
            Self::GitDiff => {
                if let Some(entry) = state.current_entry() {
                    ctx.request(Request::Git(GitRequest::Diff {
                        path: entry.path.clone(),
                    }));
                }
            }
            Self::GitLog => ctx.request(Request::Git(GitRequest::Log)),
            Self::GitIssues => ctx.request(Request::Git(GitRequest::Issues)),
            Self::GitPullRequests => ctx.request(Request::Git(GitRequest::PullRequests)),
            Self::GitBrowse => ctx.request(Request::Git(GitRequest::Browse)),

            Self::VisualDown | Self::VisualUp => {
                if state.files.is_empty() {
                    return;
                }
                let last = state.files.len() - 1;
                let steps = ctx.count_or_one();
                let cursor = if self == Self::VisualDown {
                    state.cursor.saturating_add(steps).min(last)
                } else {
                    state.cursor.saturating_sub(steps)
                };
                ctx.dispatch(Action::SetCursor { index: cursor });
                ctx.dispatch(Action::SelectRange {
                    from: state.visual_anchor,
                    to: cursor,
                });
            }
            Self::VisualYank => {
                set_clipboard(ctx, ClipboardOp::Copy);
                ctx.dispatch(Action::SetMode(Mode::Normal));
            }
            Self::VisualDelete => confirm_delete(ctx),
            Self::VisualConfirm => ctx.dispatch(Action::SetMode(Mode::Normal)),
            Self::VisualCancel => {
                ctx.dispatch(Action::ClearSelection);
                ctx.dispatch(Action::SetMode(Mode::Normal));
            }

            Self::PreviewDown => ctx.dispatch(Action::MovePreviewCursor { delta, height }),
            Self::PreviewUp => ctx.dispatch(Action::MovePreviewCursor {
                delta: -delta,
                height,
            }),
            Self::PreviewHalfPageDown | Self::PreviewHalfPageUp => {
                let half = isize::try_from(height / 2).unwrap_or(isize::MAX);
                let delta = if self == Self::PreviewHalfPageDown { half } else { -half };
                ctx.dispatch(Action::MovePreviewCursor { delta, height });
            }
            Self::PreviewTop => ctx.dispatch(Action::SetPreviewCursor { index: 0, height }),
            Self::PreviewBottom => ctx.dispatch(Action::SetPreviewCursor {
                index: state.preview_line_count() - 1,
                height,
            }),
            Self::PreviewToggleLine => {
                ctx.dispatch(Action::TogglePreviewLineSelection {
                    line: state.preview_cursor,
                });
                ctx.dispatch(Action::MovePreviewCursor { delta: 1, height });
            }
            Self::PreviewVisual => match state.preview_visual_anchor {
                None => ctx.dispatch(Action::SetPreviewVisualAnchor(Some(state.preview_cursor))),
                Some(anchor) => {
                    ctx.dispatch(Action::SelectPreviewLineRange {
                        from: anchor,
                        to: state.preview_cursor,
                    });
                    ctx.dispatch(Action::SetPreviewVisualAnchor(None));
                }
            },
            Self::PreviewToggleSelectAll => {
                if state.preview_selected_lines.is_empty() {
                    ctx.dispatch(Action::SelectPreviewLineRange {
                        from: 0,
                        to: state.preview_line_count() - 1,
                    });
                } else {
                    ctx.dispatch(Action::ClearPreviewSelection);
                }
            }
            Self::PreviewCopy => {
                let (text, lines) = state.preview_selection_text();
                ctx.request(Request::CopyText { text, lines });
                ctx.dispatch(Action::ClearPreviewSelection);
            }
            Self::PreviewOpenEditor => {
                if let Some(entry) = state.current_entry().filter(|e| !e.is_directory) {
                    ctx.open_editor(entry.path.clone(), Some(state.preview_cursor + 1));
                }
            }
            Self::PreviewQuit => ctx.dispatch(Action::SetMode(Mode::Normal)),
            Self::PreviewEscape => {
                if state.preview_visual_anchor.is_some() {
                    ctx.dispatch(Action::SetPreviewVisualAnchor(None));
                } else {
                    ctx.dispatch(Action::SetMode(Mode::Normal));
                }
            }
        }
    }
}

fn set_clipboard(ctx: &mut ActionContext<'_>, operation: ClipboardOp) {
    let files = ctx.state().targets();
    if files.is_empty() {
        return;
    }
    ctx.dispatch(Action::SetClipboard(ClipboardEntry { operation, files }));
    ctx.dispatch(Action::ClearSelection);
}

fn confirm_delete(ctx: &mut ActionContext<'_>) {
    let files = ctx.state().targets();
    if files.is_empty() {
        return;
    }
    ctx.dispatch(Action::SetPrompt(Some(PromptState::new(
        format!("Delete {} file(s)? (y/n)", files.len()),
        "",
        PromptSubmit::ConfirmDelete { files },
    ))));
}

fn cycle_match(ctx: &mut ActionContext<'_>, step: isize) {
    let Some(search) = ctx.state().search.as_ref().filter(|s| !s.matches.is_empty()) else {
        return;
    };
    let len = search.matches.len();
    let current = if step > 0 {
        (search.current + 1) % len
    } else {
        (search.current + len - 1) % len
    };
    let index = search.matches[current];

    ctx.dispatch(Action::SetSearch(Some(SearchState {
        current,
        ..search.clone()
    })));
    ctx.dispatch(Action::SetCursor { index });
}
