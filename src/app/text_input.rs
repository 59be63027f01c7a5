//! Line editors for command, search and prompt mode.
//!
//! All three share the same editing keys: `escape` leaves, `return` submits,
//! `backspace` deletes the last character and printable characters append.
//! Anything else (arrows, tab, ctrl and meta chords) is ignored.

use super::commands;
use super::modes::Mode;
use super::reducer::Action;
use super::state::{PromptState, PromptSubmit, SearchState};
use crate::fs::FileOperation;
use crate::git::GitRequest;
use crate::keymap::{ActionContext, RawKey, Request, SpecialKey};
use std::path::Path;

enum Edit<'k> {
    Cancel,
    Submit,
    Backspace,
    Insert(&'k str),
}

impl<'k> Edit<'k> {
    fn from_key(key: &'k RawKey) -> Option<Self> {
        match key.special {
            Some(SpecialKey::Escape) => Some(Self::Cancel),
            Some(SpecialKey::Return) => Some(Self::Submit),
            Some(SpecialKey::Backspace) => Some(Self::Backspace),
            _ => key.printable().map(Self::Insert),
        }
    }
}

/// Routes a key to the editor for the current mode. Keys in other modes are
/// ignored.
pub fn handle_key(ctx: &mut ActionContext<'_>, key: &RawKey, home: &Path) {
    let Some(edit) = Edit::from_key(key) else {
        return;
    };

    match ctx.state().mode {
        Mode::Command => command_key(ctx, edit, home),
        Mode::Search => search_key(ctx, edit),
        Mode::Prompt => prompt_key(ctx, edit),
        Mode::Normal | Mode::Visual | Mode::Preview => {}
    }
}

fn command_key(ctx: &mut ActionContext<'_>, edit: Edit<'_>, home: &Path) {
    let input = &ctx.state().input;
    match edit {
        Edit::Cancel => {
            ctx.dispatch(Action::SetMode(Mode::Normal));
            ctx.dispatch(Action::SetCommandInput(String::new()));
        }
        Edit::Submit => {
            commands::execute(ctx, input, home);
            ctx.dispatch(Action::SetMode(Mode::Normal));
            ctx.dispatch(Action::SetCommandInput(String::new()));
        }
        Edit::Backspace => {
            let mut input = input.clone();
            input.pop();
            if input.is_empty() {
                ctx.dispatch(Action::SetMode(Mode::Normal));
            }
            ctx.dispatch(Action::SetCommandInput(input));
        }
        Edit::Insert(text) => ctx.dispatch(Action::SetCommandInput(format!("{input}{text}"))),
    }
}

fn search_key(ctx: &mut ActionContext<'_>, edit: Edit<'_>) {
    let input = &ctx.state().input;
    match edit {
        Edit::Cancel => {
            ctx.dispatch(Action::SetMode(Mode::Normal));
            ctx.dispatch(Action::SetCommandInput(String::new()));
        }
        Edit::Submit => ctx.dispatch(Action::SetMode(Mode::Normal)),
        Edit::Backspace => {
            let mut input = input.clone();
            input.pop();
            if input.is_empty() {
                ctx.dispatch(Action::SetMode(Mode::Normal));
            }
            update_search(ctx, &input);
            ctx.dispatch(Action::SetCommandInput(input));
        }
        Edit::Insert(text) => {
            let input = format!("{input}{text}");
            update_search(ctx, &input);
            ctx.dispatch(Action::SetCommandInput(input));
        }
    }
}

fn update_search(ctx: &mut ActionContext<'_>, query: &str) {
    if query.is_empty() {
        ctx.dispatch(Action::SetSearch(None));
        return;
    }

    let search = SearchState::compute(query, &ctx.state().files);
    let first = search.matches.first().copied();
    ctx.dispatch(Action::SetSearch(Some(search)));
    if let Some(index) = first {
        ctx.dispatch(Action::SetCursor { index });
    }
}

fn prompt_key(ctx: &mut ActionContext<'_>, edit: Edit<'_>) {
    let Some(prompt) = ctx.state().prompt.as_ref() else {
        return;
    };
    match edit {
        Edit::Cancel => ctx.dispatch(Action::SetPrompt(None)),
        Edit::Submit => submit(ctx, prompt),
        Edit::Backspace => {
            let mut value = prompt.value.clone();
            value.pop();
            ctx.dispatch(Action::SetPrompt(Some(PromptState {
                value,
                ..prompt.clone()
            })));
        }
        Edit::Insert(text) => ctx.dispatch(Action::SetPrompt(Some(PromptState {
            value: format!("{}{text}", prompt.value),
            ..prompt.clone()
        }))),
    }
}

/// Runs a prompt's submit intent with its current value, then closes it.
fn submit(ctx: &mut ActionContext<'_>, prompt: &PromptState) {
    let value = prompt.value.as_str();
    let current = &ctx.state().current_path;

    match &prompt.on_submit {
        PromptSubmit::ConfirmDelete { files } => {
            if value == "y" || value == "Y" {
                let paths = files.iter().map(|f| f.path.clone()).collect();
                ctx.request(Request::FileOperation(FileOperation::Delete { paths }));
                ctx.dispatch(Action::ClearSelection);
            }
        }
        PromptSubmit::Rename { entry } => {
            if !value.is_empty() && value != entry.name {
                ctx.request(Request::FileOperation(FileOperation::Rename {
                    path: entry.path.clone(),
                    new_name: value.to_string(),
                }));
            }
        }
        PromptSubmit::NewFile => {
            if !value.trim().is_empty() {
                ctx.request(Request::FileOperation(FileOperation::CreateFile {
                    path: current.join(value.trim()),
                }));
            }
        }
        PromptSubmit::NewDirectory => {
            if !value.trim().is_empty() {
                ctx.request(Request::FileOperation(FileOperation::CreateDirectory {
                    path: current.join(value.trim()),
                }));
            }
        }
        PromptSubmit::Commit => {
            if !value.trim().is_empty() {
                ctx.request(Request::Git(GitRequest::Commit {
                    message: value.trim().to_string(),
                }));
            }
        }
    }

    ctx.dispatch(Action::SetPrompt(None));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{reduce, AppState};
    use crate::domain::FileEntry;
    use crate::keymap::Modifiers;
    use std::path::PathBuf;

    fn file(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: PathBuf::from("/w").join(name),
            is_directory: false,
            is_symlink: false,
            size: 0,
            modified: 0,
            permissions: String::new(),
        }
    }

    fn state_in(mode: Mode) -> AppState {
        let mut state = AppState::new("/w".into(), false, Default::default());
        state.files = vec![file("alpha"), file("beta"), file("Gamma"), file("delta")];
        reduce(state, Action::SetMode(mode))
    }

    fn press(state: AppState, key: &RawKey) -> (AppState, Vec<Request>) {
        let mut ctx = ActionContext::new(&state, 0, 10);
        handle_key(&mut ctx, key, Path::new("/home/me"));
        let (actions, requests) = ctx.into_parts();
        (actions.into_iter().fold(state, reduce), requests)
    }

    fn type_text(mut state: AppState, text: &str) -> AppState {
        for c in text.chars() {
            state = press(state, &RawKey::char(c)).0;
        }
        state
    }

    #[test]
    fn command_submit_runs_and_returns_to_normal() {
        let state = type_text(state_in(Mode::Command), "q");
        assert_eq!(state.input, "q");
        let (state, requests) = press(state, &RawKey::special(SpecialKey::Return));
        assert_eq!(requests, vec![Request::Exit]);
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.input.is_empty());
    }

    #[test]
    fn command_backspace_to_empty_leaves_mode() {
        let state = type_text(state_in(Mode::Command), "ab");
        let (state, _) = press(state, &RawKey::special(SpecialKey::Backspace));
        assert_eq!((state.mode, state.input.as_str()), (Mode::Command, "a"));
        let (state, _) = press(state, &RawKey::special(SpecialKey::Backspace));
        assert_eq!((state.mode, state.input.as_str()), (Mode::Normal, ""));
    }

    #[test]
    fn unknown_command_sets_error() {
        let state = type_text(state_in(Mode::Command), "nope");
        let (state, _) = press(state, &RawKey::special(SpecialKey::Return));
        assert_eq!(state.error.as_deref(), Some("Unknown command: nope"));
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn search_tracks_matches_and_jumps() {
        let state = type_text(state_in(Mode::Search), "ta");
        let search = state.search.clone().unwrap();
        assert_eq!(search.matches, vec![1, 3]);
        assert_eq!(state.cursor, 1);

        let state = type_text(state, "X");
        assert!(state.search.as_ref().unwrap().matches.is_empty());
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn search_return_keeps_results_and_escape_clears_input() {
        let state = type_text(state_in(Mode::Search), "gam");
        let (state, _) = press(state, &RawKey::special(SpecialKey::Return));
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.search.as_ref().map(|s| s.matches.clone()), Some(vec![2]));

        let state = type_text(reduce(state, Action::SetMode(Mode::Search)), "b");
        let (state, _) = press(state, &RawKey::special(SpecialKey::Escape));
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.input.is_empty());
    }

    #[test]
    fn search_backspace_to_empty_clears_search() {
        let state = type_text(state_in(Mode::Search), "a");
        let (state, _) = press(state, &RawKey::special(SpecialKey::Backspace));
        assert!(state.search.is_none());
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn chords_and_arrows_are_ignored() {
        let state = type_text(state_in(Mode::Command), "x");
        let (state, _) = press(state, &RawKey::with_modifiers('w', Modifiers::ctrl()));
        let (state, _) = press(state, &RawKey::special(SpecialKey::Left));
        assert_eq!(state.input, "x");
    }

    fn prompt_state(on_submit: PromptSubmit, value: &str) -> AppState {
        reduce(
            state_in(Mode::Normal),
            Action::SetPrompt(Some(PromptState::new("?", value, on_submit))),
        )
    }

    #[test]
    fn delete_prompt_requires_y() {
        let files = vec![file("alpha")];
        let state = prompt_state(PromptSubmit::ConfirmDelete { files: files.clone() }, "");
        let (state, requests) = press(type_text(state, "n"), &RawKey::special(SpecialKey::Return));
        assert!(requests.is_empty());
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.prompt.is_none());

        let state = prompt_state(PromptSubmit::ConfirmDelete { files }, "");
        let (_, requests) = press(type_text(state, "Y"), &RawKey::special(SpecialKey::Return));
        assert_eq!(
            requests,
            vec![Request::FileOperation(FileOperation::Delete {
                paths: vec![PathBuf::from("/w/alpha")]
            })]
        );
    }

    #[test]
    fn rename_prompt_skips_unchanged_names() {
        let entry = file("alpha");
        let state = prompt_state(PromptSubmit::Rename { entry: entry.clone() }, "alpha");
        let (_, requests) = press(state, &RawKey::special(SpecialKey::Return));
        assert!(requests.is_empty());

        let state = prompt_state(PromptSubmit::Rename { entry }, "alpha");
        let state = press(state, &RawKey::special(SpecialKey::Backspace)).0;
        let (_, requests) = press(type_text(state, "2"), &RawKey::special(SpecialKey::Return));
        assert_eq!(
            requests,
            vec![Request::FileOperation(FileOperation::Rename {
                path: PathBuf::from("/w/alpha"),
                new_name: "alph2".into()
            })]
        );
    }

    #[test]
    fn prompt_escape_closes_without_submitting() {
        let state = prompt_state(PromptSubmit::NewFile, "draft.md");
        let (state, requests) = press(state, &RawKey::special(SpecialKey::Escape));
        assert!(requests.is_empty());
        assert!(state.prompt.is_none());
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn commit_prompt_requests_git_commit() {
        let state = prompt_state(PromptSubmit::Commit, "");
        let (_, requests) = press(type_text(state, "fix typo"), &RawKey::special(SpecialKey::Return));
        assert_eq!(
            requests,
            vec![Request::Git(GitRequest::Commit {
                message: "fix typo".into()
            })]
        );
    }
}
