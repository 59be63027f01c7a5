//! End-to-end key flows through `handle_event`: from key presses to the
//! effects the plugin runtime would execute.

use std::path::{Path, PathBuf};
use voy::domain::{ClipboardOp, FileEntry, PreviewContent, PreviewKind, SortSpec};
use voy::fs::FileOperation;
use voy::git::{CommandKind, CommandOutput};
use voy::keymap::{RawKey, SpecialKey};
use voy::worker::{WorkerMessage, WorkerResponse};
use voy::{handle_event, AppState, Effect, Event, Mode, Session, Settings};

fn entry(dir: &str, name: &str, is_directory: bool) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        path: Path::new(dir).join(name),
        is_directory,
        is_symlink: false,
        size: 12,
        modified: 0,
        permissions: "rw-r--r--".to_string(),
    }
}

/// A session showing `/w` with `src/`, `a.txt` and `b.txt`.
fn session() -> Session {
    let settings = Settings {
        home: PathBuf::from("/home/me"),
        clipboard_command: "wl-copy".to_string(),
        ..Settings::default()
    };
    let mut session = Session::new(AppState::new("/w".into(), false, SortSpec::default()), settings);

    let (_, effects) = handle_event(&mut session, &Event::Started);
    assert_eq!(listed_path(&effects), Some(PathBuf::from("/w")));

    send(
        &mut session,
        WorkerResponse::DirectoryLoaded {
            path: "/w".into(),
            files: vec![
                entry("/w", "src", true),
                entry("/w", "a.txt", false),
                entry("/w", "b.txt", false),
            ],
            parent_path: Some("/".into()),
            parent_files: vec![entry("/", "w", true)],
        },
    );
    session
}

fn send(session: &mut Session, response: WorkerResponse) -> Vec<Effect> {
    handle_event(session, &Event::WorkerResponse(response)).1
}

fn press(session: &mut Session, key: RawKey) -> Vec<Effect> {
    handle_event(session, &Event::Key(key)).1
}

fn type_keys(session: &mut Session, text: &str) -> Vec<Effect> {
    text.chars().flat_map(|c| press(session, RawKey::char(c))).collect()
}

fn enter(session: &mut Session) -> Vec<Effect> {
    press(session, RawKey::special(SpecialKey::Return))
}

fn listed_path(effects: &[Effect]) -> Option<PathBuf> {
    effects.iter().find_map(|effect| match effect {
        Effect::PostToWorker(WorkerMessage::ListDirectory { path, .. }) => Some(path.clone()),
        _ => None,
    })
}

fn operation(effects: &[Effect]) -> Option<FileOperation> {
    effects.iter().find_map(|effect| match effect {
        Effect::PostToWorker(WorkerMessage::RunOperation { operation, .. }) => Some(operation.clone()),
        _ => None,
    })
}

#[test]
fn visual_yank_then_paste_copies_into_the_current_directory() {
    let mut session = session();

    type_keys(&mut session, "vj");
    assert_eq!(session.state().mode, Mode::Visual);
    assert_eq!(session.state().selected.len(), 2);

    type_keys(&mut session, "y");
    let state = session.state();
    assert_eq!(state.mode, Mode::Normal);
    assert!(state.selected.is_empty());
    let clipboard = state.clipboard.as_ref().map(|c| (c.operation, c.files.len()));
    assert_eq!(clipboard, Some((ClipboardOp::Copy, 2)));

    let effects = type_keys(&mut session, "pp");
    assert_eq!(
        operation(&effects),
        Some(FileOperation::Copy {
            sources: vec![PathBuf::from("/w/src"), PathBuf::from("/w/a.txt")],
            dest_dir: PathBuf::from("/w"),
        })
    );

    let effects = send(
        &mut session,
        WorkerResponse::OperationCompleted {
            operation: operation(&effects).unwrap(),
        },
    );
    assert_eq!(listed_path(&effects), Some(PathBuf::from("/w")));
    assert!(session.state().clipboard.is_some());
}

#[test]
fn delete_asks_first_and_the_old_timer_stays_inert() {
    let mut session = session();
    type_keys(&mut session, "j");

    let effects = type_keys(&mut session, "dd");
    assert!(effects.iter().any(|e| matches!(e, Effect::ArmTimer { .. })));
    assert_eq!(session.state().mode, Mode::Prompt);
    assert!(operation(&effects).is_none());

    // The timer armed by the first `d` fires after the sequence completed.
    let (_, effects) = handle_event(&mut session, &Event::Timer);
    assert!(effects.is_empty());
    assert_eq!(session.state().mode, Mode::Prompt);

    type_keys(&mut session, "y");
    let effects = enter(&mut session);
    assert_eq!(
        operation(&effects),
        Some(FileOperation::Delete {
            paths: vec![PathBuf::from("/w/a.txt")],
        })
    );
    assert_eq!(session.state().mode, Mode::Normal);
    assert!(session.state().prompt.is_none());
}

#[test]
fn failed_operation_surfaces_until_the_next_key() {
    let mut session = session();
    send(
        &mut session,
        WorkerResponse::OperationFailed {
            operation: FileOperation::Rename {
                path: "/w/a.txt".into(),
                new_name: "b.txt".to_string(),
            },
            message: "exists".to_string(),
        },
    );
    assert_eq!(session.state().error.as_deref(), Some("Rename failed: exists"));

    type_keys(&mut session, "j");
    assert!(session.state().error.is_none());
}

#[test]
fn keys_without_a_token_still_dismiss_the_message() {
    let mut session = session();
    type_keys(&mut session, ":frob");
    enter(&mut session);
    assert!(session.state().error.is_some());

    let (should_render, effects) = handle_event(&mut session, &Event::UnmappedKey);
    assert!(should_render);
    assert!(effects.is_empty());
    assert!(session.state().error.is_none());
}

#[test]
fn rename_prompt_starts_with_the_current_name() {
    let mut session = session();
    type_keys(&mut session, "jjr");

    let prompt = session.state().prompt.clone().unwrap();
    assert_eq!(prompt.value, "b.txt");

    for _ in 0..3 {
        press(&mut session, RawKey::special(SpecialKey::Backspace));
    }
    type_keys(&mut session, "md");
    let effects = enter(&mut session);
    assert_eq!(
        operation(&effects),
        Some(FileOperation::Rename {
            path: "/w/b.txt".into(),
            new_name: "b.md".to_string(),
        })
    );
}

#[test]
fn search_jumps_and_next_match_wraps() {
    let mut session = session();

    type_keys(&mut session, "/txt");
    assert_eq!(session.state().mode, Mode::Search);
    assert_eq!(session.state().cursor, 1);

    enter(&mut session);
    assert_eq!(session.state().mode, Mode::Normal);

    type_keys(&mut session, "n");
    assert_eq!(session.state().cursor, 2);
    type_keys(&mut session, "n");
    assert_eq!(session.state().cursor, 1);
    type_keys(&mut session, "N");
    assert_eq!(session.state().cursor, 2);
}

#[test]
fn cd_command_navigates_and_back_returns() {
    let mut session = session();

    type_keys(&mut session, ":cd src");
    assert_eq!(session.state().input, "cd src");
    let effects = enter(&mut session);
    assert_eq!(listed_path(&effects), Some(PathBuf::from("/w/src")));
    assert_eq!(session.state().current_path, Path::new("/w/src"));
    assert_eq!(session.state().mode, Mode::Normal);

    let effects = press(&mut session, RawKey::with_modifiers('o', voy::keymap::Modifiers::ctrl()));
    assert_eq!(listed_path(&effects), Some(PathBuf::from("/w")));
    assert!(session.state().history.is_empty());
}

#[test]
fn unknown_command_reports_an_error() {
    let mut session = session();
    type_keys(&mut session, ":frob");
    let effects = enter(&mut session);
    assert!(effects.is_empty());
    assert_eq!(session.state().error.as_deref(), Some("Unknown command: frob"));
}

#[test]
fn preview_mode_copies_selected_lines() {
    let mut session = session();

    let effects = type_keys(&mut session, "j");
    let requested = effects.iter().any(|effect| {
        matches!(effect, Effect::PostToWorker(WorkerMessage::LoadPreview { entry, .. }) if entry.name == "a.txt")
    });
    assert!(requested);

    send(
        &mut session,
        WorkerResponse::PreviewLoaded {
            path: "/w/a.txt".into(),
            preview: PreviewContent::new(PreviewKind::Text, "one\ntwo\nthree"),
        },
    );
    type_keys(&mut session, "P");
    assert_eq!(session.state().mode, Mode::Preview);

    type_keys(&mut session, "j ");
    assert_eq!(session.state().preview_cursor, 2);

    let effects = type_keys(&mut session, "y");
    let Some(Effect::RunCommand(request)) = effects.first() else {
        panic!("expected a clipboard command, got {effects:?}");
    };
    assert_eq!(request.kind, CommandKind::CopyText { lines: 1 });
    assert_eq!(request.args.last().map(String::as_str), Some("two"));
    assert!(request.args.iter().any(|arg| arg.contains("wl-copy")));

    let output = CommandOutput {
        exit_code: Some(0),
        ..CommandOutput::default()
    };
    handle_event(
        &mut session,
        &Event::CommandFinished {
            kind: request.kind.clone(),
            output,
        },
    );
    assert_eq!(session.state().error.as_deref(), Some("1 line(s) copied"));

    press(&mut session, RawKey::special(SpecialKey::Escape));
    assert_eq!(session.state().mode, Mode::Normal);
    assert_eq!(session.state().preview_scroll, 0);
}

#[test]
fn stale_preview_is_dropped() {
    let mut session = session();
    type_keys(&mut session, "jj");

    send(
        &mut session,
        WorkerResponse::PreviewLoaded {
            path: "/w/a.txt".into(),
            preview: PreviewContent::new(PreviewKind::Text, "old"),
        },
    );
    assert_eq!(session.state().preview, PreviewContent::default());
}

#[test]
fn quit_exits() {
    let mut session = session();
    assert_eq!(type_keys(&mut session, "q"), vec![Effect::Exit]);
}
