//! The state owner: routes keys, applies transitions and fulfils requests.
//!
//! A [`Session`] owns the [`AppState`], the binding registry and the key
//! buffer. Every input goes through one of its entry points and comes back as a
//! list of [`Effect`]s for the plugin runtime to execute:
//!
//! ```text
//! key ──▶ matcher / line editor ──▶ Intent ──▶ Actions ──reduce──▶ AppState
//!                                      │
//!                                      └──▶ Requests ──fulfil──▶ Effects
//! ```
//!
//! Asynchronous results (listings, previews, file operations, git commands)
//! re-enter through [`Session::on_worker_response`] and
//! [`Session::on_command_finished`]. Results that no longer match the current
//! directory or the entry under the cursor are discarded.

use super::effects::Effect;
use super::modes::Mode;
use super::reducer::{reduce, Action};
use super::state::{AppState, SearchState};
use super::text_input;
use crate::domain::{FileEntry, PreviewContent};
use crate::fs::FileOperation;
use crate::git::{CommandKind, CommandOutput, CommandRequest, GitOutcome, GitRequest};
use crate::keymap::{
    default_bindings, normalize_key, ActionContext, BindingRegistry, Dispatch, KeyBuffer, RawKey,
    Request, Resolution, TimerId,
};
use crate::ui::layout;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default time the matcher waits for the next key of an ambiguous sequence.
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default terminal height assumed until the first render.
pub const DEFAULT_ROWS: usize = 24;

/// Session settings that do not live in the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Editor command; `None` uses the host's default editor.
    pub editor: Option<String>,
    /// Command that reads clipboard text on stdin.
    pub clipboard_command: String,
    pub sequence_timeout: Duration,
    /// Home directory used by `~` and `:cd ~`.
    pub home: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: None,
            clipboard_command: crate::DEFAULT_CLIPBOARD_COMMAND.to_string(),
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
            home: PathBuf::from("/"),
        }
    }
}

/// Owner of the application state and everything that drives it.
#[derive(Debug)]
pub struct Session {
    state: AppState,
    registry: BindingRegistry,
    buffer: KeyBuffer,
    settings: Settings,
    /// Armed timers in arm order; Zellij fires them in the same order.
    timers: VecDeque<TimerId>,
    /// Entry the shown (or requested) preview belongs to.
    preview_path: Option<PathBuf>,
    /// Name to put the cursor on once the next listing arrives.
    focus_on: Option<String>,
    rows: usize,
}

impl Session {
    /// Creates a session with the built-in bindings.
    #[must_use]
    pub fn new(state: AppState, settings: Settings) -> Self {
        Self::with_registry(state, settings, default_bindings())
    }

    #[must_use]
    pub fn with_registry(state: AppState, settings: Settings, registry: BindingRegistry) -> Self {
        Self {
            state,
            registry,
            buffer: KeyBuffer::new(),
            settings,
            timers: VecDeque::new(),
            preview_path: None,
            focus_on: None,
            rows: DEFAULT_ROWS,
        }
    }

    /// Read-only view of the current state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Keys of a sequence still being typed, for the status bar.
    #[must_use]
    pub fn pending_keys(&self) -> String {
        self.buffer.keys_display()
    }

    /// Records the terminal height the UI is rendered into.
    pub fn set_viewport(&mut self, rows: usize) {
        self.rows = rows;
    }

    /// Rows available to the preview pane.
    #[must_use]
    pub fn preview_height(&self) -> usize {
        layout::preview_height(self.rows)
    }

    /// Applies a single transition. The only way the state changes.
    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(action = ?action, "dispatch");
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    fn dispatch_all(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    /// Loads the starting directory.
    pub fn start(&mut self) -> Vec<Effect> {
        tracing::debug!(path = %self.state.current_path.display(), "session started");
        vec![self.load_directory()]
    }

    /// Handles a key in any mode, routing it to the matcher or a line editor.
    pub fn handle_key(&mut self, key: &RawKey) -> Vec<Effect> {
        if self.state.mode.is_text_input() {
            self.process_text_event(key)
        } else {
            self.process_key_event(key)
        }
    }

    /// Normal, visual and preview mode: normalizes the key and feeds the
    /// sequence matcher.
    pub fn process_key_event(&mut self, key: &RawKey) -> Vec<Effect> {
        self.clear_error();

        let token = normalize_key(key);
        let mode = self.state.mode;
        match self.buffer.feed(&self.registry, mode, token) {
            Resolution::Count | Resolution::NoMatch => Vec::new(),
            Resolution::Dispatch(dispatch) => self.run(dispatch),
            Resolution::Pending { timer, .. } => {
                self.timers.push_back(timer);
                vec![Effect::ArmTimer {
                    id: timer,
                    after: self.settings.sequence_timeout,
                }]
            }
        }
    }

    /// Command, search and prompt mode: edits the line.
    pub fn process_text_event(&mut self, key: &RawKey) -> Vec<Effect> {
        self.clear_error();

        let mut ctx = ActionContext::new(&self.state, 0, self.preview_height());
        text_input::handle_key(&mut ctx, key, &self.settings.home);
        let (actions, requests) = ctx.into_parts();
        self.apply(actions, requests)
    }

    /// A key the normalizer has no token for. Clears the displayed message
    /// and leaves any sequence in progress alone.
    pub fn on_unmapped_key(&mut self) -> Vec<Effect> {
        self.clear_error();
        Vec::new()
    }

    /// Handles the oldest armed timer firing.
    pub fn on_timer(&mut self) -> Vec<Effect> {
        let Some(id) = self.timers.pop_front() else {
            tracing::debug!("timer fired with nothing armed");
            return Vec::new();
        };
        match self.buffer.on_timeout(id) {
            Some(dispatch) => self.run(dispatch),
            None => Vec::new(),
        }
    }

    fn clear_error(&mut self) {
        if self.state.error.is_some() {
            self.dispatch(Action::SetError(None));
        }
    }

    fn run(&mut self, dispatch: Dispatch) -> Vec<Effect> {
        let _span = tracing::debug_span!("run_intent", intent = ?dispatch.intent, count = dispatch.count).entered();

        let mut ctx = ActionContext::new(&self.state, dispatch.count, self.preview_height());
        dispatch.intent.run(&mut ctx);
        let (actions, requests) = ctx.into_parts();
        self.apply(actions, requests)
    }

    fn apply(&mut self, actions: Vec<Action>, requests: Vec<Request>) -> Vec<Effect> {
        self.dispatch_all(actions);

        let mut effects = Vec::new();
        for request in requests {
            effects.extend(self.fulfil(request));
        }
        effects.extend(self.sync_preview());
        effects
    }

    fn fulfil(&mut self, request: Request) -> Vec<Effect> {
        tracing::debug!(request = ?request, "fulfilling request");

        match request {
            Request::Navigate(path) => self.navigate(path, true),
            Request::EnterDirectory => match self.state.current_entry() {
                Some(entry) if entry.is_directory => {
                    let path = entry.path.clone();
                    self.navigate(path, true)
                }
                _ => Vec::new(),
            },
            Request::ParentDirectory => {
                let current = self.state.current_path.clone();
                let Some(parent) = current.parent() else {
                    return Vec::new();
                };
                self.focus_on = current.file_name().map(|n| n.to_string_lossy().into_owned());
                self.navigate(parent.to_path_buf(), true)
            }
            Request::Home => self.navigate(self.settings.home.clone(), true),
            Request::Back => {
                let Some(previous) = self.state.history.last().cloned() else {
                    return Vec::new();
                };
                self.dispatch(Action::PopHistory);
                self.navigate(previous, false)
            }
            Request::Refresh => vec![self.load_directory()],
            Request::Exit => vec![Effect::Exit],
            Request::OpenEditor { path, line } => vec![Effect::OpenEditor {
                path,
                line,
                editor: self.settings.editor.clone(),
            }],
            Request::FileOperation(operation) => {
                vec![Effect::PostToWorker(WorkerMessage::file_operation(operation))]
            }
            Request::Git(request) => vec![self.git(request)],
            Request::CopyText { text, lines } => vec![Effect::RunCommand(CommandRequest::copy_text(
                &self.settings.clipboard_command,
                &text,
                lines,
                self.state.current_path.clone(),
            ))],
        }
    }

    fn navigate(&mut self, path: PathBuf, remember: bool) -> Vec<Effect> {
        let previous = self.state.current_path.clone();
        if remember && previous != path {
            self.dispatch(Action::PushHistory(previous));
        }
        self.dispatch(Action::SetPath(path));
        vec![self.load_directory()]
    }

    fn load_directory(&self) -> Effect {
        Effect::PostToWorker(WorkerMessage::list_directory(
            self.state.current_path.clone(),
            self.state.show_hidden,
            self.state.sort,
        ))
    }

    fn git(&self, request: GitRequest) -> Effect {
        Effect::RunCommand(CommandRequest::git(request, self.state.current_path.clone()))
    }

    /// Requests a preview when the entry under the cursor changed.
    ///
    /// Preview mode pins the current preview.
    fn sync_preview(&mut self) -> Vec<Effect> {
        if self.state.mode == Mode::Preview {
            return Vec::new();
        }

        let Some(entry) = self.state.current_entry() else {
            if self.preview_path.take().is_some() || self.state.preview != PreviewContent::default() {
                self.dispatch(Action::SetPreview(PreviewContent::default()));
            }
            return Vec::new();
        };

        if self.preview_path.as_ref() == Some(&entry.path) {
            return Vec::new();
        }

        let entry = entry.clone();
        self.preview_path = Some(entry.path.clone());
        vec![Effect::PostToWorker(WorkerMessage::load_preview(entry))]
    }

    /// Applies a worker response.
    pub fn on_worker_response(&mut self, response: WorkerResponse) -> Vec<Effect> {
        match response {
            WorkerResponse::DirectoryLoaded {
                path,
                files,
                parent_path,
                parent_files,
            } => {
                if path != self.state.current_path {
                    tracing::debug!(path = %path.display(), "discarding stale listing");
                    return Vec::new();
                }
                self.directory_loaded(&path, files, parent_path, parent_files)
            }
            WorkerResponse::DirectoryFailed { path, message } => {
                if path != self.state.current_path {
                    return Vec::new();
                }
                self.dispatch(Action::SetFiles(Vec::new()));
                self.dispatch(Action::SetError(Some(format!("Failed to read directory: {message}"))));
                self.dispatch(Action::SetGitInfo(None));
                self.sync_preview()
            }
            WorkerResponse::PreviewLoaded { path, preview } => {
                if self.preview_path.as_ref() == Some(&path) {
                    self.dispatch(Action::SetPreview(preview));
                } else {
                    tracing::debug!(path = %path.display(), "discarding stale preview");
                }
                Vec::new()
            }
            WorkerResponse::OperationCompleted { operation } => {
                if matches!(operation, FileOperation::Move { .. }) {
                    self.dispatch(Action::ClearClipboard);
                }
                vec![self.load_directory()]
            }
            WorkerResponse::OperationFailed { operation, message } => {
                self.dispatch(Action::SetError(Some(format!(
                    "{}: {message}",
                    operation.failure_prefix()
                ))));
                vec![self.load_directory()]
            }
        }
    }

    fn directory_loaded(
        &mut self,
        path: &Path,
        files: Vec<FileEntry>,
        parent_path: Option<PathBuf>,
        parent_files: Vec<FileEntry>,
    ) -> Vec<Effect> {
        let focus = self
            .focus_on
            .take()
            .and_then(|name| files.iter().position(|f| f.name == name));
        let search = self
            .state
            .search
            .as_ref()
            .map(|search| SearchState {
                current: search.current,
                ..SearchState::compute(&search.query, &files)
            });
        let parent_cursor = parent_files.iter().position(|f| f.path == path);

        self.dispatch(Action::SetFiles(files));
        self.dispatch(Action::SetParentPath(parent_path.unwrap_or_else(|| path.to_path_buf())));
        self.dispatch(Action::SetParentFiles(parent_files));
        if let Some(index) = parent_cursor {
            self.dispatch(Action::SetParentCursor { index });
        }
        if let Some(index) = focus {
            self.dispatch(Action::SetCursor { index });
        }
        if let Some(search) = search {
            let current = search.current.min(search.matches.len().saturating_sub(1));
            self.dispatch(Action::SetSearch(Some(SearchState { current, ..search })));
        }

        // Contents may have changed even when the entry under the cursor did not.
        self.preview_path = None;

        let mut effects = self.sync_preview();
        effects.push(self.git(GitRequest::RepoInfo));
        effects
    }

    /// Applies the result of an external command.
    pub fn on_command_finished(&mut self, kind: CommandKind, output: &CommandOutput) -> Vec<Effect> {
        match kind {
            CommandKind::CopyText { lines } => {
                let message = if output.success() {
                    format!("{lines} line(s) copied")
                } else {
                    "Copy failed".to_string()
                };
                self.dispatch(Action::SetError(Some(message)));
                Vec::new()
            }
            CommandKind::Git { request, cwd } => {
                let outcome = request.interpret(output);
                tracing::debug!(request = ?request, outcome = ?outcome, "git command finished");
                self.git_outcome(outcome, &cwd)
            }
        }
    }

    fn git_outcome(&mut self, outcome: GitOutcome, cwd: &Path) -> Vec<Effect> {
        let current = cwd == self.state.current_path;

        match outcome {
            GitOutcome::Preview(preview) => {
                self.preview_path = None;
                self.dispatch(Action::SetPreview(preview));
                if !self.state.mode.is_text_input() {
                    self.dispatch(Action::SetMode(Mode::Preview));
                }
                Vec::new()
            }
            GitOutcome::Message(message) | GitOutcome::Error(message) => {
                self.dispatch(Action::SetError(Some(message)));
                Vec::new()
            }
            GitOutcome::Changed(message) => {
                self.dispatch(Action::SetError(Some(message)));
                vec![self.git(GitRequest::RepoInfo)]
            }
            GitOutcome::Repository { root, branch } if current => {
                vec![self.git(GitRequest::Status { root, branch })]
            }
            GitOutcome::NotRepository if current => {
                self.dispatch(Action::SetGitInfo(None));
                Vec::new()
            }
            GitOutcome::Status(info) if current => {
                self.dispatch(Action::SetGitInfo(Some(info)));
                Vec::new()
            }
            GitOutcome::Repository { .. } | GitOutcome::NotRepository | GitOutcome::Status(_) => {
                tracing::debug!(cwd = %cwd.display(), "discarding stale git status");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PreviewKind, SortSpec};
    use crate::keymap::SpecialKey;

    fn entry(dir: &str, name: &str, is_directory: bool) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: Path::new(dir).join(name),
            is_directory,
            is_symlink: false,
            size: 0,
            modified: 0,
            permissions: String::new(),
        }
    }

    fn session() -> Session {
        let state = AppState::new("/w".into(), false, SortSpec::default());
        let settings = Settings {
            home: "/home/me".into(),
            ..Settings::default()
        };
        let mut session = Session::new(state, settings);
        session.on_worker_response(WorkerResponse::DirectoryLoaded {
            path: "/w".into(),
            files: vec![entry("/w", "src", true), entry("/w", "a.txt", false), entry("/w", "b.txt", false)],
            parent_path: Some("/".into()),
            parent_files: vec![entry("/", "etc", true), entry("/", "w", true)],
        });
        session
    }

    fn keys(session: &mut Session, text: &str) -> Vec<Effect> {
        text.chars().flat_map(|c| session.handle_key(&RawKey::char(c))).collect()
    }

    fn listed_path(effects: &[Effect]) -> Option<PathBuf> {
        effects.iter().find_map(|effect| match effect {
            Effect::PostToWorker(WorkerMessage::ListDirectory { path, .. }) => Some(path.clone()),
            _ => None,
        })
    }

    #[test]
    fn listing_sets_parent_cursor_and_requests_preview_and_git() {
        let mut session = Session::new(AppState::new("/w".into(), false, SortSpec::default()), Settings::default());
        let effects = session.on_worker_response(WorkerResponse::DirectoryLoaded {
            path: "/w".into(),
            files: vec![entry("/w", "a.txt", false)],
            parent_path: Some("/".into()),
            parent_files: vec![entry("/", "etc", true), entry("/", "w", true)],
        });
        assert_eq!(session.state().parent_cursor, 1);
        assert!(matches!(
            effects.as_slice(),
            [
                Effect::PostToWorker(WorkerMessage::LoadPreview { .. }),
                Effect::RunCommand(CommandRequest {
                    kind: CommandKind::Git {
                        request: GitRequest::RepoInfo,
                        ..
                    },
                    ..
                })
            ]
        ));
    }

    #[test]
    fn stale_listing_is_ignored() {
        let mut session = session();
        let effects = session.on_worker_response(WorkerResponse::DirectoryLoaded {
            path: "/elsewhere".into(),
            files: vec![],
            parent_path: None,
            parent_files: vec![],
        });
        assert!(effects.is_empty());
        assert_eq!(session.state().files.len(), 3);
    }

    #[test]
    fn moving_the_cursor_requests_a_new_preview() {
        let mut session = session();
        let effects = keys(&mut session, "j");
        assert_eq!(session.state().cursor, 1);
        assert!(matches!(
            effects.as_slice(),
            [Effect::PostToWorker(WorkerMessage::LoadPreview { entry, .. })] if entry.name == "a.txt"
        ));

        let stale = WorkerResponse::PreviewLoaded {
            path: "/w/src".into(),
            preview: PreviewContent::new(PreviewKind::Directory, "old"),
        };
        session.on_worker_response(stale);
        assert_eq!(session.state().preview, PreviewContent::default());

        session.on_worker_response(WorkerResponse::PreviewLoaded {
            path: "/w/a.txt".into(),
            preview: PreviewContent::new(PreviewKind::Text, "hello"),
        });
        assert_eq!(session.state().preview.content, "hello");
    }

    #[test]
    fn entering_a_directory_remembers_history_and_back_returns() {
        let mut session = session();
        let effects = keys(&mut session, "l");
        assert_eq!(listed_path(&effects), Some(PathBuf::from("/w/src")));
        assert_eq!(session.state().current_path, Path::new("/w/src"));
        assert_eq!(session.state().history, vec![PathBuf::from("/w")]);

        let effects = session.handle_key(&RawKey::with_modifiers('o', crate::keymap::Modifiers::ctrl()));
        assert_eq!(listed_path(&effects), Some(PathBuf::from("/w")));
        assert!(session.state().history.is_empty());
    }

    #[test]
    fn parent_directory_focuses_the_child() {
        let mut session = session();
        keys(&mut session, "h");
        assert_eq!(session.state().current_path, Path::new("/"));
        session.on_worker_response(WorkerResponse::DirectoryLoaded {
            path: "/".into(),
            files: vec![entry("/", "etc", true), entry("/", "w", true)],
            parent_path: None,
            parent_files: vec![],
        });
        assert_eq!(session.state().cursor, 1);
        assert_eq!(session.state().parent_path, Path::new("/"));
    }

    #[test]
    fn ambiguous_prefix_arms_a_timer_and_fallback_never_exists_for_g() {
        let mut session = session();
        keys(&mut session, "G");
        let effects = keys(&mut session, "g");
        assert!(matches!(effects.as_slice(), [Effect::ArmTimer { after, .. }] if *after == DEFAULT_SEQUENCE_TIMEOUT));
        assert_eq!(session.pending_keys(), "g");

        assert!(session.on_timer().is_empty());
        assert_eq!(session.state().cursor, 2);
        assert!(session.pending_keys().is_empty());
    }

    #[test]
    fn superseded_timers_do_nothing() {
        let mut session = session();
        keys(&mut session, "G");
        keys(&mut session, "g");
        keys(&mut session, "g");
        assert_eq!(session.state().cursor, 0);
        keys(&mut session, "j");
        assert!(session.on_timer().is_empty());
        assert_eq!(session.state().cursor, 1);
    }

    #[test]
    fn count_prefix_repeats_motion() {
        let mut session = session();
        keys(&mut session, "2j");
        assert_eq!(session.state().cursor, 2);
    }

    #[test]
    fn unmapped_key_clears_the_error() {
        let mut session = session();
        session.dispatch(Action::SetError(Some("Delete failed: denied".to_string())));
        assert!(session.on_unmapped_key().is_empty());
        assert!(session.state().error.is_none());
    }

    #[test]
    fn any_key_clears_the_error() {
        let mut session = session();
        session.dispatch(Action::SetError(Some("boom".into())));
        keys(&mut session, "z");
        assert!(session.state().error.is_none());
    }

    #[test]
    fn paste_of_cut_files_clears_clipboard_on_success() {
        let mut session = session();
        keys(&mut session, "jx");
        assert!(session.state().clipboard.is_some());

        let effects = keys(&mut session, "pp");
        let operation = effects
            .iter()
            .find_map(|effect| match effect {
                Effect::PostToWorker(WorkerMessage::RunOperation { operation, .. }) => Some(operation.clone()),
                _ => None,
            })
            .unwrap();
        assert!(matches!(operation, FileOperation::Move { .. }));

        let effects = session.on_worker_response(WorkerResponse::OperationCompleted { operation });
        assert!(session.state().clipboard.is_none());
        assert_eq!(listed_path(&effects), Some(PathBuf::from("/w")));
    }

    #[test]
    fn failed_operations_surface_their_prefix() {
        let mut session = session();
        session.on_worker_response(WorkerResponse::OperationFailed {
            operation: FileOperation::Delete { paths: vec![] },
            message: "Permission denied".into(),
        });
        assert_eq!(session.state().error.as_deref(), Some("Delete failed: Permission denied"));
    }

    #[test]
    fn git_preview_enters_preview_mode() {
        let mut session = session();
        session.on_command_finished(
            CommandKind::Git {
                request: GitRequest::Log,
                cwd: "/w".into(),
            },
            &CommandOutput {
                exit_code: Some(0),
                stdout: "* abc first".into(),
                stderr: String::new(),
            },
        );
        assert_eq!(session.state().mode, Mode::Preview);
        assert_eq!(session.state().preview.kind, PreviewKind::GitLog);

        // Leaving preview mode reloads the file preview.
        let effects = session.handle_key(&RawKey::special(SpecialKey::Escape));
        assert_eq!(session.state().mode, Mode::Normal);
        assert!(matches!(effects.as_slice(), [Effect::PostToWorker(WorkerMessage::LoadPreview { .. })]));
    }

    #[test]
    fn git_status_for_another_directory_is_discarded() {
        let mut session = session();
        let effects = session.on_command_finished(
            CommandKind::Git {
                request: GitRequest::RepoInfo,
                cwd: "/elsewhere".into(),
            },
            &CommandOutput {
                exit_code: Some(0),
                stdout: "/elsewhere\nmain\n".into(),
                stderr: String::new(),
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn copy_result_is_reported() {
        let mut session = session();
        session.on_command_finished(CommandKind::CopyText { lines: 3 }, &CommandOutput {
            exit_code: Some(0),
            ..CommandOutput::default()
        });
        assert_eq!(session.state().error.as_deref(), Some("3 line(s) copied"));
    }

    #[test]
    fn command_mode_routes_to_the_line_editor() {
        let mut session = session();
        keys(&mut session, ":cd src");
        assert_eq!(session.state().input, "cd src");
        let effects = session.handle_key(&RawKey::special(SpecialKey::Return));
        assert_eq!(listed_path(&effects), Some(PathBuf::from("/w/src")));
        assert_eq!(session.state().mode, Mode::Normal);
    }
}
