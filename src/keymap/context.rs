//! The capability bundle handed to a binding when it runs.
//!
//! An intent never touches the state or the outside world directly. It reads
//! the [`AppState`] snapshot taken before it ran, queues reducer [`Action`]s
//! through [`ActionContext::dispatch`], and queues capability [`Request`]s
//! (navigation, file operations, git, editor) for the session to fulfil after
//! the actions are applied. The snapshot does not change while the intent
//! runs, so handlers compute follow-up indices from the values they read.

use crate::app::reducer::Action;
use crate::app::state::AppState;
use crate::fs::FileOperation;
use crate::git::GitRequest;
use std::path::PathBuf;

/// Work an intent asks the session to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Change to `path`, remembering the current directory in history.
    Navigate(PathBuf),
    /// Enter the directory under the cursor.
    EnterDirectory,
    /// Go to the parent of the current directory.
    ParentDirectory,
    /// Go to the home directory.
    Home,
    /// Return to the most recent directory in history.
    Back,
    /// Reload the current listing.
    Refresh,
    /// Close the plugin.
    Exit,
    /// Open `path` in the editor, optionally at a 1-based line.
    OpenEditor { path: PathBuf, line: Option<usize> },
    /// Run a file operation on the worker.
    FileOperation(FileOperation),
    /// Run a git or GitHub command in the current directory.
    Git(GitRequest),
    /// Put `text` on the system clipboard; `lines` is reported back.
    CopyText { text: String, lines: usize },
}

/// Context a binding or prompt runs against.
#[derive(Debug)]
pub struct ActionContext<'a> {
    state: &'a AppState,
    count: usize,
    preview_height: usize,
    actions: Vec<Action>,
    requests: Vec<Request>,
}

impl<'a> ActionContext<'a> {
    /// Creates a context over `state` with repeat `count` (`0` when absent) and
    /// the preview viewport height in rows.
    #[must_use]
    pub fn new(state: &'a AppState, count: usize, preview_height: usize) -> Self {
        Self {
            state,
            count,
            preview_height,
            actions: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// State as it was before this handler ran.
    #[must_use]
    pub const fn state(&self) -> &'a AppState {
        self.state
    }

    /// Raw repeat count; `0` when none was typed.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Repeat count with the customary default of 1.
    #[must_use]
    pub const fn count_or_one(&self) -> usize {
        if self.count == 0 {
            1
        } else {
            self.count
        }
    }

    /// Repeat count as a signed cursor delta.
    #[must_use]
    pub fn delta(&self) -> isize {
        isize::try_from(self.count_or_one()).unwrap_or(isize::MAX)
    }

    #[must_use]
    pub const fn preview_height(&self) -> usize {
        self.preview_height
    }

    /// Queues a state transition.
    pub fn dispatch(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn navigate(&mut self, path: PathBuf) {
        self.requests.push(Request::Navigate(path));
    }

    pub fn enter_directory(&mut self) {
        self.requests.push(Request::EnterDirectory);
    }

    pub fn parent_directory(&mut self) {
        self.requests.push(Request::ParentDirectory);
    }

    pub fn refresh(&mut self) {
        self.requests.push(Request::Refresh);
    }

    pub fn exit(&mut self) {
        self.requests.push(Request::Exit);
    }

    pub fn open_editor(&mut self, path: PathBuf, line: Option<usize>) {
        self.requests.push(Request::OpenEditor { path, line });
    }

    /// Queues any other capability request.
    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Queued actions and requests, in the order they were issued.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Action>, Vec<Request>) {
        (self.actions, self.requests)
    }
}
