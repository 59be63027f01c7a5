//! Git and GitHub command builders and result interpretation.
//!
//! Commands run through Zellij's `run_command`, so a request turns into a
//! [`CommandRequest`] whose [`CommandKind`] travels in the command context and
//! comes back with the result.

use super::status::{parse_porcelain, GitInfo};
use crate::domain::{PreviewContent, PreviewKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Context key the command kind is stored under.
pub const CONTEXT_KEY: &str = "voy_command";

/// Shown when `gh` cannot be started.
pub const GH_MISSING: &str = "gh CLI is not installed. Install it from https://cli.github.com/";

/// Number of commits shown by the log preview.
pub const LOG_LIMIT: usize = 50;

/// A git or GitHub action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "git")]
pub enum GitRequest {
    Stage { paths: Vec<PathBuf> },
    Commit { message: String },
    Push,
    Diff { path: PathBuf },
    Log,
    Issues,
    PullRequests,
    Browse,
    /// Repository root and branch of the working directory.
    RepoInfo,
    /// Porcelain status, carrying what `RepoInfo` found.
    Status { root: PathBuf, branch: String },
}

impl GitRequest {
    /// Program and arguments.
    #[must_use]
    pub fn command(&self) -> Vec<String> {
        let words = |words: &[&str]| words.iter().map(ToString::to_string).collect::<Vec<_>>();

        match self {
            Self::Stage { paths } => {
                let mut args = words(&["git", "add", "--"]);
                args.extend(paths.iter().map(|p| p.to_string_lossy().into_owned()));
                args
            }
            Self::Commit { message } => {
                let mut args = words(&["git", "commit", "-m"]);
                args.push(message.clone());
                args
            }
            Self::Diff { path } => {
                let mut args = words(&["git", "diff", "HEAD", "--"]);
                args.push(path.to_string_lossy().into_owned());
                args
            }
            Self::Log => {
                let mut args = words(&["git", "log", "--oneline", "--graph"]);
                args.push(format!("-{LOG_LIMIT}"));
                args
            }
            Self::Push => words(&["git", "push"]),
            Self::Issues => words(&["gh", "issue", "list"]),
            Self::PullRequests => words(&["gh", "pr", "list"]),
            Self::Browse => words(&["gh", "browse"]),
            Self::RepoInfo => words(&["git", "rev-parse", "--show-toplevel", "--abbrev-ref", "HEAD"]),
            Self::Status { .. } => words(&["git", "status", "--porcelain=v1", "-z"]),
        }
    }

    const fn uses_gh(&self) -> bool {
        matches!(self, Self::Issues | Self::PullRequests | Self::Browse)
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Stage { .. } => "git add",
            Self::Commit { .. } => "git commit",
            Self::Push => "git push",
            Self::Diff { .. } => "git diff",
            Self::Log => "git log",
            Self::Issues => "gh issue list",
            Self::PullRequests => "gh pr list",
            Self::Browse => "gh browse",
            Self::RepoInfo => "git rev-parse",
            Self::Status { .. } => "git status",
        }
    }

    /// Turns a finished command into what the UI should do with it.
    #[must_use]
    pub fn interpret(&self, output: &CommandOutput) -> GitOutcome {
        if self.uses_gh() && matches!(output.exit_code, None | Some(127)) {
            return GitOutcome::Error(GH_MISSING.to_string());
        }

        if !output.success() {
            return match self {
                Self::RepoInfo | Self::Status { .. } => GitOutcome::NotRepository,
                _ => {
                    let stderr = output.stderr.trim();
                    GitOutcome::Error(if stderr.is_empty() {
                        format!("{} failed", self.name())
                    } else {
                        stderr.to_string()
                    })
                }
            };
        }

        let stdout = output.stdout.trim();
        match self {
            Self::Stage { paths } => GitOutcome::Changed(format!("Staged {} file(s)", paths.len())),
            Self::Commit { .. } => GitOutcome::Changed(first_line(stdout, "Committed")),
            Self::Push => {
                let combined = format!("{}\n{}", output.stdout, output.stderr);
                GitOutcome::Message(first_line(combined.trim(), "Pushed"))
            }
            Self::Diff { .. } => GitOutcome::Preview(preview(PreviewKind::Diff, stdout, "(no changes)")),
            Self::Log => GitOutcome::Preview(preview(PreviewKind::GitLog, stdout, "(no commits)")),
            Self::Issues => GitOutcome::Preview(preview(PreviewKind::GitHub, stdout, "(no open issues)")),
            Self::PullRequests => {
                GitOutcome::Preview(preview(PreviewKind::GitHub, stdout, "(no open pull requests)"))
            }
            Self::Browse => GitOutcome::Message("Opened repository in browser".to_string()),
            Self::RepoInfo => {
                let mut lines = stdout.lines();
                match (lines.next(), lines.next()) {
                    (Some(root), Some(branch)) => GitOutcome::Repository {
                        root: PathBuf::from(root),
                        branch: branch.to_string(),
                    },
                    _ => GitOutcome::NotRepository,
                }
            }
            Self::Status { root, branch } => GitOutcome::Status(GitInfo {
                root: root.clone(),
                branch: branch.clone(),
                files: parse_porcelain(&output.stdout),
            }),
        }
    }
}

fn preview(kind: PreviewKind, stdout: &str, empty: &str) -> PreviewContent {
    PreviewContent::new(kind, if stdout.is_empty() { empty } else { stdout })
}

fn first_line(text: &str, fallback: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// What a finished git command means for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOutcome {
    /// Show output in the preview pane.
    Preview(PreviewContent),
    /// Show a status message.
    Message(String),
    /// Show a status message and reload repository status.
    Changed(String),
    /// Show an error message.
    Error(String),
    /// The working directory is inside a repository.
    Repository { root: PathBuf, branch: String },
    /// The working directory is not inside a repository.
    NotRepository,
    /// Fresh repository status.
    Status(GitInfo),
}

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Why a command was run; round-trips through the command context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CommandKind {
    /// A git request issued while `cwd` was the current directory.
    Git { request: GitRequest, cwd: PathBuf },
    /// Preview lines piped to the system clipboard.
    CopyText { lines: usize },
}

impl CommandKind {
    /// Recovers the kind from a command context.
    #[must_use]
    pub fn from_context(context: &BTreeMap<String, String>) -> Option<Self> {
        let raw = context.get(CONTEXT_KEY)?;
        match serde_json::from_str(raw) {
            Ok(kind) => Some(kind),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable command context");
                None
            }
        }
    }
}

/// A command ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub args: Vec<String>,
    /// Host working directory.
    pub cwd: PathBuf,
    pub kind: CommandKind,
}

impl CommandRequest {
    /// A git request run in `cwd`.
    #[must_use]
    pub fn git(request: GitRequest, cwd: PathBuf) -> Self {
        Self {
            args: request.command(),
            cwd: cwd.clone(),
            kind: CommandKind::Git { request, cwd },
        }
    }

    /// Pipes `text` into `clipboard_command` through `sh`, passing the text as
    /// a positional argument so it is never interpreted by the shell.
    #[must_use]
    pub fn copy_text(clipboard_command: &str, text: &str, lines: usize, cwd: PathBuf) -> Self {
        Self {
            args: vec![
                "sh".into(),
                "-c".into(),
                format!("printf '%s' \"$1\" | {clipboard_command}"),
                "voy".into(),
                text.to_string(),
            ],
            cwd,
            kind: CommandKind::CopyText { lines },
        }
    }

    /// Context map carrying the serialized kind.
    #[must_use]
    pub fn context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        match serde_json::to_string(&self.kind) {
            Ok(kind) => {
                context.insert(CONTEXT_KEY.to_string(), kind);
            }
            Err(e) => tracing::debug!(error = %e, "failed to serialize command kind"),
        }
        context
    }
}
