//! `git status --porcelain=v1 -z` parsing and per-file display status.

use crate::domain::FileEntry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Two-letter porcelain status of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFileStatus {
    /// Staged status (`X`).
    pub index: char,
    /// Unstaged status (`Y`).
    pub work_tree: char,
    /// Path relative to the repository root.
    pub path: PathBuf,
}

impl GitFileStatus {
    /// Whether anything about this path is staged.
    #[must_use]
    pub const fn is_staged(&self) -> bool {
        !matches!(self.index, ' ' | '?' | '!')
    }

    /// Single status shown next to the file. Work-tree changes take priority
    /// over staged ones.
    #[must_use]
    pub const fn display(&self) -> Option<GitStatusCode> {
        match (self.index, self.work_tree) {
            ('?', '?') => Some(GitStatusCode::Untracked),
            ('!', '!') => Some(GitStatusCode::Ignored),
            (_, 'M') => Some(GitStatusCode::Modified),
            (_, 'D') | ('D', _) => Some(GitStatusCode::Deleted),
            ('A' | 'M', _) => Some(GitStatusCode::Added),
            ('R', _) => Some(GitStatusCode::Renamed),
            _ => None,
        }
    }
}

/// Status marker rendered in the file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStatusCode {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
    Ignored,
}

impl GitStatusCode {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Untracked => '?',
            Self::Ignored => '!',
        }
    }
}

/// Repository containing the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    /// Absolute repository root.
    pub root: PathBuf,
    pub branch: String,
    /// Changed paths keyed by their root-relative path.
    pub files: BTreeMap<PathBuf, GitFileStatus>,
}

impl GitInfo {
    /// Display status for `entry`. A directory shows the status of the first
    /// changed path beneath it.
    #[must_use]
    pub fn status_for(&self, entry: &FileEntry) -> Option<GitStatusCode> {
        let relative = entry.path.strip_prefix(&self.root).ok()?;
        if let Some(status) = self.files.get(relative) {
            return status.display();
        }
        if entry.is_directory {
            return self
                .files
                .range::<Path, _>((std::ops::Bound::Excluded(relative), std::ops::Bound::Unbounded))
                .take_while(|(path, _)| path.starts_with(relative))
                .find_map(|(_, status)| status.display());
        }
        None
    }
}

/// Parses NUL-separated porcelain v1 output.
///
/// Renames and copies carry their original path as an extra record, which is
/// skipped.
#[must_use]
pub fn parse_porcelain(output: &str) -> BTreeMap<PathBuf, GitFileStatus> {
    let mut files = BTreeMap::new();
    let mut records = output.split('\0').filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        let mut chars = record.chars();
        let (Some(index), Some(work_tree)) = (chars.next(), chars.next()) else {
            continue;
        };
        let Some(path) = record.get(3..).filter(|p| !p.is_empty()) else {
            continue;
        };

        if matches!(index, 'R' | 'C') {
            records.next();
        }

        let path = PathBuf::from(path.trim_end_matches('/'));
        files.insert(
            path.clone(),
            GitFileStatus {
                index,
                work_tree,
                path,
            },
        );
    }

    files
}
