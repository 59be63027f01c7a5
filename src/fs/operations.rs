//! File operations: copy, move, delete, rename, create.
//!
//! A [`FileOperation`] is a serializable description of the work, so it can be
//! queued by the engine and executed on the worker thread. Paths inside it are
//! rewritten with [`FileOperation::map_paths`] before execution.

use crate::domain::{Result, VoyError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file operation to run off the UI thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum FileOperation {
    /// Recursively copy each source into `dest_dir`.
    Copy { sources: Vec<PathBuf>, dest_dir: PathBuf },
    /// Move each source into `dest_dir`.
    Move { sources: Vec<PathBuf>, dest_dir: PathBuf },
    /// Remove each path, recursively; missing paths are not an error.
    Delete { paths: Vec<PathBuf> },
    /// Rename `path` to `new_name` within its parent directory.
    Rename { path: PathBuf, new_name: String },
    /// Create a directory and any missing parents.
    CreateDirectory { path: PathBuf },
    /// Create an empty file, leaving an existing one untouched.
    CreateFile { path: PathBuf },
}

impl FileOperation {
    /// Prefix of the message shown when the operation fails.
    #[must_use]
    pub const fn failure_prefix(&self) -> &'static str {
        match self {
            Self::Copy { .. } | Self::Move { .. } => "Paste failed",
            Self::Delete { .. } => "Delete failed",
            Self::Rename { .. } => "Rename failed",
            Self::CreateDirectory { .. } => "mkdir failed",
            Self::CreateFile { .. } => "touch failed",
        }
    }

    /// Rewrites every path in the operation.
    #[must_use]
    pub fn map_paths(self, f: impl Fn(&Path) -> PathBuf) -> Self {
        let map_all = |paths: Vec<PathBuf>| paths.iter().map(|p| f(p)).collect();
        match self {
            Self::Copy { sources, dest_dir } => Self::Copy {
                sources: map_all(sources),
                dest_dir: f(&dest_dir),
            },
            Self::Move { sources, dest_dir } => Self::Move {
                sources: map_all(sources),
                dest_dir: f(&dest_dir),
            },
            Self::Delete { paths } => Self::Delete { paths: map_all(paths) },
            Self::Rename { path, new_name } => Self::Rename {
                path: f(&path),
                new_name,
            },
            Self::CreateDirectory { path } => Self::CreateDirectory { path: f(&path) },
            Self::CreateFile { path } => Self::CreateFile { path: f(&path) },
        }
    }

    /// Runs the operation, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the first step that failed, or an operation
    /// error for requests that would clobber data (copying a path onto itself,
    /// renaming onto an existing entry).
    pub fn execute(&self) -> Result<()> {
        match self {
            Self::Copy { sources, dest_dir } => sources
                .iter()
                .try_for_each(|source| copy_into(source, dest_dir)),
            Self::Move { sources, dest_dir } => sources.iter().try_for_each(|source| {
                let target = dest_dir.join(file_name(source)?);
                if &target == source {
                    return Ok(());
                }
                fs::rename(source, target).map_err(VoyError::from)
            }),
            Self::Delete { paths } => paths.iter().try_for_each(|path| remove(path)),
            Self::Rename { path, new_name } => rename(path, new_name),
            Self::CreateDirectory { path } => fs::create_dir_all(path).map_err(VoyError::from),
            Self::CreateFile { path } => fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(drop)
                .map_err(VoyError::from),
        }
    }
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| VoyError::Operation(format!("{} has no file name", path.display())))
}

fn copy_into(source: &Path, dest_dir: &Path) -> Result<()> {
    let target = dest_dir.join(file_name(source)?);
    if target == source {
        return Err(VoyError::Operation(format!(
            "{} and its destination are the same",
            source.display()
        )));
    }
    if target.starts_with(source) {
        return Err(VoyError::Operation(format!(
            "cannot copy {} into itself",
            source.display()
        )));
    }
    copy_recursive(source, &target)
}

/// Symlinks are copied as links and never descended into.
fn copy_recursive(source: &Path, target: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(source)?;
    if meta.file_type().is_symlink() {
        copy_link(source, target)?;
    } else if meta.is_dir() {
        fs::create_dir_all(target)?;
        for dirent in fs::read_dir(source)? {
            let dirent = dirent?;
            copy_recursive(&dirent.path(), &target.join(dirent.file_name()))?;
        }
    } else {
        fs::copy(source, target)?;
    }
    Ok(())
}

#[cfg(unix)]
fn copy_link(source: &Path, target: &Path) -> Result<()> {
    std::os::unix::fs::symlink(fs::read_link(source)?, target)?;
    Ok(())
}

/// WASI has no stable way to create a link; the link is left out of the copy.
#[cfg(not(unix))]
fn copy_link(source: &Path, _target: &Path) -> Result<()> {
    tracing::debug!(path = %source.display(), "skipping symlink in copy");
    Ok(())
}

fn remove(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if meta.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn rename(path: &Path, new_name: &str) -> Result<()> {
    if new_name.contains('/') {
        return Err(VoyError::Operation(format!("invalid name: {new_name}")));
    }
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    let target = parent.join(new_name);
    if target.exists() {
        return Err(VoyError::Operation(format!("{new_name} already exists")));
    }
    fs::rename(path, target)?;
    Ok(())
}
