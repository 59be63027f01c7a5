//! Directory listing with metadata, hidden-file filtering and sorting.

use crate::domain::{FileEntry, Result, SortField, SortOrder, SortSpec};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Reads `dir` into sorted entries, directories first.
///
/// Entry metadata comes from `lstat`; entries whose metadata cannot be read
/// (dangling links, permission races) are kept with zeroed metadata.
///
/// # Errors
///
/// Returns an error if `dir` itself cannot be read.
pub fn read_directory(dir: &Path, show_hidden: bool, sort: SortSpec) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();

    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        let name = dirent.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        entries.push(stat_entry(dir, name));
    }

    sort_entries(&mut entries, sort);
    Ok(entries)
}

/// Builds a [`FileEntry`] for `dir/name`.
pub(crate) fn stat_entry(dir: &Path, name: String) -> FileEntry {
    let path = dir.join(&name);

    let Ok(meta) = fs::symlink_metadata(&path) else {
        return FileEntry {
            name,
            path,
            is_directory: false,
            is_symlink: false,
            size: 0,
            modified: 0,
            permissions: "---------".to_string(),
        };
    };

    let is_symlink = meta.file_type().is_symlink();
    let is_directory = if is_symlink {
        fs::metadata(&path).is_ok_and(|target| target.is_dir())
    } else {
        meta.is_dir()
    };
    let modified = meta
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .and_then(|since| i64::try_from(since.as_secs()).ok())
        .unwrap_or(0);

    FileEntry {
        name,
        path,
        is_directory,
        is_symlink,
        size: meta.len(),
        modified,
        permissions: permissions(&meta),
    }
}

/// Renders permission bits as `rwxr-xr-x`.
#[cfg(unix)]
fn permissions(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format_mode(meta.permissions().mode())
}

/// WASI exposes no mode bits, only the read-only flag.
#[cfg(not(unix))]
fn permissions(meta: &fs::Metadata) -> String {
    let exec = if meta.is_dir() { 'x' } else { '-' };
    let write = if meta.permissions().readonly() { '-' } else { 'w' };
    format!("r{write}{exec}r-{exec}r-{exec}")
}

/// Formats the low nine mode bits.
#[must_use]
pub fn format_mode(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit == 0 { '-' } else { c })
        .collect()
}

/// Sorts directories before files, each group by `sort`.
pub fn sort_entries(entries: &mut [FileEntry], sort: SortSpec) {
    entries.sort_by(|a, b| {
        b.is_directory.cmp(&a.is_directory).then_with(|| {
            let ordering = compare(a, b, sort.field);
            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        })
    });
}

fn compare(a: &FileEntry, b: &FileEntry, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Size => a.size.cmp(&b.size),
        SortField::Modified => a.modified.cmp(&b.modified),
    }
}
