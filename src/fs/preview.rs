//! Preview loading for the entry under the cursor.

use super::listing::stat_entry;
use crate::domain::{FileEntry, PreviewContent, PreviewKind, Result};
use std::fs;
use std::path::Path;

/// Text previews stop after this many lines.
pub const MAX_PREVIEW_LINES: usize = 100;
/// Files larger than this are not read.
pub const MAX_FILE_SIZE: u64 = 256 * 1024;
/// Directory previews list at most this many entries.
pub const MAX_DIRECTORY_ENTRIES: usize = 50;

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svg", "mp4", "mkv", "avi", "mov", "webm",
    "mp3", "flac", "wav", "ogg", "m4a", "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "pdf", "doc",
    "docx", "xls", "xlsx", "ppt", "pptx", "exe", "dll", "so", "dylib", "o", "a", "wasm", "class",
    "pyc",
];

/// Loads the preview for `entry`. Failures become an [`PreviewKind::Error`]
/// preview rather than an error value.
#[must_use]
pub fn load_preview(entry: &FileEntry) -> PreviewContent {
    let result = if entry.is_directory {
        directory_preview(&entry.path)
    } else {
        file_preview(entry)
    };

    result.unwrap_or_else(|e| PreviewContent::new(PreviewKind::Error, format!("Error: {e}")))
}

fn file_preview(entry: &FileEntry) -> Result<PreviewContent> {
    if has_binary_extension(&entry.name) {
        return Ok(PreviewContent::new(
            PreviewKind::Binary,
            format!("Binary file: {}", entry.name),
        ));
    }
    if entry.size > MAX_FILE_SIZE {
        return Ok(PreviewContent::new(
            PreviewKind::Binary,
            format!("File too large: {}", entry.name),
        ));
    }

    let bytes = fs::read(&entry.path)?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(PreviewContent::new(
            PreviewKind::Binary,
            format!("Binary file: {}", entry.name),
        ));
    };
    if text.contains('\0') {
        return Ok(PreviewContent::new(
            PreviewKind::Binary,
            format!("Binary file: {}", entry.name),
        ));
    }

    let content = text
        .split('\n')
        .take(MAX_PREVIEW_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(PreviewContent::new(PreviewKind::Text, content))
}

fn directory_preview(dir: &Path) -> Result<PreviewContent> {
    let mut entries = Vec::new();
    for dirent in fs::read_dir(dir)?.take(MAX_DIRECTORY_ENTRIES) {
        let dirent = dirent?;
        entries.push(stat_entry(dir, dirent.file_name().to_string_lossy().into_owned()));
    }

    entries.sort_by(|a, b| b.is_directory.cmp(&a.is_directory).then_with(|| a.name.cmp(&b.name)));

    let content = entries
        .iter()
        .map(|e| {
            if e.is_directory {
                format!("{}/", e.name)
            } else {
                e.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(PreviewContent {
        kind: PreviewKind::Directory,
        content,
        entries,
    })
}

fn has_binary_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
