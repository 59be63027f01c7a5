//! File entry and preview domain models.
//!
//! These types cross the worker boundary as JSON, so all of them derive
//! `Serialize`/`Deserialize`. Paths are always host paths; the worker translates
//! to and from the sandbox view of the filesystem.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of a directory listing.
///
/// A snapshot of the entry's metadata at listing time. Entries are cloned into
/// the clipboard, so later directory reloads cannot invalidate a pending paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub is_symlink: bool,
    pub size: u64,
    /// Modification time as a Unix timestamp in seconds; `0` when unknown.
    pub modified: i64,
    /// Permission bits rendered as `rwxr-xr-x`.
    pub permissions: String,
}

impl FileEntry {
    /// Returns `true` for dotfiles.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Formats the modification time for display, e.g. `2025-01-01 12:00`.
    #[must_use]
    pub fn modified_display(&self) -> String {
        chrono::DateTime::from_timestamp(self.modified, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }

    /// Formats the size with a binary unit suffix (`512B`, `1.5K`, `3.0M`).
    #[must_use]
    pub fn size_display(&self) -> String {
        const UNITS: [&str; 4] = ["K", "M", "G", "T"];

        if self.size < 1024 {
            return format!("{}B", self.size);
        }

        #[allow(clippy::cast_precision_loss)]
        let mut value = self.size as f64 / 1024.0;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        format!("{value:.1}{}", UNITS[unit])
    }
}

/// What kind of content the preview pane is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    Text,
    Directory,
    Binary,
    #[default]
    None,
    Error,
    Diff,
    GitLog,
    GitHub,
}

impl PreviewKind {
    /// Whether preview mode can be entered to scroll and select lines.
    #[must_use]
    pub const fn is_scrollable(self) -> bool {
        matches!(self, Self::Text | Self::Diff | Self::GitLog | Self::GitHub)
    }
}

/// Content of the preview pane.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewContent {
    pub kind: PreviewKind,
    pub content: String,
    /// Directory previews also carry the entries they list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<FileEntry>,
}

impl PreviewContent {
    /// Creates a preview without directory entries.
    #[must_use]
    pub fn new(kind: PreviewKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            entries: Vec::new(),
        }
    }

    /// Number of lines the content splits into. Always at least 1, matching
    /// how an empty string still renders one (empty) line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Returns line `index` of the content, if present.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.content.split('\n').nth(index)
    }
}

/// Clipboard operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardOp {
    Copy,
    Cut,
}

/// Files yanked or cut, waiting to be pasted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub operation: ClipboardOp,
    pub files: Vec<FileEntry>,
}

/// Field a listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Size,
    Modified,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Listing sort specification. Directories always come first regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    /// Parses `name`, `size:desc`, `modified asc` and similar forms.
    ///
    /// Returns `None` when the field or order is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use voy::domain::{SortField, SortOrder, SortSpec};
    ///
    /// let spec = SortSpec::parse("size:desc").unwrap();
    /// assert_eq!(spec.field, SortField::Size);
    /// assert_eq!(spec.order, SortOrder::Desc);
    /// assert!(SortSpec::parse("colour").is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|p| !p.is_empty());

        let field = match parts.next()?.to_ascii_lowercase().as_str() {
            "name" => SortField::Name,
            "size" => SortField::Size,
            "modified" | "mtime" => SortField::Modified,
            _ => return None,
        };

        let order = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(_) => return None,
        };

        Some(Self { field, order })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(size: u64) -> FileEntry {
        FileEntry {
            name: "a".to_string(),
            path: PathBuf::from("/a"),
            is_directory: false,
            is_symlink: false,
            size,
            modified: 0,
            permissions: "rw-r--r--".to_string(),
        }
    }

    #[test]
    fn size_display_uses_binary_units() {
        assert_eq!(entry(512).size_display(), "512B");
        assert_eq!(entry(1536).size_display(), "1.5K");
        assert_eq!(entry(3 * 1024 * 1024).size_display(), "3.0M");
    }

    #[test]
    fn empty_preview_still_has_one_line() {
        let preview = PreviewContent::default();
        assert_eq!(preview.line_count(), 1);
        assert_eq!(PreviewContent::new(PreviewKind::Text, "a\nb\n").line_count(), 3);
    }

    #[test]
    fn modified_display_formats_utc() {
        let mut e = entry(0);
        e.modified = 1_735_689_600;
        assert_eq!(e.modified_display(), "2025-01-01 00:00");
    }
}
