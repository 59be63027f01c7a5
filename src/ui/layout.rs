//! Screen geometry shared by the session (scroll math) and the renderer.
//!
//! ```text
//! ┌ parent ┬ current ──────┬ preview ──────┐  rows 1..=pane height
//! │        │               │               │
//! └────────┴───────────────┴───────────────┘
//!  status bar                                 rows - 2
//!  input line (command / search / prompt)     rows - 1
//!  key hints                                  rows
//! ```

/// Rows below the panes: status bar, input line, hint bar.
pub const CHROME_ROWS: usize = 3;

/// Narrowest a pane is allowed to get.
const MIN_PANE_WIDTH: usize = 10;

/// Height of the three panes, which is also the preview viewport height.
///
/// ```rust
/// use voy::ui::layout::preview_height;
///
/// assert_eq!(preview_height(24), 21);
/// assert_eq!(preview_height(2), 1);
/// ```
#[must_use]
pub fn preview_height(rows: usize) -> usize {
    rows.saturating_sub(CHROME_ROWS).max(1)
}

/// Column widths of the three panes, separators included in the outer panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneWidths {
    pub parent: usize,
    pub current: usize,
    pub preview: usize,
}

impl PaneWidths {
    /// Splits `cols` roughly 20/45/35 between parent, current and preview.
    #[must_use]
    pub fn split(cols: usize) -> Self {
        let parent = (cols / 5).max(MIN_PANE_WIDTH);
        let preview = (cols * 35 / 100).max(MIN_PANE_WIDTH);
        let current = cols.saturating_sub(parent + preview).max(MIN_PANE_WIDTH);
        Self {
            parent,
            current,
            preview,
        }
    }

    /// First column (1-based) of the current pane.
    #[must_use]
    pub const fn current_column(&self) -> usize {
        self.parent + 1
    }

    /// First column (1-based) of the preview pane.
    #[must_use]
    pub const fn preview_column(&self) -> usize {
        self.parent + self.current + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_fill_the_screen() {
        let widths = PaneWidths::split(100);
        assert_eq!(widths.parent, 20);
        assert_eq!(widths.preview, 35);
        assert_eq!(widths.current, 45);
        assert_eq!(widths.preview_column(), 66);
    }

    #[test]
    fn narrow_screens_keep_minimum_widths() {
        let widths = PaneWidths::split(20);
        assert_eq!(widths.parent, 10);
        assert_eq!(widths.current, 10);
        assert_eq!(widths.preview, 10);
    }
}
