//! Theme management and ANSI escape sequence generation.
//!
//! This module defines the color scheme system for the plugin, supporting both
//! built-in themes (Catppuccin variants) and custom themes loaded from TOML files.
//! It provides utilities for converting hex colors to ANSI escape sequences.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//!
//! # TOML Format
//!
//! Every color is optional; missing ones fall back to the Mocha palette.
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! text_normal = "#cdd6f4"
//! directory = "#89b4fa"
//! cursor_bg = "#cdd6f4"
//! git_modified = "#f9e2af"
//! ```
//!
//! # Example
//!
//! ```rust
//! use voy::ui::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! println!("{}", Theme::fg(&theme.colors.directory));
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use crate::domain::{Result, VoyError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#cdd6f4"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeColors {
    pub text_normal: String,
    /// Secondary text: metadata columns, line numbers, hints.
    pub text_dim: String,
    /// Pane separators.
    pub border: String,
    /// Preview separator while the preview has focus.
    pub border_focused: String,

    pub directory: String,
    pub symlink: String,
    pub hidden: String,

    /// Row under the cursor.
    pub cursor_fg: String,
    pub cursor_bg: String,
    /// Cursor row while another pane has focus.
    pub cursor_dim_bg: String,
    /// Multi-selected rows and preview line selections.
    pub selection_fg: String,
    pub selection_bg: String,
    /// Search match marker.
    pub match_fg: String,

    pub status_fg: String,
    pub status_bg: String,
    /// Mode badge at the left of the status bar.
    pub mode_fg: String,
    pub mode_bg: String,
    pub branch: String,

    pub error: String,
    /// Prompt titles and the `:` / `/` markers.
    pub prompt: String,
    /// Key names on the hint bar.
    pub hint_key: String,

    pub diff_added: String,
    pub diff_removed: String,
    pub diff_hunk: String,

    pub git_modified: String,
    pub git_added: String,
    pub git_deleted: String,
    pub git_untracked: String,
}

impl Default for ThemeColors {
    /// The Catppuccin Mocha palette.
    fn default() -> Self {
        Self {
            text_normal: "#cdd6f4".to_string(),
            text_dim: "#6c7086".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89dceb".to_string(),
            directory: "#89b4fa".to_string(),
            symlink: "#94e2d5".to_string(),
            hidden: "#7f849c".to_string(),
            cursor_fg: "#1e1e2e".to_string(),
            cursor_bg: "#cdd6f4".to_string(),
            cursor_dim_bg: "#585b70".to_string(),
            selection_fg: "#1e1e2e".to_string(),
            selection_bg: "#89b4fa".to_string(),
            match_fg: "#f9e2af".to_string(),
            status_fg: "#cdd6f4".to_string(),
            status_bg: "#313244".to_string(),
            mode_fg: "#1e1e2e".to_string(),
            mode_bg: "#cba6f7".to_string(),
            branch: "#a6e3a1".to_string(),
            error: "#f38ba8".to_string(),
            prompt: "#f9e2af".to_string(),
            hint_key: "#f5c2e7".to_string(),
            diff_added: "#a6e3a1".to_string(),
            diff_removed: "#f38ba8".to_string(),
            diff_hunk: "#89dceb".to_string(),
            git_modified: "#f9e2af".to_string(),
            git_added: "#a6e3a1".to_string(),
            git_deleted: "#f38ba8".to_string(),
            git_untracked: "#fab387".to_string(),
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// # Errors
    ///
    /// Returns [`VoyError::Theme`] for an unknown name.
    pub fn from_name(name: &str) -> Result<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return Err(VoyError::Theme(format!("Unknown theme: {name}"))),
        };

        Self::parse(toml_str)
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`VoyError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VoyError::Theme(format!("Failed to read theme file: {e}")))?;

        Self::parse(&contents)
    }

    fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| VoyError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Converts a hex color to RGB tuple.
    ///
    /// Returns `(255, 255, 255)` (white) on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Generates an ANSI 24-bit foreground color escape sequence.
    ///
    /// ```rust
    /// use voy::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff0000"), "\u{1b}[38;2;255;0;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// Generates an ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// Returns the ANSI bold escape sequence (`\x1b[1m`).
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// Returns the ANSI dim escape sequence (`\x1b[2m`).
    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Returns the ANSI reset escape sequence (`\x1b[0m`).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_mocha_matches_default() {
        let theme = Theme::from_name("catppuccin-mocha").unwrap();
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn latte_is_a_light_palette() {
        let theme = Theme::from_name("catppuccin-latte").unwrap();
        assert_eq!(theme.name, "catppuccin-latte");
        assert_eq!(theme.colors.text_normal, "#4c4f69");
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert!(matches!(Theme::from_name("solarized"), Err(VoyError::Theme(_))));
    }

    #[test]
    fn partial_theme_file_falls_back_per_color() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = \"mine\"\n\n[colors]\ndirectory = \"#112233\"").unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "mine");
        assert_eq!(theme.colors.directory, "#112233");
        assert_eq!(theme.colors.error, ThemeColors::default().error);
    }

    #[test]
    fn bad_hex_renders_white() {
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::bg("#1e1e2e"), "\u{1b}[48;2;30;30;46m");
    }
}
