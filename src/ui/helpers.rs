//! Shared rendering utilities.
//!
//! Widths are counted in `char`s. Wide glyphs are not accounted for.

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H` to move the cursor.
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Cuts `text` to `width` characters, ending in `…` when it was too long.
///
/// ```rust
/// use voy::ui::helpers::truncate;
///
/// assert_eq!(truncate("main.rs", 10), "main.rs");
/// assert_eq!(truncate("a_long_name.rs", 6), "a_lon…");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Truncates or right-pads `text` to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let len = cut.chars().count();
    format!("{cut}{}", " ".repeat(width.saturating_sub(len)))
}

/// Keeps the end of a path that does not fit, prefixed with `..`.
#[must_use]
pub fn shorten_path(path: &str, width: usize) -> String {
    let len = path.chars().count();
    if len <= width {
        return path.to_string();
    }
    if width <= 2 {
        return truncate(path, width);
    }
    let tail: String = path.chars().skip(len - (width - 2)).collect();
    format!("..{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_cuts() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn shorten_path_keeps_the_tail() {
        assert_eq!(shorten_path("/home/me/src/voy", 30), "/home/me/src/voy");
        assert_eq!(shorten_path("/home/me/src/voy", 9), "..src/voy");
    }

    #[test]
    fn multibyte_names_are_cut_on_char_boundaries() {
        assert_eq!(truncate("häßlich.txt", 4), "häß…");
    }
}
