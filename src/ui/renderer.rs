//! Top-level rendering coordinator.
//!
//! Computes the [`ViewModel`] and prints it row by row with absolute cursor
//! positioning. Every row is padded to its full width so a frame fully
//! overwrites the previous one.

use super::helpers::{fit, position_cursor, shorten_path, truncate};
use super::layout::preview_height;
use super::theme::Theme;
use super::viewmodel::{EntryStyle, FileRow, InputLine, LineTone, PreviewLine, StatusLine, ViewModel, HINT_GAP};
use crate::app::AppState;

/// Width of the line number gutter in the preview, separator included.
const GUTTER_WIDTH: usize = 5;

/// Renders the plugin UI to stdout.
///
/// `pending_keys` is the unfinished key sequence shown in the status bar.
pub fn render(state: &AppState, theme: &Theme, pending_keys: &str, rows: usize, cols: usize) {
    let vm = ViewModel::compute(state, pending_keys, rows, cols);
    render_viewmodel(&vm, theme, rows, cols);
}

fn render_viewmodel(vm: &ViewModel, theme: &Theme, rows: usize, cols: usize) {
    let height = preview_height(rows);
    let widths = vm.widths;

    for line in 0..height {
        let row = line + 1;

        position_cursor(row, 1);
        render_file_row(vm.parent.get(line), widths.parent.saturating_sub(1), theme, true);
        print!("{}│{}", Theme::fg(&theme.colors.border), Theme::reset());

        position_cursor(row, widths.current_column());
        render_file_row(vm.current.get(line), widths.current, theme, vm.current_dimmed);

        position_cursor(row, widths.preview_column());
        let border = if vm.preview.focused {
            &theme.colors.border_focused
        } else {
            &theme.colors.border
        };
        print!("{}│{}", Theme::fg(border), Theme::reset());
        render_preview_line(vm.preview.lines.get(line), widths.preview.saturating_sub(1), theme);
    }

    render_status(height + 1, &vm.status, theme, cols);
    render_input(height + 2, &vm.input, theme, cols);
    render_hints(height + 3, &vm.hints, theme, cols);
}

fn render_file_row(row: Option<&FileRow>, width: usize, theme: &Theme, dimmed: bool) {
    let Some(row) = row else {
        print!("{}", " ".repeat(width));
        return;
    };
    if width == 0 {
        return;
    }

    let colors = &theme.colors;
    let highlighted = row.is_cursor || row.is_selected;
    if row.is_cursor {
        let bg = if dimmed { &colors.cursor_dim_bg } else { &colors.cursor_bg };
        print!("{}{}", Theme::bg(bg), Theme::fg(&colors.cursor_fg));
    } else if row.is_selected {
        print!("{}{}", Theme::bg(&colors.selection_bg), Theme::fg(&colors.selection_fg));
    }

    let marker = if row.is_selected {
        '▌'
    } else if row.is_cursor {
        '▸'
    } else {
        ' '
    };
    print!("{marker}");

    let git = row.git.map_or_else(|| "  ".to_string(), |symbol| format!("{symbol} "));
    let meta = row.meta.as_deref().unwrap_or_default();
    let fixed = 1 + git.chars().count();
    let show_meta = !meta.is_empty() && width > fixed + meta.chars().count() + 1 + 8;
    let name_width = if show_meta {
        width - fixed - meta.chars().count() - 1
    } else {
        width.saturating_sub(fixed)
    };

    if !highlighted {
        if let Some(symbol) = row.git {
            print!("{}", Theme::fg(git_color(theme, symbol)));
        }
    }
    print!("{}", truncate(&git, width.saturating_sub(1)));

    if !highlighted {
        let fg = match row.style {
            EntryStyle::Directory => &colors.directory,
            EntryStyle::Symlink => &colors.symlink,
            EntryStyle::Hidden => &colors.hidden,
            EntryStyle::File if row.is_match => &colors.match_fg,
            EntryStyle::File => &colors.text_normal,
        };
        print!("{}", Theme::fg(fg));
        if row.style == EntryStyle::Directory || row.is_match {
            print!("{}", Theme::bold());
        }
    }
    print!("{}", fit(&row.name, name_width));

    if show_meta {
        if !highlighted {
            print!("{}{}", Theme::reset(), Theme::fg(&colors.text_dim));
        }
        print!(" {meta}");
    }
    print!("{}", Theme::reset());
}

fn git_color(theme: &Theme, symbol: char) -> &str {
    let colors = &theme.colors;
    match symbol {
        'A' => &colors.git_added,
        'D' => &colors.git_deleted,
        '?' => &colors.git_untracked,
        '!' => &colors.text_dim,
        _ => &colors.git_modified,
    }
}

fn render_preview_line(line: Option<&PreviewLine>, width: usize, theme: &Theme) {
    let Some(line) = line else {
        print!("{}", " ".repeat(width));
        return;
    };

    let colors = &theme.colors;
    let mut width = width;
    if let Some(number) = line.number {
        if width > GUTTER_WIDTH {
            print!("{}{number:>4} {}", Theme::fg(&colors.text_dim), Theme::reset());
            width -= GUTTER_WIDTH;
        }
    }

    if line.is_cursor {
        print!("{}{}", Theme::bg(&colors.cursor_bg), Theme::fg(&colors.cursor_fg));
    } else if line.is_selected {
        print!("{}{}", Theme::bg(&colors.selection_bg), Theme::fg(&colors.selection_fg));
    } else {
        match line.tone {
            LineTone::Plain => print!("{}", Theme::fg(&colors.text_normal)),
            LineTone::Added => print!("{}", Theme::fg(&colors.diff_added)),
            LineTone::Removed => print!("{}", Theme::fg(&colors.diff_removed)),
            LineTone::Hunk => print!("{}", Theme::fg(&colors.diff_hunk)),
            LineTone::Muted => print!("{}{}", Theme::dim(), Theme::fg(&colors.text_dim)),
            LineTone::Error => print!("{}", Theme::fg(&colors.error)),
        }
    }

    let text = line.text.replace('\t', "    ");
    print!("{}{}", fit(&text, width), Theme::reset());
}

fn render_status(row: usize, status: &StatusLine, theme: &Theme, cols: usize) {
    let colors = &theme.colors;
    position_cursor(row, 1);

    let badge = format!(" {} ", status.mode.label());
    print!("{}{}{}{badge}", Theme::bg(&colors.mode_bg), Theme::fg(&colors.mode_fg), Theme::bold());
    print!("{}{}{}", Theme::reset(), Theme::bg(&colors.status_bg), Theme::fg(&colors.status_fg));

    let right = status.right();
    let used = badge.chars().count() + right.chars().count() + 2;
    let room = cols.saturating_sub(used);

    let mut left = format!(" {}", shorten_path(&status.path, room.saturating_sub(1)));
    let mut extras = String::new();
    if let Some(branch) = &status.branch {
        extras.push_str(&format!(" [{branch}]"));
    }
    if let Some(info) = &status.entry_info {
        extras.push_str(&format!("  {info}"));
    }
    if !status.pending.is_empty() {
        extras.push_str(&format!("  {}", status.pending));
    }
    if left.chars().count() + extras.chars().count() <= room {
        left.push_str(&extras);
    }

    print!("{}", fit(&left, room));
    print!(" {right} ");
    print!("{}", Theme::reset());
}

fn render_input(row: usize, input: &InputLine, theme: &Theme, cols: usize) {
    let colors = &theme.colors;
    position_cursor(row, 1);

    let (marker, text, suffix) = match input {
        InputLine::Prompt { title, value } => (format!("{title} "), value.clone(), "█".to_string()),
        InputLine::Command(text) => (":".to_string(), text.clone(), "█".to_string()),
        InputLine::Search { query, matches } => {
            let info = matches.map_or_else(String::new, |(current, total)| format!(" [{current}/{total}]"));
            ("/".to_string(), query.clone(), format!("█{info}"))
        }
        InputLine::Error(message) => {
            print!("{}{}{}", Theme::fg(&colors.error), Theme::bold(), fit(message, cols));
            print!("{}", Theme::reset());
            return;
        }
        InputLine::Banner(banner) => {
            print!("{}{}{}", Theme::fg(&colors.border_focused), Theme::bold(), fit(banner, cols));
            print!("{}", Theme::reset());
            return;
        }
        InputLine::Empty => {
            print!("{}", " ".repeat(cols));
            return;
        }
    };

    let marker_len = marker.chars().count();
    print!("{}{}{marker}{}", Theme::fg(&colors.prompt), Theme::bold(), Theme::reset());
    print!("{}", fit(&format!("{text}{suffix}"), cols.saturating_sub(marker_len)));
}

fn render_hints(row: usize, hints: &[(&str, &str)], theme: &Theme, cols: usize) {
    let colors = &theme.colors;
    position_cursor(row, 1);

    let mut used = 0;
    for (index, (keys, desc)) in hints.iter().enumerate() {
        if index > 0 {
            print!("{}", " ".repeat(HINT_GAP));
            used += HINT_GAP;
        }
        print!("{}{}{keys}{}", Theme::fg(&colors.hint_key), Theme::bold(), Theme::reset());
        print!("{} {desc}{}", Theme::fg(&colors.text_dim), Theme::reset());
        used += keys.chars().count() + 1 + desc.chars().count();
    }
    print!("{}", " ".repeat(cols.saturating_sub(used)));
}
