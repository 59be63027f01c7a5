//! Built-in key bindings.

use super::intent::Intent;
use super::registry::{Binding, BindingRegistry};
use crate::app::Mode;

const NORMAL: &[(&[&str], &str, Intent)] = &[
    (&["j"], "Down", Intent::MoveDown),
    (&["down"], "Down", Intent::MoveDown),
    (&["k"], "Up", Intent::MoveUp),
    (&["up"], "Up", Intent::MoveUp),
    (&["l"], "Open", Intent::EnterOrPreview),
    (&["return"], "Open", Intent::EnterOrPreview),
    (&["right"], "Open", Intent::EnterOrPreview),
    (&["h"], "Parent", Intent::ParentDirectory),
    (&["left"], "Parent", Intent::ParentDirectory),
    (&["g", "g"], "Top", Intent::GoTop),
    (&["G"], "Bottom", Intent::GoBottom),
    (&["C-d"], "Half page down", Intent::HalfPageDown),
    (&["C-u"], "Half page up", Intent::HalfPageUp),
    (&[" "], "Select", Intent::ToggleSelection),
    (&["v"], "Visual", Intent::EnterVisual),
    (&["V"], "Select all", Intent::ToggleSelectAll),
    (&["y", "y"], "Yank", Intent::Yank),
    (&["x"], "Cut", Intent::Cut),
    (&["d", "d"], "Delete", Intent::Delete),
    (&["D"], "Delete", Intent::Delete),
    (&["p", "p"], "Paste", Intent::Paste),
    (&["P"], "Preview", Intent::EnterPreview),
    (&["e"], "Edit", Intent::OpenEditor),
    (&["r"], "Rename", Intent::Rename),
    (&["o"], "New file", Intent::NewFile),
    (&["O"], "New directory", Intent::NewDirectory),
    (&["."], "Hidden", Intent::ToggleHidden),
    (&["~"], "Home", Intent::GoHome),
    (&["C-o"], "Back", Intent::HistoryBack),
    (&[":"], "Command", Intent::CommandMode),
    (&["/"], "Search", Intent::SearchMode),
    (&["n"], "Next match", Intent::NextMatch),
    (&["N"], "Previous match", Intent::PrevMatch),
    (&["q"], "Quit", Intent::Quit),
    (&["g", "a"], "Git add", Intent::GitStage),
    (&["g", "c"], "Git commit", Intent::GitCommit),
    (&["g", "P"], "Git push", Intent::GitPush),
    (&["g", "d"], "Git diff", Intent::GitDiff),
    (&["g", "l"], "Git log", Intent::GitLog),
    (&["g", "i"], "GitHub issues", Intent::GitIssues),
    (&["g", "r"], "Pull requests", Intent::GitPullRequests),
    (&["g", "b"], "Browse repository", Intent::GitBrowse),
];

const VISUAL: &[(&[&str], &str, Intent)] = &[
    (&["j"], "Extend down", Intent::VisualDown),
    (&["down"], "Extend down", Intent::VisualDown),
    (&["k"], "Extend up", Intent::VisualUp),
    (&["up"], "Extend up", Intent::VisualUp),
    (&["y"], "Yank", Intent::VisualYank),
    (&["d"], "Delete", Intent::VisualDelete),
    (&["v"], "Confirm", Intent::VisualConfirm),
    (&["escape"], "Cancel", Intent::VisualCancel),
];

const PREVIEW: &[(&[&str], &str, Intent)] = &[
    (&["j"], "Down", Intent::PreviewDown),
    (&["down"], "Down", Intent::PreviewDown),
    (&["k"], "Up", Intent::PreviewUp),
    (&["up"], "Up", Intent::PreviewUp),
    (&["C-d"], "Half page down", Intent::PreviewHalfPageDown),
    (&["C-u"], "Half page up", Intent::PreviewHalfPageUp),
    (&["g", "g"], "Top", Intent::PreviewTop),
    (&["G"], "Bottom", Intent::PreviewBottom),
    (&[" "], "Select line", Intent::PreviewToggleLine),
    (&["v"], "Line range", Intent::PreviewVisual),
    (&["V"], "Select all", Intent::PreviewToggleSelectAll),
    (&["y"], "Copy", Intent::PreviewCopy),
    (&["e"], "Edit at line", Intent::PreviewOpenEditor),
    (&["q"], "Back", Intent::PreviewQuit),
    (&["escape"], "Back", Intent::PreviewEscape),
];

/// Registry holding every built-in binding for normal, visual and preview mode.
#[must_use]
pub fn default_bindings() -> BindingRegistry {
    let mut registry = BindingRegistry::new();
    for (mode, table) in [(Mode::Normal, NORMAL), (Mode::Visual, VISUAL), (Mode::Preview, PREVIEW)] {
        for (keys, description, intent) in table {
            registry.register(mode, Binding::new(keys, *description, *intent));
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::token::KeyToken;

    fn tokens(keys: &[&str]) -> Vec<KeyToken> {
        keys.iter().map(|k| KeyToken::from(*k)).collect()
    }

    #[test]
    fn g_is_a_pure_prefix_in_normal_mode() {
        let registry = default_bindings();
        let lookup = registry.lookup(Mode::Normal, &tokens(&["g"]));
        assert!(lookup.exact.is_none());
        assert!(lookup.pending.is_some());

        let lookup = registry.lookup(Mode::Normal, &tokens(&["g", "d"]));
        assert_eq!(lookup.exact.map(Binding::intent), Some(Intent::GitDiff));
        assert!(lookup.pending.is_none());
    }

    #[test]
    fn modes_have_separate_tables() {
        let registry = default_bindings();
        let y = tokens(&["y"]);
        assert!(registry.lookup(Mode::Normal, &y).exact.is_none());
        assert_eq!(registry.lookup(Mode::Visual, &y).exact.map(Binding::intent), Some(Intent::VisualYank));
        assert_eq!(registry.lookup(Mode::Preview, &y).exact.map(Binding::intent), Some(Intent::PreviewCopy));
        assert!(registry.bindings(Mode::Command).is_empty());
    }

    #[test]
    fn no_sequence_is_bound_twice() {
        let registry = default_bindings();
        for mode in [Mode::Normal, Mode::Visual, Mode::Preview] {
            let bindings = registry.bindings(mode);
            for (i, binding) in bindings.iter().enumerate() {
                assert!(
                    bindings[i + 1..].iter().all(|other| other.keys() != binding.keys()),
                    "{mode}: {} bound twice",
                    binding.keys_display()
                );
            }
        }
    }
}
