//! Binding registry: per-mode ordered lists of key sequences.
//!
//! Matching is by full-sequence equality (exact) or strict prefix (pending).
//! Registration order only affects iteration, so when two bindings share a
//! sequence the first one registered wins.

use crate::app::Mode;
use crate::keymap::intent::Intent;
use crate::keymap::token::KeyToken;
use std::collections::HashMap;

/// One key sequence bound to an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    keys: Vec<KeyToken>,
    description: String,
    intent: Intent,
}

impl Binding {
    /// Creates a binding from token strings, e.g. `&["g", "g"]`.
    #[must_use]
    pub fn new(keys: &[&str], description: impl Into<String>, intent: Intent) -> Self {
        Self {
            keys: keys.iter().map(|k| KeyToken::from(*k)).collect(),
            description: description.into(),
            intent,
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[KeyToken] {
        &self.keys
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn intent(&self) -> Intent {
        self.intent
    }

    /// Keys joined for display, e.g. `gg` or `C-d`.
    #[must_use]
    pub fn keys_display(&self) -> String {
        self.keys
            .iter()
            .map(|k| if k.as_str() == " " { "space" } else { k.as_str() })
            .collect()
    }
}

/// Result of looking a token buffer up in the registry.
///
/// The two outcomes are kept apart: `exact` is what a timer fallback may run,
/// `pending` is only evidence that a longer sequence could still match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookup<'a> {
    /// Binding whose sequence equals the buffer.
    pub exact: Option<&'a Binding>,
    /// A binding strictly longer than the buffer that starts with it.
    pub pending: Option<&'a Binding>,
}

/// Mapping from mode to the bindings active in it.
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    bindings: HashMap<Mode, Vec<Binding>>,
}

impl BindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding to `mode`. Bindings without keys are ignored.
    pub fn register(&mut self, mode: Mode, binding: Binding) {
        if binding.keys.is_empty() {
            tracing::warn!(description = %binding.description, "ignoring binding with no keys");
            return;
        }
        self.bindings.entry(mode).or_default().push(binding);
    }

    /// Bindings registered for `mode`, in registration order.
    #[must_use]
    pub fn bindings(&self, mode: Mode) -> &[Binding] {
        self.bindings.get(&mode).map_or(&[], Vec::as_slice)
    }

    /// Finds the exact and pending matches for `sequence` in `mode`.
    #[must_use]
    pub fn lookup(&self, mode: Mode, sequence: &[KeyToken]) -> Lookup<'_> {
        let mut lookup = Lookup::default();
        if sequence.is_empty() {
            return lookup;
        }

        for binding in self.bindings(mode) {
            if lookup.exact.is_none() && binding.keys == sequence {
                lookup.exact = Some(binding);
            } else if lookup.pending.is_none()
                && binding.keys.len() > sequence.len()
                && binding.keys.starts_with(sequence)
            {
                lookup.pending = Some(binding);
            }

            if lookup.exact.is_some() && lookup.pending.is_some() {
                break;
            }
        }

        lookup
    }
}
