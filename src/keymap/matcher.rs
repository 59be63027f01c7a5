//! Multi-key sequence matcher with timeout disambiguation.
//!
//! The [`KeyBuffer`] collects tokens since the last dispatch and resolves them
//! against the [`BindingRegistry`] for the active mode:
//!
//! ```text
//!            digit, buffer empty
//!          ┌──────────────────┐
//!          ▼                  │
//!        Idle ──token──▶ Collecting ──exact, nothing longer──▶ Dispatch ─▶ Idle
//!          ▲                  │   │
//!          │                  │   └──prefix of longer binding──▶ Pending (timer armed)
//!          └──no match────────┘
//! ```
//!
//! A pending buffer arms a timer. If the timer fires before another token
//! arrives, the exact binding recorded at that point (if any) runs once. Zellij
//! timers cannot be canceled, so each arm gets a fresh [`TimerId`] and a fire
//! whose id is no longer the pending one is ignored.

use crate::app::Mode;
use crate::keymap::intent::Intent;
use crate::keymap::registry::BindingRegistry;
use crate::keymap::token::KeyToken;

/// Identifies one armed disambiguation timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// A binding ready to run, with its resolved repeat count.
///
/// `count` is `0` when no numeric prefix was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub intent: Intent,
    pub count: usize,
}

/// What the matcher did with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The token was a digit typed while idle and extended the repeat count.
    Count,
    /// An exact match with no longer candidate: run it now.
    Dispatch(Dispatch),
    /// The buffer is a prefix of a longer binding. Arm `timer`; when it fires,
    /// pass it to [`KeyBuffer::on_timeout`].
    Pending { timer: TimerId, fallback: Option<Intent> },
    /// Nothing matched; tokens and count were discarded.
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    id: TimerId,
    fallback: Option<Dispatch>,
}

/// Tokens typed since the last dispatch or reset.
#[derive(Debug, Clone, Default)]
pub struct KeyBuffer {
    tokens: Vec<KeyToken>,
    count: String,
    pending: Option<PendingTimer>,
    next_timer: u64,
}

impl KeyBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one token and resolves the buffer against `registry` for `mode`.
    ///
    /// Any outstanding timer is canceled first. Digits only build a count while
    /// no tokens are buffered, so `g3g` does not capture `3`.
    pub fn feed(&mut self, registry: &BindingRegistry, mode: Mode, token: KeyToken) -> Resolution {
        self.pending = None;

        if self.tokens.is_empty() {
            if let Some(digit) = token.digit() {
                self.count.push(digit);
                return Resolution::Count;
            }
        }

        self.tokens.push(token);
        let lookup = registry.lookup(mode, &self.tokens);
        let count = self.resolved_count();

        if lookup.pending.is_some() {
            self.next_timer += 1;
            let id = TimerId(self.next_timer);
            let fallback = lookup.exact.map(|binding| Dispatch {
                intent: binding.intent(),
                count,
            });
            self.pending = Some(PendingTimer { id, fallback });

            tracing::debug!(
                keys = %self.keys_display(),
                timer = id.0,
                has_fallback = fallback.is_some(),
                "key sequence pending"
            );
            return Resolution::Pending {
                timer: id,
                fallback: fallback.map(|d| d.intent),
            };
        }

        let resolution = match lookup.exact {
            Some(binding) => {
                tracing::debug!(keys = %self.keys_display(), count, "key sequence matched");
                Resolution::Dispatch(Dispatch {
                    intent: binding.intent(),
                    count,
                })
            }
            None => {
                tracing::debug!(keys = %self.keys_display(), "no binding for key sequence");
                Resolution::NoMatch
            }
        };
        self.reset();
        resolution
    }

    /// Handles a fired disambiguation timer.
    ///
    /// Returns the recorded fallback when `id` is the timer still pending; the
    /// buffer is cleared in that case even without a fallback. Fires for
    /// superseded timers return `None` and leave the buffer untouched.
    pub fn on_timeout(&mut self, id: TimerId) -> Option<Dispatch> {
        let pending = self.pending?;
        if pending.id != id {
            tracing::trace!(timer = id.0, pending = pending.id.0, "stale timer ignored");
            return None;
        }

        tracing::debug!(
            keys = %self.keys_display(),
            has_fallback = pending.fallback.is_some(),
            "key sequence timed out"
        );
        self.reset();
        pending.fallback
    }

    /// Clears tokens, count and any pending timer.
    pub fn reset(&mut self) {
        self.tokens.clear();
        self.count.clear();
        self.pending = None;
    }

    /// The id of the timer currently waiting, if any.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending.map(|p| p.id)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tokens.is_empty() && self.count.is_empty()
    }

    /// Count prefix and tokens typed so far, e.g. `3g`.
    #[must_use]
    pub fn keys_display(&self) -> String {
        let mut out = self.count.clone();
        for token in &self.tokens {
            out.push_str(token.as_str());
        }
        out
    }

    fn resolved_count(&self) -> usize {
        if self.count.is_empty() {
            return 0;
        }
        self.count.parse().unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::registry::Binding;

    fn registry() -> BindingRegistry {
        let mut registry = BindingRegistry::new();
        registry.register(Mode::Normal, Binding::new(&["j"], "down", Intent::MoveDown));
        registry.register(Mode::Normal, Binding::new(&["g", "g"], "top", Intent::GoTop));
        registry.register(Mode::Normal, Binding::new(&["d"], "cut", Intent::Cut));
        registry.register(Mode::Normal, Binding::new(&["d", "d"], "delete", Intent::Delete));
        registry
    }

    fn feed(buffer: &mut KeyBuffer, registry: &BindingRegistry, key: &str) -> Resolution {
        buffer.feed(registry, Mode::Normal, KeyToken::from(key))
    }

    #[test]
    fn single_key_dispatches_immediately() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        assert_eq!(
            feed(&mut buffer, &registry, "j"),
            Resolution::Dispatch(Dispatch {
                intent: Intent::MoveDown,
                count: 0
            })
        );
        assert!(buffer.is_idle());
    }

    #[test]
    fn count_prefix_reaches_dispatch() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        assert_eq!(feed(&mut buffer, &registry, "1"), Resolution::Count);
        assert_eq!(feed(&mut buffer, &registry, "2"), Resolution::Count);
        assert_eq!(
            feed(&mut buffer, &registry, "j"),
            Resolution::Dispatch(Dispatch {
                intent: Intent::MoveDown,
                count: 12
            })
        );
    }

    #[test]
    fn digits_inside_a_sequence_are_not_counts() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        assert!(matches!(feed(&mut buffer, &registry, "g"), Resolution::Pending { .. }));
        assert_eq!(feed(&mut buffer, &registry, "3"), Resolution::NoMatch);
        assert!(buffer.is_idle());
    }

    #[test]
    fn ambiguous_prefix_waits_with_fallback() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        let Resolution::Pending { timer, fallback } = feed(&mut buffer, &registry, "d") else {
            panic!("expected pending");
        };
        assert_eq!(fallback, Some(Intent::Cut));
        assert_eq!(
            buffer.on_timeout(timer),
            Some(Dispatch {
                intent: Intent::Cut,
                count: 0
            })
        );
        assert!(buffer.is_idle());
        assert_eq!(buffer.on_timeout(timer), None);
    }

    #[test]
    fn second_key_supersedes_the_timer() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        let Resolution::Pending { timer, .. } = feed(&mut buffer, &registry, "d") else {
            panic!("expected pending");
        };
        assert_eq!(
            feed(&mut buffer, &registry, "d"),
            Resolution::Dispatch(Dispatch {
                intent: Intent::Delete,
                count: 0
            })
        );
        assert_eq!(buffer.on_timeout(timer), None);
    }

    #[test]
    fn timeout_without_fallback_discards() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        let Resolution::Pending { timer, fallback } = feed(&mut buffer, &registry, "g") else {
            panic!("expected pending");
        };
        assert_eq!(fallback, None);
        assert_eq!(buffer.on_timeout(timer), None);
        assert!(buffer.is_idle());
    }

    #[test]
    fn rearming_invalidates_older_timer() {
        let mut registry = registry();
        registry.register(Mode::Normal, Binding::new(&["z", "z", "z"], "deep", Intent::Quit));
        let mut buffer = KeyBuffer::new();
        let Resolution::Pending { timer: first, .. } = feed(&mut buffer, &registry, "z") else {
            panic!("expected pending");
        };
        let Resolution::Pending { timer: second, .. } = feed(&mut buffer, &registry, "z") else {
            panic!("expected pending");
        };
        assert_ne!(first, second);
        assert_eq!(buffer.on_timeout(first), None);
        assert_eq!(buffer.keys_display(), "zz");
        assert_eq!(buffer.on_timeout(second), None);
        assert!(buffer.is_idle());
    }

    #[test]
    fn fallback_keeps_the_count() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        feed(&mut buffer, &registry, "2");
        let Resolution::Pending { timer, .. } = feed(&mut buffer, &registry, "d") else {
            panic!("expected pending");
        };
        assert_eq!(buffer.on_timeout(timer).map(|d| d.count), Some(2));
    }

    #[test]
    fn oversized_count_saturates() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        for _ in 0..40 {
            feed(&mut buffer, &registry, "9");
        }
        let Resolution::Dispatch(dispatch) = feed(&mut buffer, &registry, "j") else {
            panic!("expected dispatch");
        };
        assert_eq!(dispatch.count, usize::MAX);
    }

    #[test]
    fn unknown_key_clears_count() {
        let registry = registry();
        let mut buffer = KeyBuffer::new();
        feed(&mut buffer, &registry, "5");
        assert_eq!(feed(&mut buffer, &registry, "Z"), Resolution::NoMatch);
        assert!(buffer.is_idle());
    }
}
