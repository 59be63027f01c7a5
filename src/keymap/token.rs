//! Key normalization: raw key events to canonical [`KeyToken`]s.
//!
//! A token is the string form a binding is written in: `j`, `G`, `C-d`, `M-x`,
//! `S-up`, `escape`, `return`. Modifier prefixes are always ordered `C-`, `M-`,
//! `S-`, and `S-` is left out for single printable characters because their case
//! already encodes shift.

use std::fmt;
use zellij_tile::prelude::{BareKey, KeyModifier, KeyWithModifier};

/// Canonical string identifying one key press plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyToken(String);

impl KeyToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the digit value if this token is a bare `0`-`9`.
    #[must_use]
    pub fn digit(&self) -> Option<char> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for KeyToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Non-character keys that map to fixed lowercase token names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Up,
    Down,
    Left,
    Right,
    Return,
    Escape,
    Backspace,
    Delete,
    Tab,
    PageUp,
    PageDown,
}

impl SpecialKey {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Return => "return",
            Self::Escape => "escape",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Tab => "tab",
            Self::PageUp => "pageup",
            Self::PageDown => "pagedown",
        }
    }
}

/// Modifier flags held while a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    #[must_use]
    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            meta: false,
            shift: false,
        }
    }
}

/// A key event before normalization.
///
/// `text` is the character the key produced (empty for special keys), and
/// `special` flags a named key, which takes precedence over `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawKey {
    pub text: String,
    pub modifiers: Modifiers,
    pub special: Option<SpecialKey>,
}

impl RawKey {
    /// A plain character key with no modifiers.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self {
            text: c.to_string(),
            ..Self::default()
        }
    }

    /// A named key with no modifiers.
    #[must_use]
    pub fn special(key: SpecialKey) -> Self {
        Self {
            special: Some(key),
            ..Self::default()
        }
    }

    /// A character key with modifiers.
    #[must_use]
    pub fn with_modifiers(c: char, modifiers: Modifiers) -> Self {
        Self {
            text: c.to_string(),
            modifiers,
            special: None,
        }
    }

    /// Converts a Zellij key event.
    ///
    /// Returns `None` for keys that have no token (function keys, Home/End,
    /// lock keys). Zellij's `Alt` modifier is reported as meta; `Super` is
    /// ignored.
    #[must_use]
    pub fn from_zellij(key: &KeyWithModifier) -> Option<Self> {
        let modifiers = Modifiers {
            ctrl: key.key_modifiers.contains(&KeyModifier::Ctrl),
            meta: key.key_modifiers.contains(&KeyModifier::Alt),
            shift: key.key_modifiers.contains(&KeyModifier::Shift),
        };

        let special = match key.bare_key {
            BareKey::Char(c) => {
                return Some(Self {
                    text: c.to_string(),
                    modifiers,
                    special: None,
                })
            }
            BareKey::Up => SpecialKey::Up,
            BareKey::Down => SpecialKey::Down,
            BareKey::Left => SpecialKey::Left,
            BareKey::Right => SpecialKey::Right,
            BareKey::Enter => SpecialKey::Return,
            BareKey::Esc => SpecialKey::Escape,
            BareKey::Backspace => SpecialKey::Backspace,
            BareKey::Delete => SpecialKey::Delete,
            BareKey::Tab => SpecialKey::Tab,
            BareKey::PageUp => SpecialKey::PageUp,
            BareKey::PageDown => SpecialKey::PageDown,
            _ => return None,
        };

        Some(Self {
            text: String::new(),
            modifiers,
            special: Some(special),
        })
    }

    /// Whether this key inserts text in the free-text input modes: a plain
    /// character, with no named key and no ctrl/meta chord.
    #[must_use]
    pub fn printable(&self) -> Option<&str> {
        if self.special.is_some() || self.modifiers.ctrl || self.modifiers.meta || self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }
}

/// Maps a raw key event to its canonical token.
///
/// # Examples
///
/// ```
/// use voy::keymap::token::{normalize, Modifiers, SpecialKey};
///
/// assert_eq!(normalize("d", Modifiers::ctrl(), None).as_str(), "C-d");
/// let shift = Modifiers { shift: true, ..Modifiers::NONE };
/// assert_eq!(normalize("", shift, Some(SpecialKey::Up)).as_str(), "S-up");
/// assert_eq!(normalize("G", shift, None).as_str(), "G");
/// ```
#[must_use]
pub fn normalize(raw: &str, modifiers: Modifiers, special: Option<SpecialKey>) -> KeyToken {
    let (base, modifiers) = match special {
        Some(SpecialKey::Escape) => (SpecialKey::Escape.name(), Modifiers::NONE),
        Some(key) => (key.name(), modifiers),
        None => (raw, modifiers),
    };

    let mut token = String::with_capacity(base.len() + 6);
    if modifiers.ctrl {
        token.push_str("C-");
    }
    if modifiers.meta {
        token.push_str("M-");
    }
    if modifiers.shift && base.chars().count() > 1 {
        token.push_str("S-");
    }
    token.push_str(base);
    KeyToken(token)
}

/// Normalizes a [`RawKey`].
#[must_use]
pub fn normalize_key(key: &RawKey) -> KeyToken {
    normalize(&key.text, key.modifiers, key.special)
}
