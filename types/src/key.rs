//! Keyboard events as delivered by the host page.
//!
//! Only the parts of a DOM `KeyboardEvent` the navigation engine looks at are
//! modelled: the logical key and the modifier state.

use serde::{Deserialize, Serialize};

/// The logical key of a keydown event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    /// A printable character.
    Char(char),
    /// Any other named key (`Enter`, `Escape`, `Tab`, `Backspace`...).
    Named(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Named(other.to_string()),
                }
            }
        }
    }
}

/// An auxiliary modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Ctrl,
    Alt,
    Meta,
    Shift,
}

/// Modifier state of a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        meta: false,
        shift: false,
    };

    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Alt => self.alt = true,
            Modifier::Meta => self.meta = true,
            Modifier::Shift => self.shift = true,
        }
        self
    }

    #[must_use]
    pub fn contains(self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
            Modifier::Shift => self.shift,
        }
    }

    /// Ctrl, Alt or Meta held. Shift alone still counts as plain typing.
    #[must_use]
    pub fn has_command_modifier(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A keydown event targeted at the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    #[must_use]
    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }
}
