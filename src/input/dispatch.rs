// SPDX-License-Identifier: GPL-3.0-only

//! Resolution of fired keys into keystrokes.
//!
//! [`dispatch`] maps a key label plus the current [`ModifierState`] to the
//! keystroke that should be injected, updating the modifier state on the way.
//!
//! | Label                      | Keystroke               | Modifier effect     |
//! |----------------------------|-------------------------|---------------------|
//! | `SPACE` `BACK` `ENTER` `TAB` | named key             | none                |
//! | `CAPS`                     | none                    | caps lock flipped   |
//! | `SHIFT`                    | none                    | shift armed         |
//! | single character           | one character           | none                |
//! | anything else              | key name as given       | none                |
//!
//! Shift is cleared after every dispatch other than SHIFT itself, including
//! the CAPS toggle: SHIFT then CAPS leaves shift off.

use super::modifier::ModifierState;
use crate::layout::{KeyAction, NamedKey};
use std::fmt;

/// A keystroke ready for injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// A named, non-printing key.
    Named(NamedKey),
    /// A single printable character, already case-resolved.
    Char(char),
    /// A raw XKB key name taken from the layout label.
    Keysym(String),
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keystroke::Named(named) => f.write_str(named.keysym_name()),
            Keystroke::Char(c) => write!(f, "{:?}", c),
            Keystroke::Keysym(name) => f.write_str(name),
        }
    }
}

/// Characters produced by shift on a US keyboard, keyed by the unshifted
/// label. Letters are absent; they fall back to uppercase.
const SHIFT_TABLE: [(char, char); 21] = [
    ('`', '~'),
    ('1', '!'),
    ('2', '@'),
    ('3', '#'),
    ('4', '$'),
    ('5', '%'),
    ('6', '^'),
    ('7', '&'),
    ('8', '*'),
    ('9', '('),
    ('0', ')'),
    ('-', '_'),
    ('=', '+'),
    ('[', '{'),
    (']', '}'),
    ('\\', '|'),
    (';', ':'),
    ('\'', '"'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
];

/// Shifted form of a printable label.
#[must_use]
pub fn shifted(c: char) -> char {
    SHIFT_TABLE
        .iter()
        .find(|(base, _)| *base == c)
        .map_or_else(|| to_upper(c), |(_, shifted)| *shifted)
}

fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn to_lower(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Resolves a fired key label.
///
/// Returns the keystroke to inject, or `None` for pure modifier toggles.
pub fn dispatch(label: &str, modifiers: &mut ModifierState) -> Option<Keystroke> {
    dispatch_action(&KeyAction::from_label(label), modifiers)
}

/// Resolves an already classified key action.
pub fn dispatch_action(action: &KeyAction, modifiers: &mut ModifierState) -> Option<Keystroke> {
    let keystroke = match action {
        KeyAction::Named(named) => Some(Keystroke::Named(*named)),
        KeyAction::CapsLock => {
            modifiers.toggle_caps_lock();
            None
        }
        KeyAction::Shift => {
            // Survives until the next dispatch
            modifiers.arm_shift();
            return None;
        }
        KeyAction::Printable(c) => {
            let c = if modifiers.shift_active() {
                shifted(*c)
            } else if modifiers.caps_lock() && c.is_alphabetic() {
                to_upper(*c)
            } else {
                to_lower(*c)
            };
            Some(Keystroke::Char(c))
        }
        KeyAction::Keysym(name) => Some(Keystroke::Keysym(name.clone())),
    };

    modifiers.clear_shift();
    keystroke
}

// ============================================================================
// Tests
// ============================================================================
