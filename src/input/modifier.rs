// SPDX-License-Identifier: GPL-3.0-only

//! Modifier state for the pinch keyboard.
//!
//! Two modifiers are tracked:
//!
//! - **Caps lock**: toggled by the CAPS key, stays active until toggled again
//! - **Shift**: armed by the SHIFT key, applies to the next dispatch only
//!
//! # Example
//!
//! ```rust,ignore
//! use airboard::input::ModifierState;
//!
//! let mut state = ModifierState::new();
//!
//! state.arm_shift();
//! assert!(state.shift_active());
//!
//! // ... the next key is dispatched ...
//!
//! state.clear_shift();
//! ```

/// Tracks caps lock and the one-shot shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    caps_lock: bool,
    shift_active: bool,
}

impl ModifierState {
    /// Creates a state with no active modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips caps lock.
    ///
    /// # Returns
    ///
    /// `true` if caps lock is now on
    pub fn toggle_caps_lock(&mut self) -> bool {
        self.caps_lock = !self.caps_lock;
        tracing::debug!("Caps lock {}", if self.caps_lock { "on" } else { "off" });
        self.caps_lock
    }

    /// Arms shift for the next dispatched key.
    pub fn arm_shift(&mut self) {
        self.shift_active = true;
    }

    /// Disarms shift.
    pub fn clear_shift(&mut self) {
        self.shift_active = false;
    }

    #[must_use]
    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    #[must_use]
    pub fn shift_active(&self) -> bool {
        self.shift_active
    }

    /// Whether the modifier bound to a key action is currently on.
    ///
    /// Non-modifier actions are never active.
    #[must_use]
    pub fn is_engaged(&self, action: &crate::layout::KeyAction) -> bool {
        use crate::layout::KeyAction;

        match action {
            KeyAction::CapsLock => self.caps_lock,
            KeyAction::Shift => self.shift_active,
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
