// SPDX-License-Identifier: GPL-3.0-only

//! Input handling for the pinch keyboard.
//!
//! This module turns fired key labels into keystrokes and sends them to the
//! focused application.
//!
//! # Features
//!
//! - **Dispatch**: resolve a label against caps lock and one-shot shift
//! - **Modifier state**: track caps lock and shift between key presses
//! - **Virtual keyboard**: emit key events via Wayland's `zwp_virtual_keyboard_v1`
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use airboard::input::{dispatch, inject_logged, LoggingInjector, ModifierState};
//!
//! let mut modifiers = ModifierState::new();
//! let mut injector = LoggingInjector;
//!
//! for label in ["SHIFT", "1", "A"] {
//!     if let Some(keystroke) = dispatch(label, &mut modifiers) {
//!         inject_logged(&mut injector, &keystroke);
//!     }
//! }
//! ```

pub mod dispatch;
pub mod injector;
pub mod modifier;
pub mod virtual_keyboard;

pub use dispatch::{dispatch, dispatch_action, shifted, Keystroke};
pub use injector::{inject_logged, InjectError, KeyInjector, LoggingInjector};
pub use modifier::ModifierState;
pub use virtual_keyboard::{KeymapResolver, VirtualKeyboard};

/// Connects the Wayland virtual keyboard, falling back to logging keystrokes
/// when the compositor does not offer one.
#[must_use]
pub fn connect_injector() -> Box<dyn KeyInjector> {
    match VirtualKeyboard::connect() {
        Ok(keyboard) => Box::new(keyboard),
        Err(err) => {
            tracing::warn!("Virtual keyboard unavailable ({}); keystrokes will only be logged", err);
            Box::new(LoggingInjector)
        }
    }
}

// ============================================================================
// Module Tests
// ============================================================================
