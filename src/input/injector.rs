// SPDX-License-Identifier: GPL-3.0-only

//! Keystroke injection seam.

use super::dispatch::Keystroke;
use thiserror::Error;

/// Errors raised while injecting keystrokes.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("cannot connect to the Wayland display: {0}")]
    Connect(#[from] wayland_client::ConnectError),

    #[error("cannot read Wayland globals: {0}")]
    Globals(#[from] wayland_client::globals::GlobalError),

    #[error("compositor lacks a required global: {0}")]
    Bind(#[from] wayland_client::globals::BindError),

    #[error("Wayland dispatch failed: {0}")]
    Dispatch(#[from] wayland_client::DispatchError),

    #[error("Wayland connection failed: {0}")]
    Backend(#[from] wayland_client::backend::WaylandError),

    #[error("failed to compile the system XKB keymap")]
    Keymap,

    #[error("failed to share the keymap with the compositor: {0}")]
    KeymapFile(#[from] std::io::Error),

    #[error("no key in the keymap produces {0}")]
    Unmapped(String),
}

/// Sends keystrokes to the focused application.
pub trait KeyInjector {
    /// Presses and releases the key for `keystroke`.
    fn inject(&mut self, keystroke: &Keystroke) -> Result<(), InjectError>;

    /// Short name for log messages.
    fn name(&self) -> &'static str;
}

/// Injects `keystroke`, logging instead of propagating failures.
pub fn inject_logged(injector: &mut dyn KeyInjector, keystroke: &Keystroke) {
    match injector.inject(keystroke) {
        Ok(()) => tracing::debug!("Injected {} via {}", keystroke, injector.name()),
        Err(err) => tracing::warn!("Failed to inject {}: {}", keystroke, err),
    }
}

/// Injector that only logs keystrokes.
///
/// Used when the compositor offers no virtual keyboard.
#[derive(Debug, Default)]
pub struct LoggingInjector;

impl KeyInjector for LoggingInjector {
    fn inject(&mut self, keystroke: &Keystroke) -> Result<(), InjectError> {
        tracing::info!("Typed {}", keystroke);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Injector that records keystrokes for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingInjector {
    pub keystrokes: Vec<Keystroke>,
    pub fail: bool,
}

#[cfg(test)]
impl KeyInjector for RecordingInjector {
    fn inject(&mut self, keystroke: &Keystroke) -> Result<(), InjectError> {
        if self.fail {
            return Err(InjectError::Unmapped(keystroke.to_string()));
        }
        self.keystrokes.push(keystroke.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
