// SPDX-License-Identifier: GPL-3.0-only

//! Virtual keyboard protocol handling for Wayland input injection.
//!
//! Keystrokes are sent through the compositor's `zwp_virtual_keyboard_v1`
//! protocol. Setup goes as follows:
//!
//! 1. Compile the system XKB keymap (XKB_DEFAULT_* environment or defaults)
//! 2. Bind the seat and the virtual keyboard manager
//! 3. Upload the keymap text through a file descriptor
//!
//! Each keystroke is then resolved to an evdev keycode by scanning the keymap.
//! Characters that live on the shift level of their key are sent with the
//! shift modifier depressed around the press/release pair.
//!
//! # Example
//!
//! ```rust,ignore
//! use airboard::input::{KeyInjector, Keystroke, VirtualKeyboard};
//!
//! let mut vk = VirtualKeyboard::connect()?;
//! vk.inject(&Keystroke::Char('!'))?;
//! ```

use super::dispatch::Keystroke;
use super::injector::{InjectError, KeyInjector};
use std::fs::File;
use std::io::Write;
use std::os::fd::AsFd;
use std::time::Instant;
use wayland_client::globals::{registry_queue_init, GlobalListContents};
use wayland_client::protocol::wl_keyboard::KeymapFormat;
use wayland_client::protocol::wl_registry::{self, WlRegistry};
use wayland_client::protocol::wl_seat::WlSeat;
use wayland_client::{delegate_noop, Connection, Dispatch, EventQueue, QueueHandle};
use wayland_protocols_misc::zwp_virtual_keyboard_v1::client::zwp_virtual_keyboard_manager_v1::ZwpVirtualKeyboardManagerV1;
use wayland_protocols_misc::zwp_virtual_keyboard_v1::client::zwp_virtual_keyboard_v1::ZwpVirtualKeyboardV1;
use xkbcommon::xkb;
use xkbcommon::xkb::keysyms::KEY_NoSymbol;
use xkbcommon::xkb::Keysym;

/// Key event state for virtual keyboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released = 0,
    Pressed = 1,
}

/// One protocol request emitted for a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Sets the depressed modifier mask.
    Modifiers { depressed: u32 },
    /// Presses or releases an evdev keycode.
    Key { keycode: u32, state: KeyState },
}

/// Where a keysym lives in the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLookup {
    /// Evdev keycode (XKB keycode minus 8).
    pub keycode: u32,
    /// Whether the keysym sits on the shift level.
    pub shifted: bool,
}

/// Builds the request sequence for pressing and releasing one key.
#[must_use]
pub fn key_events(lookup: KeyLookup, shift_mask: u32) -> Vec<KeyEvent> {
    let press = KeyEvent::Key {
        keycode: lookup.keycode,
        state: KeyState::Pressed,
    };
    let release = KeyEvent::Key {
        keycode: lookup.keycode,
        state: KeyState::Released,
    };

    if lookup.shifted {
        vec![
            KeyEvent::Modifiers {
                depressed: shift_mask,
            },
            press,
            release,
            KeyEvent::Modifiers { depressed: 0 },
        ]
    } else {
        vec![press, release]
    }
}

// ============================================================================
// Keymap
// ============================================================================

/// The system XKB keymap and keysym to keycode lookups.
pub struct KeymapResolver {
    keymap: xkb::Keymap,
    shift_mask: u32,
}

impl std::fmt::Debug for KeymapResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeymapResolver")
            .field("shift_mask", &self.shift_mask)
            .finish_non_exhaustive()
    }
}

impl KeymapResolver {
    /// Compiles the default system keymap.
    pub fn from_system() -> Result<Self, InjectError> {
        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = xkb::Keymap::new_from_names(
            &context,
            &"",
            &"",
            &"",
            &"",
            None,
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or(InjectError::Keymap)?;

        let shift_index = keymap.mod_get_index(xkb::MOD_NAME_SHIFT);
        let shift_mask = 1u32.checked_shl(shift_index).unwrap_or(0);

        Ok(Self { keymap, shift_mask })
    }

    /// Keymap in the text format expected by the compositor.
    #[must_use]
    pub fn keymap_text(&self) -> String {
        self.keymap.get_as_string(xkb::KEYMAP_FORMAT_TEXT_V1)
    }

    #[must_use]
    pub fn shift_mask(&self) -> u32 {
        self.shift_mask
    }

    /// Finds the key producing `keystroke`.
    #[must_use]
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<KeyLookup> {
        match keystroke {
            Keystroke::Named(named) => self.keysym_name_to_key(named.keysym_name()),
            Keystroke::Char(c) => self.char_to_key(*c),
            Keystroke::Keysym(name) => self.keysym_name_to_key(name),
        }
    }

    fn keysym_name_to_key(&self, name: &str) -> Option<KeyLookup> {
        let no_symbol: Keysym = KEY_NoSymbol.into();

        let mut keysym = xkb::keysym_from_name(name, xkb::KEYSYM_NO_FLAGS);
        if keysym == no_symbol {
            keysym = xkb::keysym_from_name(name, xkb::KEYSYM_CASE_INSENSITIVE);
        }
        if keysym == no_symbol {
            return None;
        }

        self.find_key(keysym)
    }

    fn char_to_key(&self, c: char) -> Option<KeyLookup> {
        let keysym = xkb::utf32_to_keysym(c as u32);
        let no_symbol: Keysym = KEY_NoSymbol.into();
        if keysym == no_symbol {
            return None;
        }
        self.find_key(keysym)
    }

    /// Scans the first two shift levels of every key, preferring the
    /// unshifted level.
    fn find_key(&self, target: Keysym) -> Option<KeyLookup> {
        let min = self.keymap.min_keycode().raw();
        let max = self.keymap.max_keycode().raw();
        let mut shifted_match = None;

        for raw in min.max(8)..=max {
            let keycode = xkb::Keycode::new(raw);
            for layout in 0..self.keymap.num_layouts_for_key(keycode) {
                let levels = self.keymap.num_levels_for_key(keycode, layout).min(2);
                for level in 0..levels {
                    let syms = self.keymap.key_get_syms_by_level(keycode, layout, level);
                    if !syms.contains(&target) {
                        continue;
                    }
                    let lookup = KeyLookup {
                        keycode: raw - 8,
                        shifted: level == 1,
                    };
                    if !lookup.shifted {
                        return Some(lookup);
                    }
                    shifted_match.get_or_insert(lookup);
                }
            }
        }

        shifted_match
    }
}

// ============================================================================
// Wayland
// ============================================================================

struct WaylandState;

impl Dispatch<WlRegistry, GlobalListContents> for WaylandState {
    fn event(
        _state: &mut Self,
        _proxy: &WlRegistry,
        _event: wl_registry::Event,
        _data: &GlobalListContents,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
    }
}

delegate_noop!(WaylandState: ignore WlSeat);
delegate_noop!(WaylandState: ZwpVirtualKeyboardManagerV1);
delegate_noop!(WaylandState: ZwpVirtualKeyboardV1);

/// Injector backed by a Wayland virtual keyboard.
pub struct VirtualKeyboard {
    connection: Connection,
    keyboard: ZwpVirtualKeyboardV1,
    resolver: KeymapResolver,
    started: Instant,
    // Held until the keyboard is destroyed; the compositor maps it lazily.
    _keymap_file: File,
    _queue: EventQueue<WaylandState>,
}

impl std::fmt::Debug for VirtualKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualKeyboard")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl VirtualKeyboard {
    /// Connects to the compositor and registers a virtual keyboard with the
    /// system keymap.
    pub fn connect() -> Result<Self, InjectError> {
        let resolver = KeymapResolver::from_system()?;

        let connection = Connection::connect_to_env()?;
        let (globals, mut queue) = registry_queue_init::<WaylandState>(&connection)?;
        let qh = queue.handle();

        let seat: WlSeat = globals.bind(&qh, 1..=7, ())?;
        let manager: ZwpVirtualKeyboardManagerV1 = globals.bind(&qh, 1..=1, ())?;
        let keyboard = manager.create_virtual_keyboard(&seat, &qh, ());

        let keymap_file = write_keymap_file(&resolver.keymap_text())?;
        let size = keymap_file.metadata()?.len() as u32;
        keyboard.keymap(KeymapFormat::XkbV1 as u32, keymap_file.as_fd(), size);

        queue.roundtrip(&mut WaylandState)?;
        tracing::info!("Virtual keyboard registered ({} byte keymap)", size);

        Ok(Self {
            connection,
            keyboard,
            resolver,
            started: Instant::now(),
            _keymap_file: keymap_file,
            _queue: queue,
        })
    }

    /// Milliseconds since the keyboard was created.
    fn timestamp(&self) -> u32 {
        (self.started.elapsed().as_millis() % u128::from(u32::MAX)) as u32
    }

    fn send(&self, events: &[KeyEvent]) -> Result<(), InjectError> {
        let time = self.timestamp();
        for event in events {
            match *event {
                KeyEvent::Modifiers { depressed } => self.keyboard.modifiers(depressed, 0, 0, 0),
                KeyEvent::Key { keycode, state } => self.keyboard.key(time, keycode, state as u32),
            }
        }
        self.connection.flush()?;
        Ok(())
    }
}

impl KeyInjector for VirtualKeyboard {
    fn inject(&mut self, keystroke: &Keystroke) -> Result<(), InjectError> {
        let lookup = self
            .resolver
            .lookup(keystroke)
            .ok_or_else(|| InjectError::Unmapped(keystroke.to_string()))?;

        tracing::debug!(
            "Sending {} as keycode {} (shifted: {})",
            keystroke,
            lookup.keycode,
            lookup.shifted
        );
        self.send(&key_events(lookup, self.resolver.shift_mask()))
    }

    fn name(&self) -> &'static str {
        "virtual keyboard"
    }
}

impl Drop for VirtualKeyboard {
    fn drop(&mut self) {
        self.keyboard.destroy();
        if let Err(err) = self.connection.flush() {
            tracing::debug!("Flush on virtual keyboard teardown failed: {}", err);
        }
        tracing::info!("Virtual keyboard released");
    }
}

/// Writes the NUL-terminated keymap text to an anonymous file.
fn write_keymap_file(keymap: &str) -> Result<File, InjectError> {
    let mut file = tempfile::tempfile()?;
    file.write_all(keymap.as_bytes())?;
    file.write_all(&[0])?;
    file.flush()?;
    Ok(file)
}

// ============================================================================
// Tests
// ============================================================================
