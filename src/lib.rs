// SPDX-License-Identifier: GPL-3.0-only

//! Airboard - an air keyboard overlay for COSMIC
//!
//! The overlay shows a keyboard next to a mirrored webcam preview. A hand
//! tracker reports finger landmarks for every frame; pinching thumb and
//! index finger over a key types it into the focused application through
//! the Wayland virtual keyboard protocol.
//!
//! # Architecture
//!
//! One periodic tick drives everything in order: frame capture, hand
//! tracking, gesture evaluation, dispatch and redraw. All mutable state lives
//! in the [`session::TypingSession`] owned by the application model.
//!
//! # Modules
//!
//! - `app`: Main application model and COSMIC Application trait implementation
//! - `app_settings`: Centralized application constants
//! - `config`: User configuration with cosmic_config persistence
//! - `gesture`: Hand landmarks, pinch detection and debounce
//! - `i18n`: Localization support using fluent translations
//! - `input`: Key dispatch, modifier state and keystroke injection
//! - `layout`: Key rectangles and hit-testing
//! - `overlay`: Palettes, key flashes and key rendering
//! - `session`: Per-frame typing state machine
//! - `vision`: Camera capture, hand tracker sidecar and preview rendering

pub mod app;
pub mod app_settings;
pub mod config;
pub mod gesture;
pub mod i18n;
pub mod input;
pub mod layout;
pub mod overlay;
pub mod session;
pub mod vision;

// Re-export the fl! macro for localization
pub use crate::i18n::LANGUAGE_LOADER;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use crate::gesture::{
        evaluate, FrameSize, GestureConfig, GestureState, Hand, Landmark, HAND_LANDMARK_COUNT,
        INDEX_FINGER_TIP, THUMB_TIP,
    };
    use crate::input::injector::RecordingInjector;
    use crate::input::{dispatch, Keystroke, ModifierState};
    use crate::layout::{build_layout, LayoutSpec, NamedKey, Point, Size};
    use crate::session::TypingSession;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    /// Integration Test 1: Single key pinched over its rectangle types it
    ///
    /// A single 55×55 key at (100, 100); fingertip (120, 120) and thumb
    /// (122, 118) are about 2.8 px apart.
    #[test]
    fn test_single_key_pinch_types_lowercase() {
        let layout = build_layout(
            &[vec!["A"]],
            Size::new(55.0, 55.0),
            &HashMap::new(),
            5.0,
            Point::new(100.0, 100.0),
        );
        let config = GestureConfig::default();
        let now = Instant::now();

        let evaluation = evaluate(
            Point::new(120.0, 120.0),
            Point::new(122.0, 118.0),
            &layout,
            None,
            None,
            now,
            &config,
        );
        assert!(evaluation.should_fire);
        let key = evaluation.fired_key().expect("A fires");
        assert_eq!(key.label, "A");

        let mut modifiers = ModifierState::new();
        assert_eq!(dispatch(&key.label, &mut modifiers), Some(Keystroke::Char('a')));
    }

    /// Integration Test 2: Debounce window after a fire
    #[test]
    fn test_debounce_window() {
        let layout = LayoutSpec::default().build();
        let config = GestureConfig::default();
        let mut state = GestureState::new();
        let t0 = Instant::now();
        let rect = layout.key("A").expect("A").rect;
        let tip = Point::new(rect.x1 + 10.0, rect.y1 + 10.0);

        state.record_fire("A", t0);
        for (elapsed_ms, fires) in [(100, false), (400, false), (401, true)] {
            let evaluation = evaluate(
                tip,
                tip,
                &layout,
                state.last_fired(),
                state.last_fired_at(),
                t0 + Duration::from_millis(elapsed_ms),
                &config,
            );
            assert_eq!(evaluation.should_fire, fires, "At {} ms", elapsed_ms);
        }
    }

    /// Integration Test 3: SHIFT, CAPS and plain keys in sequence
    #[test]
    fn test_modifier_sequence() {
        let mut modifiers = ModifierState::new();
        let typed: Vec<Option<Keystroke>> = ["SHIFT", "1", "1", "CAPS", "A", "SHIFT", "A", "b", "ENTER"]
            .into_iter()
            .map(|label| dispatch(label, &mut modifiers))
            .collect();

        assert_eq!(
            typed,
            vec![
                None,
                Some(Keystroke::Char('!')),
                Some(Keystroke::Char('1')),
                None,
                Some(Keystroke::Char('A')),
                None,
                Some(Keystroke::Char('A')),
                Some(Keystroke::Char('B')),
                Some(Keystroke::Named(NamedKey::Enter)),
            ]
        );
        assert!(modifiers.caps_lock());
        assert!(!modifiers.shift_active(), "Shift is one-shot");
    }

    /// Integration Test 4: Typing "Hi!" by pinching in front of the camera
    #[test]
    fn test_session_types_word() {
        let mut session = TypingSession::new(LayoutSpec::default().build(), GestureConfig::default(), 5);
        let mut injector = RecordingInjector::default();
        let frame = FrameSize::new(1000, 1000);
        let t0 = Instant::now();

        let pinch_over = |label: &str| -> Hand {
            let rect = session.layout().key(label).expect("label in layout").rect;
            let mut landmarks = vec![Landmark::default(); HAND_LANDMARK_COUNT];
            landmarks[INDEX_FINGER_TIP] = Landmark::new((rect.x1 + 10.0) / 1000.0, (rect.y1 + 10.0) / 1000.0);
            landmarks[THUMB_TIP] = Landmark::new((rect.x1 + 12.0) / 1000.0, (rect.y1 + 10.0) / 1000.0);
            Hand::new(landmarks)
        };
        let hands: Vec<Hand> = ["SHIFT", "H", "I", "SHIFT", "1"].into_iter().map(pinch_over).collect();

        for (step, hand) in hands.into_iter().enumerate() {
            let now = t0 + Duration::from_millis(20 * step as u64);
            session.on_frame(&[hand], frame, now, &mut injector);
        }

        assert_eq!(
            injector.keystrokes,
            vec![Keystroke::Char('H'), Keystroke::Char('i'), Keystroke::Char('!')]
        );
    }
}
