// SPDX-License-Identifier: GPL-3.0-only

//! The typing session: everything one vision tick reads and writes.
//!
//! A [`TypingSession`] owns the layout together with the gesture, modifier
//! and flash state. The application feeds it the hands of every successfully
//! read frame; the session evaluates each hand, dispatches fired keys and
//! records what the overlay should highlight.

use crate::gesture::{evaluate_with_state, FrameSize, GestureConfig, GestureState, Hand, INDEX_FINGER_TIP};
use crate::input::{dispatch_action, inject_logged, KeyInjector, ModifierState};
use crate::layout::{Key, Layout};
use crate::overlay::FlashCounters;
use std::time::Instant;

/// Minimum landmark count for a hand to be evaluated.
pub const MIN_LANDMARKS: usize = INDEX_FINGER_TIP + 1;

/// State of an active typing session.
#[derive(Debug, Clone)]
pub struct TypingSession {
    layout: Layout,
    gesture: GestureState,
    modifiers: ModifierState,
    flashes: FlashCounters,
    /// Layout indices of keys under a fingertip on the last frame.
    hovered: Vec<usize>,
    config: GestureConfig,
    flash_ticks: u8,
}

impl TypingSession {
    #[must_use]
    pub fn new(layout: Layout, config: GestureConfig, flash_ticks: u8) -> Self {
        Self {
            layout,
            gesture: GestureState::new(),
            modifiers: ModifierState::new(),
            flashes: FlashCounters::new(),
            hovered: Vec::new(),
            config,
            flash_ticks,
        }
    }

    /// Applies new thresholds without resetting any state.
    pub fn reconfigure(&mut self, config: GestureConfig, flash_ticks: u8) {
        self.config = config;
        self.flash_ticks = flash_ticks;
    }

    /// Handles one successfully read frame.
    ///
    /// Flash countdowns advance first, then every hand is evaluated in
    /// detection order. Returns the labels that fired, in firing order.
    pub fn on_frame(
        &mut self,
        hands: &[Hand],
        frame: FrameSize,
        now: Instant,
        injector: &mut dyn KeyInjector,
    ) -> Vec<String> {
        self.flashes.tick();
        self.process_hands(hands, frame, now, injector)
    }

    /// Evaluates hands against the layout without advancing flashes.
    ///
    /// A fire updates the gesture state before the next hand is evaluated,
    /// so two hands pinching the same key in one frame press it once.
    pub fn process_hands(
        &mut self,
        hands: &[Hand],
        frame: FrameSize,
        now: Instant,
        injector: &mut dyn KeyInjector,
    ) -> Vec<String> {
        self.hovered.clear();
        let mut fired = Vec::new();

        for hand in hands {
            if hand.landmarks.len() < MIN_LANDMARKS {
                tracing::trace!("Skipping hand with {} landmarks", hand.landmarks.len());
                continue;
            }
            let Some((fingertip, thumb)) = hand.pinch_points(frame.width, frame.height) else {
                continue;
            };

            let evaluation =
                evaluate_with_state(fingertip, thumb, &self.layout, &self.gesture, now, &self.config);

            if let Some(hover) = evaluation.hovered {
                if !self.hovered.contains(&hover.index) {
                    self.hovered.push(hover.index);
                }
            }

            if let Some(key) = evaluation.fired_key() {
                let key = key.clone();
                self.fire(&key, now, injector);
                fired.push(key.label);
            }
        }

        fired
    }

    /// Presses `key`: dispatch, injection, flash and debounce bookkeeping.
    fn fire(&mut self, key: &Key, now: Instant, injector: &mut dyn KeyInjector) {
        tracing::debug!("Key {} fired", key.label);

        if let Some(keystroke) = dispatch_action(&key.action, &mut self.modifiers) {
            inject_logged(injector, &keystroke);
        }

        self.flashes.trigger(&key.label, self.flash_ticks);
        self.gesture.record_fire(key.label.as_str(), now);
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    #[must_use]
    pub fn flashes(&self) -> &FlashCounters {
        &self.flashes
    }

    #[must_use]
    pub fn gesture_state(&self) -> &GestureState {
        &self.gesture
    }

    #[must_use]
    pub fn hovered(&self) -> &[usize] {
        &self.hovered
    }

    #[must_use]
    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered.contains(&index)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Landmark, HAND_LANDMARK_COUNT, THUMB_TIP};
    use crate::input::injector::RecordingInjector;
    use crate::input::Keystroke;
    use crate::layout::{LayoutSpec, Point};
    use std::time::Duration;

    const FRAME: FrameSize = FrameSize::new(1000, 1000);

    /// Builds a hand whose tips land on the given pixels of a 1000×1000 frame.
    fn hand_at(fingertip: Point, thumb: Point) -> Hand {
        let mut landmarks = vec![Landmark::default(); HAND_LANDMARK_COUNT];
        landmarks[INDEX_FINGER_TIP] = Landmark::new(fingertip.x / 1000.0, fingertip.y / 1000.0);
        landmarks[THUMB_TIP] = Landmark::new(thumb.x / 1000.0, thumb.y / 1000.0);
        Hand::new(landmarks)
    }

    fn pinch(layout: &Layout, label: &str) -> Hand {
        let rect = layout.key(label).expect("label in layout").rect;
        let center = Point::new(((rect.x1 + rect.x2) / 2.0).round(), ((rect.y1 + rect.y2) / 2.0).round());
        hand_at(center, Point::new(center.x + 2.0, center.y))
    }

    fn session() -> TypingSession {
        TypingSession::new(LayoutSpec::default().build(), GestureConfig::default(), 5)
    }

    /// Test 1: A pinch types the key and starts its flash
    #[test]
    fn test_pinch_types_and_flashes() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let hand = pinch(session.layout(), "A");

        let fired = session.on_frame(&[hand], FRAME, Instant::now(), &mut injector);

        assert_eq!(fired, vec!["A".to_string()]);
        assert_eq!(injector.keystrokes, vec![Keystroke::Char('a')]);
        assert_eq!(session.flashes().remaining("A"), 5);
        assert_eq!(session.gesture_state().last_fired(), Some("A"));
        assert_eq!(session.hovered().len(), 1);
    }

    /// Test 2: Holding a pinch repeats only after the debounce interval
    #[test]
    fn test_held_pinch_debounces() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let hand = pinch(session.layout(), "Q");
        let t0 = Instant::now();

        let mut frames = 0;
        for step in 0..25 {
            let now = t0 + Duration::from_millis(20 * step);
            frames += session.on_frame(std::slice::from_ref(&hand), FRAME, now, &mut injector).len();
        }

        // Fires at 0 ms and again at 420 ms (first frame strictly past 400 ms)
        assert_eq!(frames, 2, "Held pinch over 480 ms fires twice");
        assert_eq!(injector.keystrokes, vec![Keystroke::Char('q'); 2]);
    }

    /// Test 3: Hovering without pinching highlights but does not type
    #[test]
    fn test_hover_only() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let rect = session.layout().key("W").expect("W").rect;
        let tip = Point::new(rect.x1 + 10.0, rect.y1 + 10.0);
        let hand = hand_at(tip, Point::new(tip.x, tip.y + 100.0));

        let fired = session.on_frame(&[hand], FRAME, Instant::now(), &mut injector);

        assert!(fired.is_empty());
        assert!(injector.keystrokes.is_empty());
        let (index, _) = session.layout().hit_test_indexed(tip).expect("W hovered");
        assert!(session.is_hovered(index));
    }

    /// Test 4: Two hands on different keys both fire in detection order
    #[test]
    fn test_two_hands_two_keys() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let hands = [pinch(session.layout(), "H"), pinch(session.layout(), "I")];

        let fired = session.on_frame(&hands, FRAME, Instant::now(), &mut injector);

        assert_eq!(fired, vec!["H".to_string(), "I".to_string()]);
        assert_eq!(injector.keystrokes, vec![Keystroke::Char('h'), Keystroke::Char('i')]);
    }

    /// Test 5: Two hands on the same key fire once
    #[test]
    fn test_two_hands_same_key() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let hand = pinch(session.layout(), "Z");

        let fired = session.on_frame(&[hand.clone(), hand], FRAME, Instant::now(), &mut injector);

        assert_eq!(fired.len(), 1, "Second hand is debounced by the first");
        assert_eq!(session.hovered().len(), 1, "Hovered indices are deduplicated");
    }

    /// Test 6: Incomplete hands are ignored
    #[test]
    fn test_incomplete_hand_skipped() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let mut hand = pinch(session.layout(), "A");
        hand.landmarks.truncate(MIN_LANDMARKS - 1);

        let fired = session.on_frame(&[hand], FRAME, Instant::now(), &mut injector);
        assert!(fired.is_empty());
        assert!(session.hovered().is_empty());
    }

    /// Test 7: Flashes fade after the configured number of frames
    #[test]
    fn test_flash_fades() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let t0 = Instant::now();
        let hand = pinch(session.layout(), "A");
        session.on_frame(&[hand], FRAME, t0, &mut injector);

        for tick in 1..5 {
            session.on_frame(&[], FRAME, t0 + Duration::from_millis(20 * tick), &mut injector);
            assert!(session.flashes().is_flashing("A"), "Still flashing on tick {}", tick);
        }
        session.on_frame(&[], FRAME, t0 + Duration::from_millis(100), &mut injector);
        assert!(!session.flashes().is_flashing("A"), "Flash is over after five ticks");
        assert!(session.hovered().is_empty(), "No hands means no hover");
    }

    /// Test 8: Modifier keys update state without typing
    #[test]
    fn test_modifier_keys() {
        let mut session = session();
        let mut injector = RecordingInjector::default();
        let t0 = Instant::now();

        let caps = pinch(session.layout(), "CAPS");
        let b = pinch(session.layout(), "B");

        session.on_frame(&[caps], FRAME, t0, &mut injector);
        assert!(session.modifiers().caps_lock());
        assert!(injector.keystrokes.is_empty());

        session.on_frame(&[b], FRAME, t0, &mut injector);
        assert_eq!(injector.keystrokes, vec![Keystroke::Char('B')]);
    }

    /// Test 9: Injection failures do not disturb the session
    #[test]
    fn test_injection_failure_is_absorbed() {
        let mut session = session();
        let mut injector = RecordingInjector {
            fail: true,
            ..Default::default()
        };

        let hand = pinch(session.layout(), "SPACE");

        let fired = session.on_frame(&[hand], FRAME, Instant::now(), &mut injector);
        assert_eq!(fired, vec!["SPACE".to_string()]);
        assert!(session.flashes().is_flashing("SPACE"));
    }
}
