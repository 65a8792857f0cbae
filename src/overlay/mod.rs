// SPDX-License-Identifier: GPL-3.0-only

//! Overlay rendering.
//!
//! The keyboard is drawn as rows of fixed-size keys with the layout's
//! spacing and origin, so every key appears exactly where its hit-test
//! rectangle is.

pub mod flash;
pub mod key;
pub mod theme;

pub use flash::FlashCounters;
pub use key::{key_style, render_key, KeyState, KeyVisual};
pub use theme::{Palette, ThemeName, UnknownTheme};

use cosmic::iced::{Alignment, Length, Padding};
use cosmic::widget;
use cosmic::Element;

use crate::session::TypingSession;

/// Rendering state of every key in layout order.
#[must_use]
pub fn key_states(session: &TypingSession) -> Vec<KeyState> {
    let modifiers = session.modifiers();
    session
        .layout()
        .keys()
        .enumerate()
        .map(|(index, key)| KeyState {
            hovered: session.is_hovered(index),
            flashing: session.flashes().is_flashing(&key.label),
            modifier_on: modifiers.is_engaged(&key.action),
        })
        .collect()
}

/// Renders the keys of the session's layout.
///
/// The returned element is as wide as the layout's right edge.
pub fn keyboard_view<'a, M: 'a>(session: &TypingSession, palette: &Palette) -> Element<'a, M> {
    let layout = session.layout();
    let origin = layout.origin();
    let row_height = layout.base_key_size().height;
    let mut states = key_states(session).into_iter();

    let mut column = widget::column::column().spacing(layout.spacing());
    for row in layout.rows() {
        let mut row_widget = widget::row::row()
            .spacing(layout.spacing())
            .height(Length::Fixed(row_height))
            .align_y(Alignment::Start);

        for key in row {
            let state = states.next().unwrap_or_default();
            row_widget = row_widget.push(render_key(key, key_style(palette, key, state)));
        }
        column = column.push(row_widget);
    }

    widget::container(column)
        .padding(Padding::ZERO.top(origin.y).left(origin.x))
        .width(Length::Fixed(layout.keyboard_right_edge()))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureConfig;
    use crate::layout::LayoutSpec;

    /// Test: modifier and hover state map onto the right keys
    #[test]
    fn test_key_states_follow_session() {
        let session = TypingSession::new(LayoutSpec::default().build(), GestureConfig::default(), 5);
        let states = key_states(&session);

        assert_eq!(states.len(), session.layout().key_count());
        assert!(states.iter().all(|state| *state == KeyState::default()), "Fresh session is idle");
    }

    /// Test: pinching CAPS hovers, flashes and engages it
    #[test]
    fn test_key_states_after_caps_pinch() {
        use crate::gesture::{FrameSize, Hand, Landmark, HAND_LANDMARK_COUNT, INDEX_FINGER_TIP, THUMB_TIP};
        use crate::input::injector::RecordingInjector;
        use std::time::Instant;

        let mut session = TypingSession::new(LayoutSpec::default().build(), GestureConfig::default(), 5);
        let (caps_index, caps) = session
            .layout()
            .keys()
            .enumerate()
            .find(|(_, key)| key.label == "CAPS")
            .map(|(index, key)| (index, key.rect))
            .expect("CAPS key");

        // 1000×1000 frame: normalized = pixels / 1000
        let mut landmarks = vec![Landmark::default(); HAND_LANDMARK_COUNT];
        landmarks[INDEX_FINGER_TIP] = Landmark::new((caps.x1 + 20.0) / 1000.0, (caps.y1 + 20.0) / 1000.0);
        landmarks[THUMB_TIP] = Landmark::new((caps.x1 + 22.0) / 1000.0, (caps.y1 + 20.0) / 1000.0);

        let mut injector = RecordingInjector::default();
        session.on_frame(&[Hand::new(landmarks)], FrameSize::new(1000, 1000), Instant::now(), &mut injector);

        let state = key_states(&session)[caps_index];
        assert!(state.hovered, "CAPS is under the fingertip");
        assert!(state.flashing, "CAPS just fired");
        assert!(state.modifier_on, "Caps lock is on");
    }

    /// Test: SHIFT stays highlighted until the next key consumes it
    #[test]
    fn test_shift_highlight_until_next_key() {
        use crate::gesture::{FrameSize, Hand, Landmark, HAND_LANDMARK_COUNT, INDEX_FINGER_TIP, THUMB_TIP};
        use crate::input::injector::RecordingInjector;
        use crate::input::Keystroke;
        use std::time::{Duration, Instant};

        let mut session = TypingSession::new(LayoutSpec::default().build(), GestureConfig::default(), 5);
        let frame = FrameSize::new(1000, 1000);
        let t0 = Instant::now();
        let mut injector = RecordingInjector::default();

        let pinch_over = |label: &str| -> Hand {
            let rect = session.layout().key(label).expect("label in layout").rect;
            let mut landmarks = vec![Landmark::default(); HAND_LANDMARK_COUNT];
            landmarks[INDEX_FINGER_TIP] = Landmark::new((rect.x1 + 20.0) / 1000.0, (rect.y1 + 20.0) / 1000.0);
            landmarks[THUMB_TIP] = Landmark::new((rect.x1 + 22.0) / 1000.0, (rect.y1 + 20.0) / 1000.0);
            Hand::new(landmarks)
        };
        let shift = pinch_over("SHIFT");
        let one = pinch_over("1");

        let shift_engaged = |session: &TypingSession| -> Vec<bool> {
            session
                .layout()
                .keys()
                .zip(key_states(session))
                .filter(|(key, _)| key.label == "SHIFT")
                .map(|(_, state)| state.modifier_on)
                .collect()
        };

        session.on_frame(&[shift], frame, t0, &mut injector);
        assert!(injector.keystrokes.is_empty(), "SHIFT injects nothing");
        assert_eq!(shift_engaged(&session), vec![true, true], "Both SHIFT keys light up");

        session.on_frame(&[one], frame, t0 + Duration::from_millis(20), &mut injector);
        assert_eq!(injector.keystrokes, vec![Keystroke::Char('!')]);
        assert_eq!(shift_engaged(&session), vec![false, false], "Shift is consumed");
    }
}
