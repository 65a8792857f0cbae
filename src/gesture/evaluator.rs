// SPDX-License-Identifier: GPL-3.0-only

//! Pinch detection, key hit-testing and debounce.

use crate::app_settings;
use crate::layout::{Key, Layout, Point};
use std::time::{Duration, Instant};

/// Thresholds for turning a pinch into a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Pinch distance in pixels below which the hand counts as pinched.
    pub pinch_threshold: f32,
    /// Minimum time before the last fired key may fire again.
    pub debounce: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: app_settings::DEFAULT_PINCH_THRESHOLD,
            debounce: Duration::from_millis(app_settings::DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// The last fired key and when it fired.
///
/// Overwritten on every fire; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureState {
    last_fired: Option<String>,
    last_fired_at: Option<Instant>,
}

impl GestureState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `label` fired at `now`.
    pub fn record_fire(&mut self, label: impl Into<String>, now: Instant) {
        self.last_fired = Some(label.into());
        self.last_fired_at = Some(now);
    }

    #[must_use]
    pub fn last_fired(&self) -> Option<&str> {
        self.last_fired.as_deref()
    }

    #[must_use]
    pub fn last_fired_at(&self) -> Option<Instant> {
        self.last_fired_at
    }
}

/// The key under a fingertip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover<'a> {
    /// Position of the key in layout order.
    pub index: usize,
    pub key: &'a Key,
}

/// Result of evaluating one hand on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation<'a> {
    pub hovered: Option<Hover<'a>>,
    /// Fingertip to thumb-tip distance in pixels.
    pub pinch_distance: f32,
    pub should_fire: bool,
}

impl<'a> Evaluation<'a> {
    /// The key to press, if this evaluation fires.
    #[must_use]
    pub fn fired_key(&self) -> Option<&'a Key> {
        if self.should_fire {
            self.hovered.map(|hover| hover.key)
        } else {
            None
        }
    }
}

/// Decides whether a fingertip/thumb pair presses a key.
///
/// The hovered key is the first key in layout order whose rectangle strictly
/// contains the fingertip. It fires when the pinch distance is below the
/// threshold and it either differs from `last_fired` or more than the
/// debounce interval has passed since `last_fired_at`.
#[must_use]
pub fn evaluate<'a>(
    fingertip: Point,
    thumb: Point,
    layout: &'a Layout,
    last_fired: Option<&str>,
    last_fired_at: Option<Instant>,
    now: Instant,
    config: &GestureConfig,
) -> Evaluation<'a> {
    let pinch_distance = fingertip.distance_to(thumb);
    let hovered = layout
        .hit_test_indexed(fingertip)
        .map(|(index, key)| Hover { index, key });

    let should_fire = hovered.is_some_and(|hover| {
        let pinched = pinch_distance < config.pinch_threshold;
        let cooled_down = last_fired_at
            .is_none_or(|at| now.saturating_duration_since(at) > config.debounce);
        pinched && (last_fired != Some(hover.key.label.as_str()) || cooled_down)
    });

    Evaluation {
        hovered,
        pinch_distance,
        should_fire,
    }
}

/// [`evaluate`] against a [`GestureState`].
#[must_use]
pub fn evaluate_with_state<'a>(
    fingertip: Point,
    thumb: Point,
    layout: &'a Layout,
    state: &GestureState,
    now: Instant,
    config: &GestureConfig,
) -> Evaluation<'a> {
    evaluate(
        fingertip,
        thumb,
        layout,
        state.last_fired(),
        state.last_fired_at(),
        now,
        config,
    )
}

// ============================================================================
// Tests
// ============================================================================
