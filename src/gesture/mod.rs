// SPDX-License-Identifier: GPL-3.0-only

//! Turning tracked hands into key presses.
//!
//! Each frame the tracker reports zero or more hands. For every hand the
//! index fingertip selects the hovered key and the distance to the thumb tip
//! decides whether it is pinched. [`evaluate`] combines both with the
//! debounce state to decide if the hovered key fires.

pub mod evaluator;
pub mod landmarks;

pub use evaluator::{evaluate, evaluate_with_state, Evaluation, GestureConfig, GestureState, Hover};
pub use landmarks::{
    Hand, Landmark, HAND_CONNECTIONS, HAND_LANDMARK_COUNT, INDEX_FINGER_TIP, THUMB_TIP,
};

/// Pixel dimensions of a camera frame, used to denormalize landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
