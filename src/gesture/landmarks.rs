// SPDX-License-Identifier: GPL-3.0-only

//! Hand landmarks as reported by the tracker, and their mapping to pixels.
//!
//! Landmarks use the 21-point hand model: index 4 is the thumb tip and
//! index 8 the index fingertip. Coordinates are normalized to the frame,
//! `(0, 0)` top-left and `(1, 1)` bottom-right.

use crate::layout::Point;
use serde::{Deserialize, Serialize};

/// Landmark index of the thumb tip.
pub const THUMB_TIP: usize = 4;

/// Landmark index of the index fingertip.
pub const INDEX_FINGER_TIP: usize = 8;

/// Number of landmarks in a complete hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Bones of the hand model, drawn on the camera preview.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// A normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Maps the landmark to integer pixel coordinates of a `width`×`height`
    /// frame, truncating toward zero.
    #[must_use]
    pub fn to_pixel(&self, width: u32, height: u32) -> Point {
        Point::new(
            (self.x * width as f32) as i32 as f32,
            (self.y * height as f32) as i32 as f32,
        )
    }
}

impl From<[f32; 2]> for Landmark {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Landmark> for [f32; 2] {
    fn from(landmark: Landmark) -> Self {
        [landmark.x, landmark.y]
    }
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    #[must_use]
    pub fn thumb_tip(&self) -> Option<Landmark> {
        self.landmarks.get(THUMB_TIP).copied()
    }

    #[must_use]
    pub fn index_finger_tip(&self) -> Option<Landmark> {
        self.landmarks.get(INDEX_FINGER_TIP).copied()
    }

    /// Fingertip and thumb-tip in pixel coordinates, if both are present.
    #[must_use]
    pub fn pinch_points(&self, width: u32, height: u32) -> Option<(Point, Point)> {
        let index = self.index_finger_tip()?;
        let thumb = self.thumb_tip()?;
        Some((index.to_pixel(width, height), thumb.to_pixel(width, height)))
    }
}
