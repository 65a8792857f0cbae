// SPDX-License-Identifier: GPL-3.0-only

//! Camera frames, hand tracking and the camera preview.
//!
//! [`VisionPipeline`] ties a [`FrameSource`] to a [`HandTracker`]. Each call
//! to [`VisionPipeline::next_frame`] reads one mirrored frame and asks the
//! tracker for the hands in it:
//!
//! - a camera read failure yields `None` and the tick is skipped
//! - a tracker failure yields the frame with no hands

pub mod camera;
pub mod preview;
pub mod sidecar;

pub use camera::{CameraError, FrameSource, NokhwaCamera};
pub use preview::render_preview;
pub use sidecar::{HandTracker, SidecarTracker, TrackerError, TrackerSettings};

use crate::gesture::{FrameSize, Hand};
use image::RgbImage;

/// Repeated failures are logged once per this many occurrences.
const FAILURE_LOG_EVERY: u32 = 50;

/// A frame together with the hands found in it.
#[derive(Debug, Clone)]
pub struct VisionFrame {
    pub image: RgbImage,
    pub hands: Vec<Hand>,
}

impl VisionFrame {
    #[must_use]
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.image.width(), self.image.height())
    }
}

/// Counts consecutive failures and decides which ones get logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FailureCounter {
    consecutive: u32,
}

impl FailureCounter {
    /// Records a failure; returns `true` for the first and every 50th.
    fn record(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.consecutive == 1 || self.consecutive % FAILURE_LOG_EVERY == 0
    }

    /// Clears the streak; returns how long it was.
    fn reset(&mut self) -> u32 {
        std::mem::take(&mut self.consecutive)
    }
}

/// Camera plus hand tracker.
pub struct VisionPipeline {
    source: Box<dyn FrameSource>,
    tracker: Box<dyn HandTracker>,
    camera_failures: FailureCounter,
    tracker_failures: FailureCounter,
}

impl std::fmt::Debug for VisionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionPipeline")
            .field("camera_failures", &self.camera_failures.consecutive)
            .field("tracker_failures", &self.tracker_failures.consecutive)
            .finish_non_exhaustive()
    }
}

impl VisionPipeline {
    #[must_use]
    pub fn new(source: Box<dyn FrameSource>, tracker: Box<dyn HandTracker>) -> Self {
        Self {
            source,
            tracker,
            camera_failures: FailureCounter::default(),
            tracker_failures: FailureCounter::default(),
        }
    }

    /// Reads the next frame and its hands.
    pub fn next_frame(&mut self) -> Option<VisionFrame> {
        let image = match self.source.read_frame() {
            Ok(image) => image,
            Err(err) => {
                if self.camera_failures.record() {
                    tracing::warn!(
                        "Skipping frame ({} consecutive failures): {}",
                        self.camera_failures.consecutive,
                        err
                    );
                }
                return None;
            }
        };
        let streak = self.camera_failures.reset();
        if streak > 0 {
            tracing::info!("Camera recovered after {} failed reads", streak);
        }

        let hands = match self.tracker.detect(&image) {
            Ok(hands) => {
                self.tracker_failures.reset();
                hands
            }
            Err(err) => {
                if self.tracker_failures.record() {
                    tracing::error!(
                        "Hand tracking failed ({} consecutive failures): {}",
                        self.tracker_failures.consecutive,
                        err
                    );
                }
                Vec::new()
            }
        };

        Some(VisionFrame { image, hands })
    }
}

// ============================================================================
// Tests
// ============================================================================
