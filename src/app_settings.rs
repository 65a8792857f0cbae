// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.airboard.Airboard";

/// Overlay canvas width in pixels.
pub const CANVAS_WIDTH: f32 = 1300.0;

/// Overlay canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 400.0;

/// Default window opacity.
pub const DEFAULT_OPACITY: f32 = 0.92;

/// Requested camera frame width.
pub const CAMERA_WIDTH: u32 = 640;

/// Requested camera frame height.
pub const CAMERA_HEIGHT: u32 = 480;

/// Requested camera frame rate.
pub const CAMERA_FPS: u32 = 30;

/// Maximum width of the camera preview drawn next to the keys.
pub const PREVIEW_WIDTH: u32 = 500;

/// Alpha of the black layer darkening the camera preview.
pub const PREVIEW_DIM_ALPHA: u8 = 120;

/// Gap between the rightmost key and the camera preview.
pub const PREVIEW_GAP: f32 = 20.0;

/// Period of the redraw/vision tick in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 20;

/// Pinch distance (pixels) below which thumb and index count as pinched.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 40.0;

/// Minimum time before the same key may fire again while pinched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Number of ticks a pressed key stays flashed.
pub const DEFAULT_FLASH_TICKS: u8 = 5;

/// Maximum number of hands the tracker reports.
pub const DEFAULT_MAX_HANDS: u32 = 2;

/// Minimum detection confidence forwarded to the tracker.
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.7;

/// Tracker executable spawned when the config does not name one.
///
/// `tracker/airboard-tracker` in the source tree implements it on top of
/// MediaPipe Hands; install it on `PATH` or point `tracker_command` at it.
pub const DEFAULT_TRACKER_COMMAND: &str = "airboard-tracker";
