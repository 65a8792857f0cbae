// SPDX-License-Identifier: GPL-3.0-only

use crate::app_settings;
use crate::gesture::GestureConfig;
use crate::overlay::ThemeName;
use cosmic::cosmic_config;
use cosmic::cosmic_config::{cosmic_config_derive::CosmicConfigEntry, CosmicConfigEntry};
use std::time::Duration;

/// User configuration that persists between application runs.
#[derive(Debug, Clone, CosmicConfigEntry, PartialEq)]
#[version = 1]
pub struct Config {
    /// Index of the webcam to open.
    pub camera_index: u32,
    /// Name of the color palette (`Dark`, `Pink`, `Neon`, `Cyber`).
    pub theme: String,
    /// Hand tracker executable followed by its arguments.
    ///
    /// The process speaks the line protocol described in
    /// [`crate::vision::sidecar`]; `tracker/airboard-tracker` is the
    /// reference implementation.
    pub tracker_command: Vec<String>,
    /// Maximum number of hands the tracker should report.
    pub max_hands: u32,
    /// Minimum detection confidence forwarded to the tracker.
    pub min_detection_confidence: f32,
    /// Thumb-to-index distance in pixels that counts as a pinch.
    pub pinch_threshold: f32,
    /// Cooldown before a held pinch repeats the same key.
    pub debounce_ms: u64,
    /// Period of the vision/redraw tick.
    pub tick_interval_ms: u64,
    /// Ticks a pressed key stays flashed.
    pub flash_ticks: u8,
    /// Optional JSON layout replacing the built-in QWERTY rows.
    pub layout_path: Option<String>,
    /// Window opacity between 0.0 and 1.0.
    pub opacity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            theme: ThemeName::default().as_str().to_string(),
            tracker_command: vec![app_settings::DEFAULT_TRACKER_COMMAND.to_string()],
            max_hands: app_settings::DEFAULT_MAX_HANDS,
            min_detection_confidence: app_settings::DEFAULT_MIN_DETECTION_CONFIDENCE,
            pinch_threshold: app_settings::DEFAULT_PINCH_THRESHOLD,
            debounce_ms: app_settings::DEFAULT_DEBOUNCE_MS,
            tick_interval_ms: app_settings::DEFAULT_TICK_INTERVAL_MS,
            flash_ticks: app_settings::DEFAULT_FLASH_TICKS,
            layout_path: None,
            opacity: app_settings::DEFAULT_OPACITY,
        }
    }
}

impl Config {
    /// Gesture thresholds derived from this configuration.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            pinch_threshold: self.pinch_threshold,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    /// Tick period, never shorter than one millisecond.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Parsed palette name, falling back to the default for unknown names.
    #[must_use]
    pub fn theme_name(&self) -> ThemeName {
        self.theme.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown theme {:?}, using {}", self.theme, ThemeName::default().as_str());
            ThemeName::default()
        })
    }

    /// Opacity clamped to the displayable range.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }
}
