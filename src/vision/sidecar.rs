// SPDX-License-Identifier: GPL-3.0-only

//! Hand tracking through an external tracker process.
//!
//! The tracker is spawned once and fed one frame per request over stdin:
//!
//! ```text
//! {"width":640,"height":480,"max_hands":2,"min_detection_confidence":0.7}\n
//! <width * height * 3 bytes of packed RGB>
//! ```
//!
//! It answers each request with a single JSON line on stdout:
//!
//! ```text
//! {"hands":[{"landmarks":[[0.51,0.42],[0.49,0.40], ...]}]}
//! ```
//!
//! Landmarks are normalized to the frame. A tracker that cannot process a
//! frame may answer `{"error":"..."}` instead.

use crate::gesture::Hand;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("no hand tracker command configured")]
    NoCommand,

    #[error("cannot start hand tracker {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("hand tracker I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("hand tracker sent an invalid response: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("hand tracker closed its output")]
    Closed,

    #[error("hand tracker reported: {0}")]
    Remote(String),
}

/// Something that finds hands in a frame.
pub trait HandTracker {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Hand>, TrackerError>;
}

/// Detection parameters forwarded with every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    pub max_hands: u32,
    pub min_detection_confidence: f32,
}

#[derive(Debug, Serialize)]
struct FrameHeader {
    width: u32,
    height: u32,
    max_hands: u32,
    min_detection_confidence: f32,
}

#[derive(Debug, Deserialize)]
struct DetectionResponse {
    #[serde(default)]
    hands: Vec<Hand>,
    #[serde(default)]
    error: Option<String>,
}

/// Writes one detection request.
pub fn write_request<W: Write>(
    writer: &mut W,
    frame: &RgbImage,
    settings: &TrackerSettings,
) -> Result<(), TrackerError> {
    let header = FrameHeader {
        width: frame.width(),
        height: frame.height(),
        max_hands: settings.max_hands,
        min_detection_confidence: settings.min_detection_confidence,
    };

    serde_json::to_writer(&mut *writer, &header)?;
    writer.write_all(b"\n")?;
    writer.write_all(frame.as_raw())?;
    writer.flush()?;
    Ok(())
}

/// Reads one detection response.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Vec<Hand>, TrackerError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(TrackerError::Closed);
    }

    let response: DetectionResponse = serde_json::from_str(line.trim_end())?;
    match response.error {
        Some(message) => Err(TrackerError::Remote(message)),
        None => Ok(response.hands),
    }
}

/// A tracker running as a child process.
#[derive(Debug)]
pub struct SidecarTracker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    settings: TrackerSettings,
}

impl SidecarTracker {
    /// Spawns `command` (program followed by arguments).
    pub fn spawn(command: &[String], settings: TrackerSettings) -> Result<Self, TrackerError> {
        let (program, args) = command.split_first().ok_or(TrackerError::NoCommand)?;

        let spawn_err = |source| TrackerError::Spawn {
            command: command.join(" "),
            source,
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        let pipe_err = || spawn_err(io::Error::new(io::ErrorKind::BrokenPipe, "stdio not captured"));
        let stdin = child.stdin.take().ok_or_else(pipe_err)?;
        let stdout = child.stdout.take().ok_or_else(pipe_err)?;

        tracing::info!("Hand tracker started: {} (pid {})", command.join(" "), child.id());

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            settings,
        })
    }
}

impl HandTracker for SidecarTracker {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Hand>, TrackerError> {
        write_request(&mut self.stdin, frame, &self.settings)?;
        read_response(&mut self.stdout)
    }
}

impl Drop for SidecarTracker {
    fn drop(&mut self) {
        if let Err(err) = self.child.kill() {
            tracing::debug!("Hand tracker already exited: {}", err);
        }
        match self.child.wait() {
            Ok(status) => tracing::info!("Hand tracker stopped ({})", status),
            Err(err) => tracing::warn!("Failed to reap hand tracker: {}", err),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
