// SPDX-License-Identifier: GPL-3.0-only

//! Webcam capture using nokhwa.

use crate::app_settings::{CAMERA_FPS, CAMERA_HEIGHT, CAMERA_WIDTH};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::{Camera, NokhwaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("cannot open camera {index}: {source}")]
    Open {
        index: u32,
        #[source]
        source: NokhwaError,
    },

    #[error("cannot read camera frame: {0}")]
    Read(#[from] NokhwaError),

    #[error("camera returned {len} bytes for a {width}x{height} frame")]
    Malformed { width: u32, height: u32, len: usize },
}

/// Something that produces mirrored RGB frames.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError>;
}

/// A webcam streaming at roughly 640×480.
pub struct NokhwaCamera {
    camera: Camera,
    index: u32,
}

impl std::fmt::Debug for NokhwaCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NokhwaCamera").field("index", &self.index).finish_non_exhaustive()
    }
}

impl NokhwaCamera {
    /// Opens camera `index` and starts streaming.
    pub fn open(index: u32) -> Result<Self, CameraError> {
        let target = CameraFormat::new(
            Resolution::new(CAMERA_WIDTH, CAMERA_HEIGHT),
            FrameFormat::MJPEG,
            CAMERA_FPS,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(target));

        let open_err = |source| CameraError::Open { index, source };
        let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(open_err)?;
        camera.open_stream().map_err(open_err)?;

        let resolution = camera.resolution();
        tracing::info!(
            "Camera {} opened: {}x{} {:?}",
            index,
            resolution.width(),
            resolution.height(),
            camera.frame_format()
        );

        Ok(Self { camera, index })
    }
}

impl FrameSource for NokhwaCamera {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        let buffer = self.camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (width, height) = (decoded.width(), decoded.height());
        let raw = decoded.into_raw();
        let len = raw.len();

        let mut frame =
            RgbImage::from_raw(width, height, raw).ok_or(CameraError::Malformed { width, height, len })?;
        image::imageops::flip_horizontal_in_place(&mut frame);
        Ok(frame)
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        if let Err(err) = self.camera.stop_stream() {
            tracing::warn!("Failed to stop camera {}: {}", self.index, err);
        } else {
            tracing::info!("Camera {} released", self.index);
        }
    }
}
