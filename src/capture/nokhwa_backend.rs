//! Nokhwa-based webcam capture backend.

use super::{CameraInfo, CaptureBackend, CaptureConfig};
use crate::frame::{PixelFormat, VideoFrame};
use anyhow::Result;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use std::time::Instant;

/// Webcam capture using the nokhwa library.
pub struct NokhwaCapture {
    camera: Camera,
    width: u32,
    height: u32,
    opened_at: Instant,
}

/// Candidate formats to try when opening the camera. The configured
/// resolution comes first; standard fallbacks follow because some drivers
/// reject a `Closest` request whose hint is too far from anything they
/// support. Uncompressed formats are preferred over MJPEG at each size.
fn seed_formats(config: &CaptureConfig) -> Vec<CameraFormat> {
    let mut resolutions = vec![Resolution::new(config.width, config.height)];
    for fallback in [
        Resolution::new(1920, 1080),
        Resolution::new(1280, 720),
        Resolution::new(640, 480),
    ] {
        if !resolutions.contains(&fallback) {
            resolutions.push(fallback);
        }
    }

    let mut seeds = Vec::new();
    for resolution in resolutions {
        for format in [FrameFormat::NV12, FrameFormat::YUYV, FrameFormat::MJPEG] {
            seeds.push(CameraFormat::new(resolution, format, config.fps));
        }
    }
    seeds
}

impl CaptureBackend for NokhwaCapture {
    fn list_devices() -> Result<Vec<CameraInfo>> {
        let devices = nokhwa::query(nokhwa::utils::ApiBackend::Auto)?;
        Ok(devices
            .into_iter()
            .map(|d| CameraInfo {
                index: d.index().as_index().unwrap_or(0),
                name: d.human_name().to_string(),
            })
            .collect())
    }

    fn open(config: CaptureConfig) -> Result<Self> {
        let mut camera = None;
        for seed in seed_formats(&config) {
            let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(seed));
            let idx = CameraIndex::Index(config.device_index);

            if let Ok(mut cam) = Camera::new(idx, requested) {
                // Creating the camera object is not enough for some drivers;
                // the stream has to actually open.
                if cam.open_stream().is_ok() {
                    tracing::info!("Opened camera stream with seed format {:?}", seed);
                    camera = Some(cam);
                    break;
                }
            }
        }

        let camera = camera.ok_or_else(|| {
            anyhow::anyhow!(
                "could not open a stream on camera index {} with any standard format",
                config.device_index
            )
        })?;

        let resolution = camera.resolution();
        tracing::info!("Camera negotiated resolution {}", resolution);

        Ok(Self {
            camera,
            width: resolution.width(),
            height: resolution.height(),
            opened_at: Instant::now(),
        })
    }

    fn capture_frame(&mut self) -> Result<VideoFrame> {
        let raw = self.camera.frame()?;
        let timestamp_us = self.opened_at.elapsed().as_micros() as u64;
        let decoded = raw.decode_image::<RgbFormat>()?;

        let mut frame = VideoFrame::from_data(
            self.width,
            self.height,
            PixelFormat::Rgb,
            decoded.into_raw(),
        );
        frame.timestamp_us = Some(timestamp_us);
        Ok(frame)
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
