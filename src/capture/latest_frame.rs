//! Latest-frame delivery from a dedicated capture worker.
//!
//! The camera runs on its own thread and publishes every decoded frame into
//! a single-slot mailbox. A new frame replaces any unconsumed one, so the
//! consumer only ever sees the most recent frame and nothing backs up when
//! rendering falls behind.

use super::{CaptureBackend, CaptureConfig, NokhwaCapture};
use crate::frame::VideoFrame;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

/// Single-slot mailbox holding the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct FrameMailbox {
    slot: Arc<Mutex<Option<VideoFrame>>>,
}

impl FrameMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a frame, discarding any frame not yet consumed.
    pub fn publish(&self, frame: VideoFrame) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(frame);
        }
    }

    /// Takes the latest frame, leaving the slot empty. Non-blocking.
    pub fn take(&self) -> Option<VideoFrame> {
        self.slot.lock().ok()?.take()
    }
}

/// Camera capture running on a background worker thread.
pub struct AsyncCapture {
    mailbox: FrameMailbox,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    width: u32,
    height: u32,
}

impl AsyncCapture {
    /// Opens the camera and starts the capture worker.
    pub fn open(config: CaptureConfig) -> Result<Self> {
        let mut camera = NokhwaCapture::open(config)?;
        let (width, height) = camera.frame_size();

        let mailbox = FrameMailbox::new();
        let stop = Arc::new(AtomicBool::new(false));

        let worker_mailbox = mailbox.clone();
        let worker_stop = stop.clone();
        let worker = thread::Builder::new()
            .name("umbra-capture".into())
            .spawn(move || {
                while !worker_stop.load(Ordering::Relaxed) {
                    match camera.capture_frame() {
                        Ok(frame) => worker_mailbox.publish(frame),
                        Err(e) => {
                            warn!("Capture error: {}", e);
                            // Back off briefly so a wedged device doesn't spin.
                            thread::sleep(Duration::from_millis(10));
                        }
                    }
                }
            })?;

        Ok(Self {
            mailbox,
            stop,
            worker: Some(worker),
            width,
            height,
        })
    }

    /// Returns the most recent captured frame, if a new one has arrived
    /// since the last call. Never blocks.
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        self.mailbox.take()
    }

    /// Returns the negotiated frame dimensions.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for AsyncCapture {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    fn frame_with_timestamp(timestamp_us: u64) -> VideoFrame {
        let mut frame = VideoFrame::new(2, 2, PixelFormat::Rgb);
        frame.timestamp_us = Some(timestamp_us);
        frame
    }

    #[test]
    fn publish_replaces_unconsumed_frame() {
        let mailbox = FrameMailbox::new();
        mailbox.publish(frame_with_timestamp(1));
        mailbox.publish(frame_with_timestamp(2));

        let taken = mailbox.take().unwrap();
        assert_eq!(taken.timestamp_us, Some(2));
    }

    #[test]
    fn take_empties_the_slot() {
        let mailbox = FrameMailbox::new();
        mailbox.publish(frame_with_timestamp(1));

        assert!(mailbox.take().is_some());
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn mailbox_is_shared_across_clones() {
        let producer = FrameMailbox::new();
        let consumer = producer.clone();

        producer.publish(frame_with_timestamp(7));
        assert_eq!(consumer.take().unwrap().timestamp_us, Some(7));
    }
}
