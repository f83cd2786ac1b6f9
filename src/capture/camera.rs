//! Live camera acquisition.
//!
//! A platform backend implements `CameraDevice` (permission negotiation +
//! stream open) and `VideoStream` (frame grab + track stop). The session
//! only ever holds a stream through `LiveStream`, which stops the device
//! tracks when released or dropped, so camera hardware is never held past
//! the camera screen.

use super::payload::ImagePayload;
use crate::error::CaptureError;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};

/// Which camera to prefer when the device has several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera — preferred for photographing paper.
    Environment,
    User,
}

/// Permission state shown on the camera screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPermission {
    Pending,
    Granted,
    Denied,
}

/// One raw video frame, RGBA8, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// An open video stream from the device.
pub trait VideoStream: Send {
    /// Native resolution of the stream.
    fn resolution(&self) -> (u32, u32);

    /// Current frame of the stream.
    fn grab_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Stop every underlying device track. Must be idempotent.
    fn stop(&mut self);
}

/// Platform camera access.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request video access and open a stream.
    ///
    /// Fails with `CameraUnsupported` when the platform has no camera
    /// capability at all, `PermissionDenied` when access is refused.
    async fn open(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CaptureError>;
}

/// Backend for platforms without camera support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCamera;

#[async_trait]
impl CameraDevice for NoCamera {
    async fn open(&self, _facing: Facing) -> Result<Box<dyn VideoStream>, CaptureError> {
        Err(CaptureError::CameraUnsupported)
    }
}

/// Index of the device to open for `facing`, given device names in
/// enumeration order. Falls back to the first device.
pub fn pick_device(names: &[String], facing: Facing) -> usize {
    let wanted: &[&str] = match facing {
        Facing::Environment => &["back", "rear", "environment"],
        Facing::User => &["front", "user", "facetime", "integrated"],
    };
    names
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            wanted.iter().any(|w| name.contains(w))
        })
        .unwrap_or(0)
}

/// Map a backend's open failure onto the camera screen's states.
pub fn classify_open_error(message: &str) -> CaptureError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::Snapshot(message.to_string())
    }
}

/// Owning guard around an open stream.
pub struct LiveStream {
    inner: Option<Box<dyn VideoStream>>,
}

impl LiveStream {
    pub fn new(stream: Box<dyn VideoStream>) -> Self {
        let (w, h) = stream.resolution();
        log::info!("[CAMERA] Stream attached ({}x{})", w, h);
        Self {
            inner: Some(stream),
        }
    }

    pub fn is_live(&self) -> bool {
        self.inner.is_some()
    }

    /// Render the current frame into a still buffer at the stream's native
    /// resolution and encode it as JPEG.
    pub fn snapshot(&mut self, jpeg_quality: u8) -> Result<ImagePayload, CaptureError> {
        let stream = self
            .inner
            .as_mut()
            .ok_or_else(|| CaptureError::Snapshot("camera stream is not active".into()))?;
        let (width, height) = stream.resolution();
        let frame = stream.grab_frame()?;
        if (frame.width, frame.height) != (width, height) {
            return Err(CaptureError::Snapshot(format!(
                "frame is {}x{}, stream is {}x{}",
                frame.width, frame.height, width, height
            )));
        }
        encode_snapshot(frame, jpeg_quality)
    }

    /// Stop and drop the stream. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.inner.take() {
            stream.stop();
            log::info!("[CAMERA] Stream stopped and released");
        }
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for LiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveStream")
            .field("live", &self.is_live())
            .finish()
    }
}

/// Encode a raw frame as a lossy JPEG payload.
pub fn encode_snapshot(frame: Frame, jpeg_quality: u8) -> Result<ImagePayload, CaptureError> {
    let Frame {
        width,
        height,
        rgba,
    } = frame;
    if width == 0 || height == 0 {
        return Err(CaptureError::Snapshot("stream has no video dimensions".into()));
    }
    let buffer = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        CaptureError::Snapshot(format!("frame buffer does not match {}x{}", width, height))
    })?;
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgba8(buffer).to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    log::info!("[CAMERA] Snapshot encoded: {}x{}, {} bytes", width, height, jpeg.len());
    Ok(ImagePayload::new("image/jpeg", jpeg))
}
