//! Image acquisition domain — public API.
//!
//! Two independent ways to obtain an `ImagePayload`:
//!   - file.rs   — local file selection with a size ceiling
//!   - camera.rs — live camera stream, single-frame snapshot
//!   - native.rs — OS camera backend (`camera` feature)
//!
//! Both feed the session state machine; neither touches the network.

mod camera;
mod file;
#[cfg(feature = "camera")]
mod native;
mod payload;

use std::sync::Arc;

pub use camera::{
    classify_open_error, encode_snapshot, pick_device, CameraDevice, CameraPermission, Facing,
    Frame, LiveStream, NoCamera, VideoStream,
};
#[cfg(feature = "camera")]
pub use native::NativeCamera;
pub use file::{check_file_size, read_image_file};
pub use payload::{media_type_for, ImagePayload, ACCEPTED_MEDIA_TYPES};

/// Largest image accepted for extraction (4 MiB, the inference API limit).
pub const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

/// Camera backend for this build: the OS camera with the `camera` feature,
/// otherwise `NoCamera`.
pub fn platform_camera() -> Arc<dyn CameraDevice> {
    #[cfg(feature = "camera")]
    {
        log::info!("[CAMERA] Using native camera backend");
        Arc::new(NativeCamera)
    }
    #[cfg(not(feature = "camera"))]
    {
        log::info!("[CAMERA] Built without camera support");
        Arc::new(NoCamera)
    }
}
