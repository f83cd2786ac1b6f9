//! Error types for every domain of the app.
//!
//! Each domain has its own enum so callers match on what can actually
//! go wrong at that step. None of these are fatal: every error path
//! leaves the session on an interactive screen.

use crate::prescription::MedicineId;
use crate::session::Screen;
use thiserror::Error;

/// Generic message shown when the extraction failure carries no detail.
pub const GENERIC_EXTRACTION_FAILURE: &str = "An unknown error occurred during analysis. \
The image might be too blurry, unclear, or the content unrecognizable.";

/// Failure while acquiring an image, from a file or from the camera.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Image is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to read the image file.")]
    Unreadable(String),

    #[error("The selected file is not a supported image type")]
    UnsupportedFormat,

    #[error("Camera access is not supported on this device")]
    CameraUnsupported,

    #[error("Camera permission was denied")]
    PermissionDenied,

    #[error("Failed to capture a frame from the camera: {0}")]
    Snapshot(String),

    #[error("Failed to encode the captured image: {0}")]
    Encode(String),
}

/// A data URI that is not a base64-encoded image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("expected data:<image mime type>;base64,<data>")]
    NotDataUri,

    #[error("image data is empty")]
    Empty,

    #[error("invalid base64 image data: {0}")]
    Base64(String),
}

/// Opaque failure from the extraction call.
///
/// The invoker does not classify failures: transport errors, service
/// errors, empty output and schema violations all land here with a
/// human-readable message.
#[derive(Debug, Clone, Error)]
#[error("{}", self.user_message())]
pub struct ExtractionError {
    message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Raw message as reported by the failing step (may be empty).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message for the error screen, with the generic fallback when blank.
    pub fn user_message(&self) -> &str {
        if self.message.trim().is_empty() {
            GENERIC_EXTRACTION_FAILURE
        } else {
            &self.message
        }
    }
}

/// An event that is not valid on the current screen, or a bad edit target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("'{event}' is not allowed on the {screen:?} screen")]
    InvalidTransition { screen: Screen, event: &'static str },

    #[error("No medicine with id {0}")]
    UnknownMedicine(MedicineId),

    #[error("No image data to analyze.")]
    NoImage,

    #[error("No prescription record is available")]
    NoRecord,
}

/// Outcome of a native share attempt that did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("Sharing is not supported on this platform")]
    Unsupported,

    #[error("Sharing was cancelled")]
    Cancelled,

    #[error("Sharing was not permitted")]
    PermissionDenied,

    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Could not copy text to clipboard: {0}")]
pub struct ClipboardError(pub String);

/// Configuration and credential storage failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("API key is empty")]
    EmptyApiKey,
}
