//! `ImagePayload` — an encoded still image plus its media type.
//!
//! Used both as the extraction input and as the in-memory preview source.
//! The transport form is a data URI: `data:<mime>;base64,<data>`.

use crate::error::PayloadError;
use base64::Engine;
use image::ImageFormat;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    media_type: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 body without the data-URI prefix.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }

    /// Parse a `data:<mime>;base64,<data>` URI. Only image media types pass.
    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        static DATA_URI: OnceLock<Regex> = OnceLock::new();
        let re = DATA_URI.get_or_init(|| {
            Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,([A-Za-z0-9+/=\s]*)$")
                .expect("data URI pattern is valid")
        });

        let caps = re.captures(uri.trim()).ok_or(PayloadError::NotDataUri)?;
        let body: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
        if body.is_empty() {
            return Err(PayloadError::Empty);
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|e| PayloadError::Base64(e.to_string()))?;
        Ok(Self::new(&caps[1], bytes))
    }

    /// Pixel dimensions, when the bytes decode as a known format.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(std::io::Cursor::new(&self.bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

impl fmt::Debug for ImagePayload {
    // Never dump image bytes into logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Media types the extraction service accepts inline.
pub const ACCEPTED_MEDIA_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Determine the image media type from content, falling back to the
/// file extension. Returns `None` for anything outside
/// `ACCEPTED_MEDIA_TYPES`, including image formats the service rejects.
pub fn media_type_for(bytes: &[u8], path: Option<&Path>) -> Option<String> {
    let sniffed = image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_string());
    let media_type = match sniffed {
        Some(mime) => mime,
        None => {
            let ext = path?.extension()?.to_str()?.to_lowercase();
            match ext.as_str() {
                // Phone cameras; not decodable here but accepted by the service.
                "heic" => "image/heic".to_string(),
                "heif" => "image/heif".to_string(),
                _ => ImageFormat::from_extension(&ext)?.to_mime_type().to_string(),
            }
        }
    };
    ACCEPTED_MEDIA_TYPES
        .contains(&media_type.as_str())
        .then_some(media_type)
}
