//! File path acquisition: size pre-flight, async read, media type detection.

use super::payload::{media_type_for, ImagePayload};
use crate::error::CaptureError;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Pre-flight size check. Runs before any read or network use.
pub async fn check_file_size(path: &Path, limit: u64) -> Result<u64, CaptureError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| CaptureError::Unreadable(e.to_string()))?;
    if !meta.is_file() {
        return Err(CaptureError::Unreadable(format!(
            "{} is not a file",
            path.display()
        )));
    }
    let size = meta.len();
    if size > limit {
        log::warn!("[CAPTURE] Rejected {} ({} bytes > {})", path.display(), size, limit);
        return Err(CaptureError::TooLarge { size, limit });
    }
    Ok(size)
}

/// Read an image file into a payload.
///
/// The size limit is re-checked against the bytes actually read, in case
/// the file changed after the pre-flight check. At most `limit + 1` bytes
/// are ever buffered.
pub async fn read_image_file(path: &Path, limit: u64) -> Result<ImagePayload, CaptureError> {
    let start = std::time::Instant::now();
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| CaptureError::Unreadable(e.to_string()))?;
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| CaptureError::Unreadable(e.to_string()))?;

    if bytes.len() as u64 > limit {
        return Err(CaptureError::TooLarge {
            size: bytes.len() as u64,
            limit,
        });
    }
    if bytes.is_empty() {
        return Err(CaptureError::Unreadable(format!("{} is empty", path.display())));
    }

    let media_type = media_type_for(&bytes, Some(path)).ok_or(CaptureError::UnsupportedFormat)?;
    log::info!(
        "[CAPTURE] Read {} ({} bytes, {}) in {}ms",
        path.display(),
        bytes.len(),
        media_type,
        start.elapsed().as_millis()
    );
    Ok(ImagePayload::new(media_type, bytes))
}
