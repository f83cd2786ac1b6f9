//! Export of the results summary: clipboard copy and native share.
//!
//! Share falls back to clipboard copy whenever the share sheet is missing,
//! cancelled, refused, or broken. Every outcome is reported as a `Notice`.

use crate::error::{ClipboardError, ShareError};
use crate::notice::Notice;
use crate::prescription::{format_summary, PrescriptionRecord, SHARE_TITLE};
use async_trait::async_trait;

/// Destination for plain-text copy.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via arboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError(e.to_string()))?;
        log::info!("[EXPORT] Copied {} chars to clipboard", text.len());
        Ok(())
    }
}

/// Platform share sheet.
#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

/// Backend for platforms without a share sheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareSheet;

#[async_trait]
impl ShareSheet for NoShareSheet {
    async fn share(&self, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}

/// Copy the formatted summary.
pub fn copy_summary(record: &PrescriptionRecord, clipboard: &dyn ClipboardSink) -> Notice {
    match clipboard.set_text(&format_summary(record)) {
        Ok(()) => Notice::info("Copied to clipboard!", None),
        Err(e) => {
            log::warn!("[EXPORT] {}", e);
            Notice::error("Failed to copy", "Could not copy text to clipboard.")
        }
    }
}

/// Share the formatted summary, falling back to clipboard copy.
pub async fn share_summary(
    record: &PrescriptionRecord,
    share: &dyn ShareSheet,
    clipboard: &dyn ClipboardSink,
) -> Notice {
    let text = format_summary(record);
    let err = match share.share(SHARE_TITLE, &text).await {
        Ok(()) => {
            log::info!("[EXPORT] Shared summary");
            return Notice::info("Shared", Some("Prescription insights shared successfully.".into()));
        }
        Err(e) => e,
    };

    log::info!("[EXPORT] Share unavailable ({}), falling back to clipboard", err);
    let copied = clipboard.set_text(&text).is_ok();
    let title = match &err {
        ShareError::Unsupported => "Share Not Supported",
        ShareError::Cancelled => "Share Cancelled",
        ShareError::PermissionDenied => "Share Permission Denied",
        ShareError::Failed(_) => "Share Error",
    };
    let description = if copied {
        "Content copied to clipboard instead."
    } else {
        "Could not share or copy to clipboard."
    };

    match err {
        ShareError::Unsupported | ShareError::Cancelled => Notice::info(title, Some(description.into())),
        ShareError::PermissionDenied | ShareError::Failed(_) => Notice::error(title, description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::prescription::fixtures::{medicine, output};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClipboard {
        text: Mutex<Option<String>>,
        fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("no display".into()));
            }
            *self.text.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    struct FixedShare(Result<(), ShareError>);

    #[async_trait]
    impl ShareSheet for FixedShare {
        async fn share(&self, title: &str, _text: &str) -> Result<(), ShareError> {
            assert_eq!(title, SHARE_TITLE);
            self.0.clone()
        }
    }

    fn record() -> PrescriptionRecord {
        PrescriptionRecord::from_extraction(output(vec![medicine("Ibuprofen", "200mg", "as needed")]))
    }

    #[test]
    fn copy_places_summary_on_clipboard() {
        let clipboard = RecordingClipboard::default();
        let notice = copy_summary(&record(), &clipboard);
        assert_eq!(notice.title, "Copied to clipboard!");
        let text = clipboard.text.lock().unwrap().clone().unwrap();
        assert_eq!(text, format_summary(&record()));
    }

    #[test]
    fn copy_failure_is_reported() {
        let clipboard = RecordingClipboard { fail: true, ..Default::default() };
        let notice = copy_summary(&record(), &clipboard);
        assert_eq!(notice.title, "Failed to copy");
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn successful_share_does_not_touch_clipboard() {
        let clipboard = RecordingClipboard::default();
        let notice = share_summary(&record(), &FixedShare(Ok(())), &clipboard).await;
        assert_eq!(notice.title, "Shared");
        assert!(clipboard.text.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn unsupported_share_falls_back_to_copy() {
        let clipboard = RecordingClipboard::default();
        let notice = share_summary(&record(), &NoShareSheet, &clipboard).await;
        assert_eq!(notice.title, "Share Not Supported");
        assert_eq!(notice.description.as_deref(), Some("Content copied to clipboard instead."));
        assert!(clipboard.text.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn fallback_matrix() {
        let cases = [
            (ShareError::Cancelled, "Share Cancelled", NoticeLevel::Info),
            (ShareError::PermissionDenied, "Share Permission Denied", NoticeLevel::Error),
            (ShareError::Failed("boom".into()), "Share Error", NoticeLevel::Error),
        ];
        for (err, title, level) in cases {
            let clipboard = RecordingClipboard { fail: true, ..Default::default() };
            let notice = share_summary(&record(), &FixedShare(Err(err)), &clipboard).await;
            assert_eq!(notice.title, title);
            assert_eq!(notice.level, level);
            assert_eq!(
                notice.description.as_deref(),
                Some("Could not share or copy to clipboard.")
            );
        }
    }
}
