//! Cosmetic content for the processing and error screens.
//!
//! The rotating message has no effect on session state.

use std::time::Duration;

pub const PROCESSING_MESSAGES: [&str; 4] = [
    "Analyzing Prescription...",
    "Extracting Medical Insights...",
    "Decoding Handwritten Text...",
    "Powered by Gemini AI.",
];

pub const PROCESSING_ROTATE_INTERVAL: Duration = Duration::from_millis(2500);

/// Shown on the error screen under "Tips for a Better Scan".
pub const SCAN_TIPS: [&str; 5] = [
    "Ensure good, even lighting. Avoid shadows and glare.",
    "Place the prescription on a flat, contrasting surface.",
    "Make sure the text is clear and in focus.",
    "Hold your phone steady while taking the picture.",
    "Capture the entire prescription, avoiding cutoff edges.",
];

#[derive(Debug, Default, Clone)]
pub struct ProcessingTicker {
    index: usize,
}

impl ProcessingTicker {
    pub fn current(&self) -> &'static str {
        PROCESSING_MESSAGES[self.index]
    }

    /// Move to the next message, wrapping around.
    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % PROCESSING_MESSAGES.len();
        self.current()
    }
}
