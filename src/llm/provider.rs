//! Extractor trait — the one seam between the session and the model.
//!
//! The pipeline only sees `Extractor`; the Gemini implementation lives in
//! gemini.rs. Tests and embedders plug in their own.

use super::types::{ExtractionInput, ExtractionOutput};
use crate::capture::ImagePayload;
use crate::error::ExtractionError;
use async_trait::async_trait;
use serde::Serialize;

/// Image in, validated structured output out, or one opaque failure.
///
/// Exactly one outbound call per invocation: no retry, no streaming, no
/// caching across calls.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, image: &ImagePayload) -> Result<ExtractionOutput, ExtractionError>;
}

/// Validate the request shape, then run one extraction.
///
/// A malformed input fails here, before anything goes over the network.
pub async fn extract_prescription_data(
    extractor: &dyn Extractor,
    input: &ExtractionInput,
) -> Result<ExtractionOutput, ExtractionError> {
    let image = input.validate()?;
    extractor.extract(&image).await
}

/// Provider metadata for `script-assist check`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub model: String,
    pub endpoint: String,
    pub env_keys: Vec<String>,
    pub configured: bool,
}
