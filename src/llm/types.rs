//! Extraction contract — the shapes exchanged with the inference service.
//!
//! The service returns JSON that deserializes directly into
//! `ExtractionOutput`. Validation is structural only: required text fields
//! must be present as strings, optional ones may be missing. Anything that
//! does not fit is an extraction failure; nothing is coerced.

use crate::capture::ImagePayload;
use crate::error::ExtractionError;
use serde::{Deserialize, Serialize};

/// Request shape: one prescription image as a media-typed data URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionInput {
    pub prescription_image: String,
}

impl ExtractionInput {
    pub fn new(image: &ImagePayload) -> Self {
        Self {
            prescription_image: image.to_data_uri(),
        }
    }

    /// Validate the input field and decode it back into a payload.
    pub fn validate(&self) -> Result<ImagePayload, ExtractionError> {
        ImagePayload::from_data_uri(&self.prescription_image)
            .map_err(|e| ExtractionError::new(format!("Invalid prescription image: {}", e)))
    }
}

/// One prescribed item as produced by the service (no local identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMedicine {
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_of_administration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Full extraction result for one image, before identifiers are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutput {
    pub medicines: Vec<ExtractedMedicine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_prescription: Option<String>,
}

impl ExtractionOutput {
    /// Parse and validate raw service output.
    pub fn from_json_str(raw: &str) -> Result<Self, ExtractionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::new("The model returned no output."));
        }
        serde_json::from_str::<Self>(trimmed).map_err(|e| {
            ExtractionError::new(format!(
                "The model returned data in an unexpected format: {}",
                e
            ))
        })
    }
}
