//! Prescription domain — the record shown on the results screen.
//!
//! A `PrescriptionRecord` is built once from an `ExtractionOutput`: every
//! medicine gets a locally generated `MedicineId` so list rendering and
//! later edits address a stable key. Identifiers never change afterwards.

mod dosage_form;
mod edit;
mod summary;

pub use dosage_form::DosageForm;
pub use edit::MedicineEdit;
pub use summary::{format_summary, SHARE_TITLE};

use crate::llm::types::{ExtractedMedicine, ExtractionOutput};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Stable, client-side identifier for one medicine entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicineId(Uuid);

impl MedicineId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MedicineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MedicineId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One prescribed item plus its local identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineEntry {
    id: MedicineId,
    #[serde(flatten)]
    details: ExtractedMedicine,
}

impl MedicineEntry {
    pub fn id(&self) -> MedicineId {
        self.id
    }

    pub fn details(&self) -> &ExtractedMedicine {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.medicine_name
    }

    /// Title for the medicine card ("N/A" when the name is empty).
    pub fn display_name(&self) -> &str {
        non_empty(Some(&self.details.medicine_name)).unwrap_or("N/A")
    }

    pub fn dosage_form(&self) -> DosageForm {
        DosageForm::infer(
            self.details.route_of_administration.as_deref(),
            Some(&self.details.medicine_name),
        )
    }
}

/// Header fields the image may or may not show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_prescription: Option<String>,
}

impl PrescriptionHeader {
    /// True when at least one header field has visible text.
    pub fn has_any(&self) -> bool {
        [
            &self.doctor_name,
            &self.clinic_information,
            &self.date_of_prescription,
            &self.patient_name,
        ]
        .iter()
        .any(|f| non_empty(f.as_ref()).is_some())
    }
}

/// Extraction result for one image, with identifiers assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRecord {
    medicines: Vec<MedicineEntry>,
    #[serde(flatten)]
    header: PrescriptionHeader,
}

impl PrescriptionRecord {
    /// Build a record from validated service output.
    ///
    /// Order and cardinality are preserved; each entry gets a fresh id
    /// that is unique within the record.
    pub fn from_extraction(output: ExtractionOutput) -> Self {
        let mut seen = HashSet::with_capacity(output.medicines.len());
        let medicines = output
            .medicines
            .into_iter()
            .map(|details| {
                let mut id = MedicineId::generate();
                while !seen.insert(id) {
                    id = MedicineId::generate();
                }
                MedicineEntry { id, details }
            })
            .collect();

        Self {
            medicines,
            header: PrescriptionHeader {
                doctor_name: output.doctor_name,
                clinic_information: output.clinic_information,
                patient_name: output.patient_name,
                date_of_prescription: output.date_of_prescription,
            },
        }
    }

    pub fn medicines(&self) -> &[MedicineEntry] {
        &self.medicines
    }

    pub fn header(&self) -> &PrescriptionHeader {
        &self.header
    }

    pub fn medicine(&self, id: MedicineId) -> Option<&MedicineEntry> {
        self.medicines.iter().find(|m| m.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }
}

/// Empty text counts as absent; whitespace is kept as typed.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}
