//! In-place correction of one extracted medicine.
//!
//! Edits are local and synchronous: no revalidation against the service,
//! no re-extraction. Any text is accepted, including empty text.

use super::{MedicineId, PrescriptionRecord};
use crate::error::SessionError;

/// Field changes for one medicine. `None` leaves a field untouched.
///
/// Empty text on an optional field (duration, route, instructions) removes
/// the value; required fields keep whatever text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicineEdit {
    pub medicine_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub route_of_administration: Option<String>,
    pub instructions: Option<String>,
}

impl MedicineEdit {
    /// Set a field by its form name (camelCase or snake_case).
    ///
    /// Returns false for an unknown field name.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let value = Some(value.into());
        match field {
            "medicineName" | "medicine_name" | "name" => self.medicine_name = value,
            "dosage" => self.dosage = value,
            "frequency" => self.frequency = value,
            "duration" => self.duration = value,
            "routeOfAdministration" | "route_of_administration" | "route" => {
                self.route_of_administration = value
            }
            "instructions" => self.instructions = value,
            _ => return false,
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn optional_text(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl PrescriptionRecord {
    /// Return a new record with the matching entry replaced by its edited
    /// version. Its id and position are kept; other entries are untouched.
    pub fn with_edit(
        &self,
        id: MedicineId,
        edit: MedicineEdit,
    ) -> Result<PrescriptionRecord, SessionError> {
        let index = self
            .medicines
            .iter()
            .position(|m| m.id == id)
            .ok_or(SessionError::UnknownMedicine(id))?;

        let mut updated = self.clone();
        let details = &mut updated.medicines[index].details;

        if let Some(v) = edit.medicine_name {
            details.medicine_name = v;
        }
        if let Some(v) = edit.dosage {
            details.dosage = v;
        }
        if let Some(v) = edit.frequency {
            details.frequency = v;
        }
        if let Some(v) = edit.duration {
            details.duration = optional_text(v);
        }
        if let Some(v) = edit.route_of_administration {
            details.route_of_administration = optional_text(v);
        }
        if let Some(v) = edit.instructions {
            details.instructions = optional_text(v);
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn record() -> PrescriptionRecord {
        let mut second = medicine("Metformin", "850mg", "twice daily");
        second.duration = Some("30 days".into());
        PrescriptionRecord::from_extraction(output(vec![
            medicine("Amoxicillin", "500mg", "3x daily"),
            second,
            medicine("Cetirizine", "10mg", "nightly"),
        ]))
    }

    #[test]
    fn edit_changes_only_the_target_entry() {
        let before = record();
        let target = before.medicines()[1].id();

        let mut edit = MedicineEdit::default();
        edit.set("dosage", "1000mg");
        edit.set("instructions", "with food");
        let after = before.with_edit(target, edit).unwrap();

        assert_eq!(after.medicines()[0], before.medicines()[0]);
        assert_eq!(after.medicines()[2], before.medicines()[2]);

        let edited = &after.medicines()[1];
        assert_eq!(edited.id(), target);
        assert_eq!(edited.details().dosage, "1000mg");
        assert_eq!(edited.details().instructions.as_deref(), Some("with food"));
        assert_eq!(edited.details().frequency, "twice daily");
        assert_eq!(edited.details().duration.as_deref(), Some("30 days"));
        assert_eq!(after.header(), before.header());
    }

    #[test]
    fn empty_text_clears_optional_and_keeps_required() {
        let before = record();
        let target = before.medicines()[1].id();

        let mut edit = MedicineEdit::default();
        edit.set("duration", "");
        edit.set("medicineName", "");
        let after = before.with_edit(target, edit).unwrap();

        assert_eq!(after.medicines()[1].details().duration, None);
        assert_eq!(after.medicines()[1].details().medicine_name, "");
        assert_eq!(after.medicines()[1].display_name(), "N/A");
    }

    #[test]
    fn unknown_id_is_an_error() {
        let a = record();
        let stranger = record().medicines()[0].id();
        let err = a.with_edit(stranger, MedicineEdit::default()).unwrap_err();
        assert_eq!(err, SessionError::UnknownMedicine(stranger));
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        let mut edit = MedicineEdit::default();
        assert!(!edit.set("strength", "5mg"));
        assert!(edit.is_empty());
        assert!(edit.set("route", "oral"));
        assert_eq!(edit.route_of_administration.as_deref(), Some("oral"));
    }
}
