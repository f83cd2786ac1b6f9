//! Plain-text summary used for Copy All and Share.
//!
//! Layout: a numbered medicine list, then an optional "Other Information"
//! block. Every populated field appears exactly once; empty fields are
//! skipped.

use super::{non_empty, PrescriptionRecord};
use std::fmt::Write;

/// Title passed to the native share sheet.
pub const SHARE_TITLE: &str = "ScriptAssist Prescription Insights";

pub fn format_summary(record: &PrescriptionRecord) -> String {
    let mut text = String::from("Prescription Insights:\n\nMedicines:\n");

    for (index, med) in record.medicines().iter().enumerate() {
        let d = med.details();
        let _ = writeln!(text, "{}. {}", index + 1, med.display_name());
        let lines = [
            ("Dosage", Some(&d.dosage)),
            ("Frequency", Some(&d.frequency)),
            ("Duration", d.duration.as_ref()),
            ("Route", d.route_of_administration.as_ref()),
            ("Instructions", d.instructions.as_ref()),
        ];
        for (label, value) in lines {
            if let Some(v) = non_empty(value) {
                let _ = writeln!(text, "   - {}: {}", label, v);
            }
        }
        text.push('\n');
    }

    let header = record.header();
    if header.has_any() {
        text.push_str("Other Information:\n");
        let lines = [
            ("Doctor", header.doctor_name.as_ref()),
            ("Clinic", header.clinic_information.as_ref()),
            ("Date", header.date_of_prescription.as_ref()),
            ("Patient", header.patient_name.as_ref()),
        ];
        for (label, value) in lines {
            if let Some(v) = non_empty(value) {
                let _ = writeln!(text, " - {}: {}", label, v);
            }
        }
    }

    text
}
