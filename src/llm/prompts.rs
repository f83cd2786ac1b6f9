//! Extraction prompt and response schema.
//!
//! These are the contract between ScriptAssist and the model. The schema
//! mirrors `ExtractionOutput` field for field.

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Fixed instruction sent with every prescription image.
pub const EXTRACTION_PROMPT: &str = r#"You are a medical expert extracting information from a prescription image.
Extract the following information for each prescribed item:
- Medicine Name
- Dosage
- Frequency
- Duration (if available)
- Route of Administration (if available)
- Instructions (if available)

Also, attempt to extract:
- Doctor's Name
- Clinic Information
- Patient Name (if available)
- Date of Prescription (if available)

Structure the output clearly, associating all details with the respective medicine.

Prescription Image:"#;

fn text_field(description: &str) -> serde_json::Value {
    serde_json::json!({ "type": "STRING", "description": description })
}

/// Response schema in the generateContent `responseSchema` dialect.
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "medicines": {
                "type": "ARRAY",
                "description": "List of extracted medicines with details.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "medicineName": text_field("The name of the medicine."),
                        "dosage": text_field("The dosage of the medicine (e.g., 500mg)."),
                        "frequency": text_field("How often the medicine should be taken (e.g., twice daily)."),
                        "duration": text_field("How long the medicine should be taken for (e.g. 7 days)."),
                        "routeOfAdministration": text_field("How the medicine should be administered (e.g. orally, topical)."),
                        "instructions": text_field("Any special instructions (e.g., with food, before bed).")
                    },
                    "required": ["medicineName", "dosage", "frequency"]
                }
            },
            "doctorName": text_field("The name of the doctor."),
            "clinicInformation": text_field("The clinic information."),
            "patientName": text_field("The patient name."),
            "dateOfPrescription": text_field("The date of the prescription.")
        },
        "required": ["medicines"]
    })
}
