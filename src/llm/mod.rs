//! LLM domain — prescription image extraction.
//!
//! External code should only use the items exported here.
//!
//! Providers:
//!   - Google Gemini Flash (gemini.rs)
//!
//! Shared:
//!   - prompts.rs  — extraction instruction + response schema
//!   - provider.rs — `Extractor` seam + provider metadata
//!   - types.rs    — extraction input/output contract

mod gemini;
pub mod prompts;
pub mod provider;
pub mod types;

pub use gemini::{build_request_body, parse_generate_content, GeminiExtractor, Usage};
pub use provider::{extract_prescription_data, Extractor, ProviderInfo};
pub use types::{ExtractedMedicine, ExtractionInput, ExtractionOutput};
