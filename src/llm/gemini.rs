//! Gemini Flash extraction — one non-streaming generateContent call.
//!
//! The image goes inline (base64) next to the fixed instruction, and
//! `responseSchema` + `responseMimeType: "application/json"` constrain the
//! reply to the extraction contract. The reply is still validated locally:
//! anything that does not deserialize into `ExtractionOutput` is a failure.
//!
//! Key differences from a chat call:
//! - API key in the `x-goog-api-key` header
//! - Text lives in `candidates[0].content.parts[*].text`
//! - Token usage in `usageMetadata`

use super::prompts::{response_schema, EXTRACTION_PROMPT, MAX_OUTPUT_TOKENS};
use super::provider::{Extractor, ProviderInfo};
use super::types::ExtractionOutput;
use crate::capture::ImagePayload;
use crate::error::ExtractionError;
use crate::settings::{AppConfig, API_KEY_ENV_VARS};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Gemini Flash pricing (per 1M tokens, under 128k context).
const INPUT_COST_PER_MILLION: f64 = 0.10;
const OUTPUT_COST_PER_MILLION: f64 = 0.40;

pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
    temperature: f32,
    timeout: Duration,
}

/// Token counts reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl GeminiExtractor {
    pub fn new(config: &AppConfig, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: "gemini".to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint(),
            env_keys: API_KEY_ENV_VARS.iter().map(|k| k.to_string()).collect(),
            configured: self.api_key.is_some(),
        }
    }
}

#[async_trait]
impl Extractor for GeminiExtractor {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn extract(&self, image: &ImagePayload) -> Result<ExtractionOutput, ExtractionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            log::warn!("[LLM] No GEMINI_API_KEY / GOOGLE_API_KEY set, cannot analyze");
            ExtractionError::new(
                "No API key configured. Set GEMINI_API_KEY or GOOGLE_API_KEY and try again.",
            )
        })?;

        log::info!("[LLM] Provider: gemini");
        log::info!("[LLM] Model: {}", self.model);
        log::info!("[LLM] Image: {} ({} bytes)", image.media_type(), image.len());

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&build_request_body(image, self.temperature))
            .send()
            .await
            .map_err(|e| {
                log::error!("[LLM] HTTP request failed: {}", e);
                ExtractionError::new(format!("Failed to reach the analysis service: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::error!("[LLM] Failed to read response body: {}", e);
            ExtractionError::new(format!("Failed to read the analysis response: {}", e))
        })?;
        log::info!("[LLM] Response {} in {}ms", status, start.elapsed().as_millis());

        if !status.is_success() {
            log::error!(
                "[LLM] Gemini API returned {}: {}",
                status,
                preview(&body)
            );
            let message = service_error_message(&body)
                .unwrap_or_else(|| format!("Analysis service returned {}", status));
            return Err(ExtractionError::new(message));
        }

        let (output, usage) = parse_generate_content(&body)?;

        if usage != Usage::default() {
            log::info!("[LLM] Input tokens: {}", usage.input_tokens);
            log::info!("[LLM] Output tokens: {}", usage.output_tokens);
            let cost = (usage.input_tokens as f64 * INPUT_COST_PER_MILLION
                + usage.output_tokens as f64 * OUTPUT_COST_PER_MILLION)
                / 1_000_000.0;
            log::info!("[LLM] Estimated cost: ${:.6}", cost);
        }
        log::info!("[LLM] Parsed {} medicines", output.medicines.len());
        Ok(output)
    }
}

/// Request body: instruction text followed by the inline image.
pub fn build_request_body(image: &ImagePayload, temperature: f32) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    { "text": EXTRACTION_PROMPT },
                    {
                        "inlineData": {
                            "mimeType": image.media_type(),
                            "data": image.to_base64()
                        }
                    }
                ]
            }
        ],
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "temperature": temperature,
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Parse a successful generateContent body into the validated contract.
pub fn parse_generate_content(body: &str) -> Result<(ExtractionOutput, Usage), ExtractionError> {
    let json: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        ExtractionError::new(format!("The analysis service returned invalid JSON: {}", e))
    })?;

    if let Some(message) = json["error"]["message"].as_str() {
        return Err(ExtractionError::new(message));
    }

    let usage = Usage {
        input_tokens: json["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0),
        output_tokens: json["usageMetadata"]["candidatesTokenCount"].as_u64().unwrap_or(0),
    };

    let text = extract_candidate_text(&json);
    if text.trim().is_empty() {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(ExtractionError::new(format!(
                "The image was blocked by the analysis service ({}).",
                reason
            )));
        }
        let finish = json["candidates"][0]["finishReason"].as_str().unwrap_or("none");
        log::warn!("[LLM] Empty output, finishReason={}", finish);
        return Err(ExtractionError::new("The model returned no output."));
    }

    let output = ExtractionOutput::from_json_str(&strip_code_fences(&text)).map_err(|e| {
        log::warn!("[LLM] Output failed validation: {}", e.message());
        log::warn!("[LLM] Raw output: {}", preview(&text));
        e
    })?;
    Ok((output, usage))
}

/// Concatenate the text parts of the first candidate.
fn extract_candidate_text(json: &serde_json::Value) -> String {
    json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Pull `error.message` out of an error body, if present.
fn service_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json["error"]["message"]
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.to_string())
}

/// First 300 chars, for logs.
fn preview(text: &str) -> String {
    text.chars().take(300).collect()
}

/// Strip a surrounding ```json fence if the model added one anyway.
pub fn strip_code_fences(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[A-Za-z0-9]*\s*\n?(.*?)\s*```\s*$").expect("fence pattern is valid")
    });
    match re.captures(text) {
        Some(caps) => caps[1].to_string(),
        None => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 1290, "candidatesTokenCount": 61 }
        })
        .to_string()
    }

    #[test]
    fn request_body_carries_prompt_image_and_schema() {
        let image = ImagePayload::new("image/jpeg", vec![1, 2, 3]);
        let body = build_request_body(&image, 0.1);
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], EXTRACTION_PROMPT);
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            serde_json::json!(["medicines"])
        );
    }

    #[test]
    fn parses_valid_response_and_usage() {
        let body = success_body(
            r#"{"medicines":[{"medicineName":"Amoxicillin","dosage":"500mg","frequency":"3x daily"}],"doctorName":"Dr. Lee"}"#,
        );
        let (out, usage) = parse_generate_content(&body).unwrap();
        assert_eq!(out.medicines[0].medicine_name, "Amoxicillin");
        assert_eq!(out.doctor_name.as_deref(), Some("Dr. Lee"));
        assert_eq!(usage, Usage { input_tokens: 1290, output_tokens: 61 });
    }

    #[test]
    fn joins_split_text_parts() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [
                { "text": "{\"medicines\":[" },
                { "text": "]}" }
            ]}}]
        })
        .to_string();
        let (out, _) = parse_generate_content(&body).unwrap();
        assert!(out.medicines.is_empty());
    }

    #[test]
    fn schema_violation_is_failure() {
        let body = success_body(r#"{"medicines":[{"medicineName":"X"}]}"#);
        assert!(parse_generate_content(&body).is_err());
    }

    #[test]
    fn no_candidates_is_failure() {
        let err = parse_generate_content(r#"{"candidates":[]}"#).unwrap_err();
        assert_eq!(err.message(), "The model returned no output.");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let err = parse_generate_content(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .unwrap_err();
        assert!(err.message().contains("SAFETY"));
    }

    #[test]
    fn error_body_message_is_surfaced() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(service_error_message(body).as_deref(), Some("API key not valid."));
        assert_eq!(parse_generate_content(body).unwrap_err().message(), "API key not valid.");
        assert_eq!(service_error_message("<html>502</html>"), None);
    }

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let extractor = GeminiExtractor::new(&AppConfig::default(), None);
        assert!(!extractor.info().configured);
        let err = extractor
            .extract(&ImagePayload::new("image/png", vec![1]))
            .await
            .unwrap_err();
        assert!(err.message().contains("No API key"));
    }

    #[test]
    fn endpoint_uses_configured_model() {
        let config = AppConfig {
            api_base: "http://localhost:9999/v1beta/".into(),
            ..AppConfig::default()
        };
        let extractor = GeminiExtractor::new(&config, Some("k".into()));
        assert_eq!(
            extractor.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
