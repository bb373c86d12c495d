//! Gemini text generation backend.
//!
//! Calls the `generateContent` endpoint of the Generative Language API.
//! One prompt in, one block of text out — no streaming, no tool calls.

use async_trait::async_trait;
use edumentor_core::error::GenerationError;
use edumentor_core::generate::{GenerationRequest, TextGenerator};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A Gemini-backed text generator.
pub struct GeminiGenerator {
    model: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a new generator for the given model.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            model: model.into(),
            base_url: DEFAULT_BASE_URL.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Point the generator at a different endpoint (used against proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        let body = request_body(&request);

        debug!(model = %self.model, "Sending generation request");

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GenerationError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(GenerationError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Generation backend returned error");
            return Err(GenerationError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::ApiError {
                    status_code: 200,
                    message: format!("Failed to parse response: {e}"),
                })?;

        extract_text(api_response).ok_or_else(|| {
            GenerationError::MalformedResponse("No text in any candidate".into())
        })
    }
}

fn request_body(request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [{"parts": [{"text": request.prompt}]}],
        "generationConfig": {
            "temperature": request.temperature,
            "maxOutputTokens": request.max_output_tokens,
        },
    })
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: ApiResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() { None } else { Some(text) }
}

// --- Gemini API response types (internal) ---

#[derive(Debug, Default, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: ApiContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_formatting() {
        let generator =
            GeminiGenerator::new("gemini-2.0-flash", "key").with_base_url("http://localhost:9999/");
        assert_eq!(
            generator.request_url(),
            "http://localhost:9999/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn request_body_matches_the_wire_format() {
        let request = GenerationRequest::new("Explain osmosis.")
            .with_temperature(0.8)
            .with_max_output_tokens(3000);
        let body = request_body(&request);

        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Explain osmosis."
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 3000);
        assert!(body["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn parse_response_and_extract_text() {
        let data = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "Photosynthesis "}, {"text": "converts light."}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            extract_text(parsed).as_deref(),
            Some("Photosynthesis converts light.")
        );
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let parsed: ApiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(parsed).is_none());

        let parsed: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(parsed).is_none());
    }

    #[test]
    fn candidate_without_content_yields_no_text() {
        // Safety-blocked candidates arrive with no content field at all.
        let data = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(extract_text(parsed).is_none());
    }
}
