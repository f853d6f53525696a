//! Generative model client
//!
//! `GenerativeModel::complete` is one blocking-from-the-caller request:
//! no streaming, no retries. The Gemini implementation calls
//! `models/{model}:generateContent` and joins the first candidate's text parts.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::embeddings::gemini_error_detail;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send `prompt` to the model and return its raw text output.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Model returned no text{}", finish_reason_suffix(.reason))]
    EmptyResponse { reason: Option<String> },

    #[error("Missing API key")]
    MissingApiKey,
}

fn finish_reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (finish reason: {r})"))
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct GeminiGenerationConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiGenerationConfig {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .unwrap_or_default();
        Self { api_key, model }
    }
}

impl From<&crate::config::GenerationConfig> for GeminiGenerationConfig {
    fn from(config: &crate::config::GenerationConfig) -> Self {
        Self::new(None, config.model.clone())
    }
}

// ============================================================================
// Gemini API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<GenerateContent>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct GenerateContent {
    #[serde(default)]
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeneratePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GenerateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

// ============================================================================
// GeminiGenerativeClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeminiGenerativeClient {
    client: Client,
    config: GeminiGenerationConfig,
    base_url: String,
}

impl GeminiGenerativeClient {
    pub fn new(config: GeminiGenerationConfig) -> Result<Self, GenerationError> {
        Self::with_base_url(config, GEMINI_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(
        config: GeminiGenerationConfig,
        base_url: String,
    ) -> Result<Self, GenerationError> {
        if config.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiGenerativeClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let (code, message) = gemini_error_detail(status.as_u16(), error_body);

            tracing::error!(code = code, message = %message, "Gemini generation API error");

            return Err(GenerationError::Api { code, message });
        }

        let body: GenerateResponse = response.json().await?;

        let Some(candidate) = body.candidates.into_iter().next() else {
            return Err(GenerationError::EmptyResponse { reason: None });
        };

        let text: String = candidate
            .content
            .unwrap_or_default()
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(GenerationError::EmptyResponse {
                reason: candidate.finish_reason,
            });
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GeminiGenerativeClient {
        let config = GeminiGenerationConfig {
            api_key: "test-api-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
        };
        GeminiGenerativeClient::with_base_url(config, server.uri()).expect("client")
    }

    #[tokio::test]
    async fn test_complete_sends_prompt_and_joins_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-api-key"))
            .and(body_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "Is my TV covered?" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "ℹ️ More info needed. " }, { "text": "Purchase date?" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = test_client(&server).complete("Is my TV covered?").await.unwrap();
        assert_eq!(text, "ℹ️ More info needed. Purchase date?");
    }

    #[tokio::test]
    async fn test_complete_propagates_api_error_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": { "code": 503, "message": "The model is overloaded" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        match test_client(&server).complete("hello").await {
            Err(GenerationError::Api { code, message }) => {
                assert_eq!(code, 503);
                assert!(message.contains("overloaded"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_without_candidates_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).complete("hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse { reason: None }));
    }

    #[tokio::test]
    async fn test_complete_blocked_candidate_reports_finish_reason() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).complete("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Model returned no text (finish reason: SAFETY)");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let config = GeminiGenerationConfig {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
        };
        assert!(matches!(
            GeminiGenerativeClient::new(config),
            Err(GenerationError::MissingApiKey)
        ));
    }
}
