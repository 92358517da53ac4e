//! Gemini Provider - Implementation of TextGenerator for Google's Generative Language API.
//!
//! Sends a single-turn `generateContent` request and concatenates the text
//! parts of the first candidate. There is no retry: each call reaches the
//! API at most once.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiConfig;
use crate::ports::{AIError, FinishReason, GenerationResponse, ProviderInfo, TextGenerator};

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Builds the provider configuration from application config.
    ///
    /// A missing key yields an empty one; every call then fails with
    /// `AIError::AuthenticationFailed` without touching the network.
    pub fn from_app_config(config: &AiConfig) -> Self {
        Self::new(config.api_key.clone().unwrap_or_default())
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout())
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    fn has_api_key(&self) -> bool {
        !self.api_key().is_empty()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(&self, prompt: &str) -> Result<Response, AIError> {
        self.client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key())])
            .json(&GeminiRequest::single_turn(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), &error_body))
    }

    async fn parse_response(&self, response: Response) -> Result<GenerationResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        gemini_response.into_generation(&self.config.model)
    }
}

/// Maps a non-success status onto `AIError`.
fn classify_status(status: u16, error_body: &str) -> AIError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(error_body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| error_body.to_string());

    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::QuotaExceeded(message),
        400 if message.contains("API key not valid") => AIError::AuthenticationFailed,
        400 => AIError::InvalidRequest(message),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, message)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, message)),
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, AIError> {
        if !self.config.has_api_key() {
            return Err(AIError::AuthenticationFailed);
        }

        tracing::debug!(model = %self.config.model, "Calling Gemini generateContent");
        let response = self.send_request(prompt).await?;
        self.parse_response(response).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", self.config.model.clone())
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    fn single_turn(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiResponse {
    fn into_generation(self, configured_model: &str) -> Result<GenerationResponse, AIError> {
        let model = self
            .model_version
            .unwrap_or_else(|| configured_model.to_string());

        let Some(candidate) = self.candidates.into_iter().next() else {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(AIError::content_filtered(reason));
            }
            return Ok(GenerationResponse::new("", model));
        };

        let finish_reason = match candidate.finish_reason.as_deref() {
            None | Some("STOP") => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") | Some("SPII") => {
                FinishReason::ContentFilter
            }
            Some(_) => FinishReason::Other,
        };

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok(GenerationResponse::new(content, model).with_finish_reason(finish_reason))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<GenerationResponse, AIError> {
        serde_json::from_str::<GeminiResponse>(json)
            .unwrap()
            .into_generation("gemini-2.5-flash")
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_model("gemini-2.0-flash")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_from_app_config_without_key() {
        let config = GeminiConfig::from_app_config(&AiConfig::default());
        assert!(!config.has_api_key());
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn config_debug_hides_key() {
        let config = GeminiConfig::new("super-secret-key");
        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }

    #[test]
    fn generate_url_includes_model() {
        let provider = GeminiProvider::new(
            GeminiConfig::new("k").with_base_url("https://example.test/v1beta/"),
        )
        .unwrap();
        assert_eq!(
            provider.generate_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_serializes_single_user_turn() {
        let json = serde_json::to_value(GeminiRequest::single_turn("AC bocor")).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "AC bocor");
    }

    #[test]
    fn response_concatenates_text_parts() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]},
                    "finishReason": "STOP"
                }],
                "modelVersion": "gemini-2.5-flash-001"
            }"#,
        )
        .unwrap();

        assert_eq!(response.content, "Hello world");
        assert_eq!(response.model, "gemini-2.5-flash-001");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let response = parse(r#"{}"#).unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.model, "gemini-2.5-flash");
    }

    #[test]
    fn blocked_prompt_is_content_filtered() {
        let result = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        assert_eq!(result, Err(AIError::content_filtered("SAFETY")));
    }

    #[test]
    fn safety_stopped_candidate_maps_finish_reason() {
        let response = parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.finish_reason, FinishReason::ContentFilter);
    }

    #[test]
    fn status_classification() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            classify_status(429, body),
            AIError::QuotaExceeded("Resource has been exhausted".to_string())
        );
        assert_eq!(classify_status(403, ""), AIError::AuthenticationFailed);
        assert_eq!(
            classify_status(400, r#"{"error": {"message": "API key not valid. Please pass a valid API key."}}"#),
            AIError::AuthenticationFailed
        );
        assert!(matches!(classify_status(400, "bad"), AIError::InvalidRequest(_)));
        assert!(matches!(classify_status(503, "overloaded"), AIError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let provider = GeminiProvider::new(GeminiConfig::new("")).unwrap();
        let result = provider.generate("hi").await;
        assert_eq!(result, Err(AIError::AuthenticationFailed));
    }

    #[test]
    fn provider_info_reports_gemini() {
        let provider = GeminiProvider::new(GeminiConfig::new("k")).unwrap();
        assert_eq!(provider.provider_info(), ProviderInfo::new("gemini", "gemini-2.5-flash"));
    }
}
