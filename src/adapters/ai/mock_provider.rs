//! Mock text generator for testing.
//!
//! Configurable implementation of the `TextGenerator` port so gateway and
//! tool tests run without calling the Gemini API.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Error injection
//! - Prompt recording for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_response("AC perlu dibersihkan.")
//!     .with_error(AIError::QuotaExceeded("RESOURCE_EXHAUSTED".into()));
//!
//! let first = generator.generate("AC bocor").await?;
//! assert_eq!(first.content, "AC perlu dibersihkan.");
//! assert!(generator.generate("AC bocor").await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{AIError, FinishReason, GenerationResponse, ProviderInfo, TextGenerator};

/// Text returned when no response has been queued.
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

/// A configured mock response.
#[derive(Debug, Clone)]
enum MockResponse {
    Success {
        content: String,
        finish_reason: FinishReason,
    },
    Error(AIError),
}

/// Mock text generator.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Prompts received, in call order.
    calls: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    /// Creates a new mock generator with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_response_full(content, FinishReason::Stop)
    }

    /// Adds a successful response with an explicit finish reason.
    pub fn with_response_full(self, content: impl Into<String>, finish_reason: FinishReason) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
            finish_reason,
        });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: AIError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Returns the number of calls made to this generator.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all prompts received.
    pub fn get_calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: DEFAULT_MOCK_RESPONSE.to_string(),
                finish_reason: FinishReason::Stop,
            })
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, AIError> {
        lock(&self.calls).push(prompt.to_string());

        match self.next_response() {
            MockResponse::Success {
                content,
                finish_reason,
            } => Ok(GenerationResponse::new(content, self.info.model.clone())
                .with_finish_reason(finish_reason)),
            MockResponse::Error(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_response() {
        let generator = MockTextGenerator::new().with_response("Hello from mock!");

        let response = generator.generate("hi").await.unwrap();

        assert_eq!(response.content, "Hello from mock!");
        assert_eq!(response.model, "mock-model-1");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn returns_responses_in_order_then_default() {
        let generator = MockTextGenerator::new()
            .with_response("First")
            .with_response("Second");

        assert_eq!(generator.generate("a").await.unwrap().content, "First");
        assert_eq!(generator.generate("b").await.unwrap().content, "Second");
        assert_eq!(
            generator.generate("c").await.unwrap().content,
            DEFAULT_MOCK_RESPONSE
        );
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let generator = MockTextGenerator::new().with_error(AIError::AuthenticationFailed);

        let result = generator.generate("hi").await;

        assert_eq!(result, Err(AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn records_prompts() {
        let generator = MockTextGenerator::new();

        generator.generate("first prompt").await.unwrap();
        generator.generate("second prompt").await.unwrap();

        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.get_calls(), vec!["first prompt", "second prompt"]);
    }

    #[tokio::test]
    async fn clones_share_queue_and_history() {
        let generator = MockTextGenerator::new().with_response("shared");
        let clone = generator.clone();

        assert_eq!(clone.generate("x").await.unwrap().content, "shared");
        assert_eq!(generator.call_count(), 1);
    }
}
