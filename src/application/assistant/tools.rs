//! AiTools - the diagnosis and villa-copy assistants.

use std::sync::Arc;

use super::GenerativeTextGateway;
use crate::application::booking::BookingSessionStore;
use crate::domain::assistant::{AiTool, GeneratedText};
use crate::domain::foundation::{Language, ValidationError};

/// Result of one tool run, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool: AiTool,
    pub result: GeneratedText,
    /// Generated text, no-response sentinel, or apology.
    pub display: String,
}

/// Runs the assistant tools against the gateway.
pub struct AiTools {
    gateway: Arc<GenerativeTextGateway>,
    session: Arc<BookingSessionStore>,
}

impl AiTools {
    pub fn new(gateway: Arc<GenerativeTextGateway>, session: Arc<BookingSessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Runs `tool` on the user's input in the session language.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for blank input; the gateway is not called.
    pub async fn run(&self, tool: AiTool, input: &str) -> Result<ToolOutput, ValidationError> {
        let language: Language = self.session.language();
        let prompt = tool.build_prompt(input, language)?;

        tracing::info!(tool = ?tool, language = language.code(), "Running AI tool");
        let result = self.gateway.generate_result(&prompt).await;
        let display = result.display_text(language);

        Ok(ToolOutput {
            tool,
            result,
            display,
        })
    }

    /// Hands a diagnosis to the booking form as its description.
    ///
    /// Only successful results are handed over. Returns whether the form
    /// was updated.
    pub fn book_recommended(&self, output: &ToolOutput) -> bool {
        if output.result.is_error() {
            return false;
        }
        self.session.set_booking_description(output.display.clone());
        true
    }
}
