//! GenerativeTextGateway - prompt in, displayable text out.
//!
//! Failures never reach the caller: they are logged and turned into a
//! localized apology that embeds the error description.

use std::sync::Arc;

use crate::domain::assistant::GeneratedText;
use crate::domain::foundation::Language;
use crate::ports::TextGenerator;

/// Sends prompts to the generative-text backend.
pub struct GenerativeTextGateway {
    generator: Arc<dyn TextGenerator>,
    language: Language,
}

impl GenerativeTextGateway {
    /// Creates a gateway that apologizes in Indonesian.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            language: Language::default(),
        }
    }

    /// Sets the language of apology texts.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Generates text for `prompt`.
    ///
    /// Returns the backend text verbatim, "No response generated." for an
    /// empty answer, or an apology containing `(Error: ` on any failure.
    /// The backend is called exactly once.
    pub async fn generate(&self, prompt: &str) -> String {
        self.generate_result(prompt).await.display_text(self.language)
    }

    /// Like [`generate`](Self::generate) but keeps success and failure apart.
    pub async fn generate_result(&self, prompt: &str) -> GeneratedText {
        let info = self.generator.provider_info();
        tracing::debug!(provider = %info.name, model = %info.model, "Generating text");

        match self.generator.generate(prompt).await {
            Ok(response) => {
                if response.content.is_empty() {
                    tracing::warn!(
                        finish_reason = ?response.finish_reason,
                        "Generative backend returned no text"
                    );
                }
                GeneratedText::success(prompt, response.content)
            }
            Err(e) => {
                tracing::error!(provider = %info.name, "Text generation failed: {}", e);
                GeneratedText::failure(prompt, e.to_string())
            }
        }
    }
}
