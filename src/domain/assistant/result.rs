//! Outcome of one generative-text invocation.

use serde::Serialize;

use super::messages::{apology, NO_RESPONSE};
use crate::domain::foundation::Language;

/// One prompt and what came back for it.
///
/// Either `text` (success) or `error` (failure description) is set, never
/// both. Held by the caller until replaced; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub prompt: String,
    pub text: Option<String>,
    pub error: Option<String>,
}

impl GeneratedText {
    pub fn success(prompt: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(prompt: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text to show the user: the generated text, the no-response
    /// sentinel for an empty success, or a localized apology.
    pub fn display_text(&self, language: Language) -> String {
        match (&self.text, &self.error) {
            (_, Some(error)) => apology(language, error),
            (Some(text), None) if !text.is_empty() => text.clone(),
            _ => NO_RESPONSE.to_string(),
        }
    }
}
