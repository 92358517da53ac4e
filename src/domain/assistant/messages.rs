//! User-facing texts produced by the generative text gateway.

use crate::domain::foundation::Language;

/// Returned when the backend answers successfully but with no text.
pub const NO_RESPONSE: &str = "No response generated.";

/// Substring present in every apology, whatever the language.
pub const APOLOGY_MARKER: &str = "(Error: ";

/// Safe replacement text for a failed generation.
///
/// Embeds the error description so support can tell failures apart.
pub fn apology(language: Language, error_description: &str) -> String {
    let description = if error_description.trim().is_empty() {
        "Unknown error"
    } else {
        error_description
    };

    let lead = match language {
        Language::Id => "Maaf, sistem AI sedang sibuk atau terjadi kesalahan.",
        Language::En => "Sorry, the AI system is busy or an error occurred.",
    };

    format!("{} {}{})", lead, APOLOGY_MARKER, description)
}

/// Returns true if `text` is an apology produced by [`apology`].
pub fn is_apology(text: &str) -> bool {
    text.contains(APOLOGY_MARKER)
}
