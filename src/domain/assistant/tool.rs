//! The two AI assistant tools and the prompts they send.

use serde::{Deserialize, Serialize};

use crate::domain::booking::ServiceCategory;
use crate::domain::foundation::{Language, ValidationError};

/// AI tools offered on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiTool {
    /// Diagnoses a property problem and recommends a service.
    Diagnose,
    /// Writes a villa listing description for rental platforms.
    VillaCopy,
}

impl AiTool {
    /// Builds the prompt for `input`, answering in `language`.
    ///
    /// Blank input is rejected here so the gateway is never called with it.
    pub fn build_prompt(&self, input: &str, language: Language) -> Result<String, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::empty_field("input"));
        }
        let language_name = language.english_name();

        let prompt = match self {
            AiTool::Diagnose => format!(
                "Act as an expert building contractor and handyman in Bali.\n\
                 Analyze this property problem described by a user: \"{input}\".\n\
                 Provide the answer in {language_name}.\n\
                 Format the answer nicely with bold text for headers.\n\
                 Please provide:\n\
                 1. Possible Cause (Penyebab Kemungkinan)\n\
                 2. Urgency Level (Low/Medium/High)\n\
                 3. Recommended Service Category (choose from: {choices})\n\
                 4. A brief DIY tip for temporary handling before the handyman arrives.",
                choices = ServiceCategory::prompt_choices(),
            ),
            AiTool::VillaCopy => format!(
                "Act as an expert Airbnb copywriter and real estate marketer in Bali.\n\
                 Write a catchy, attractive villa listing description based on these features: \"{input}\".\n\
                 Write the response in {language_name}.\n\
                 Include relevant emojis (🌴, ☀️, 🌊, etc).\n\
                 Include 3-5 relevant hashtags for Instagram at the end."
            ),
        };

        Ok(prompt)
    }
}
