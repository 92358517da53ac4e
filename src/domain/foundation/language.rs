//! Display language for the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Languages the front-end is localized into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bahasa Indonesia.
    #[default]
    Id,
    /// English.
    En,
}

impl Language {
    /// Returns the ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Id => "id",
            Language::En => "en",
        }
    }

    /// English name of the language, as used inside AI prompts.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::Id => "Indonesian",
            Language::En => "English",
        }
    }

    /// Generic label shown for anonymous (guest) users.
    pub fn guest_label(&self) -> &'static str {
        match self {
            Language::Id => "Tamu",
            Language::En => "Guest",
        }
    }

    /// Role label attached to reviews submitted during the session.
    pub fn new_customer_role(&self) -> &'static str {
        match self {
            Language::Id => "Pelanggan Baru",
            Language::En => "Verified Customer",
        }
    }

    /// Returns the other language (the navbar toggle).
    pub fn toggled(&self) -> Self {
        match self {
            Language::Id => Language::En,
            Language::En => Language::Id,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Language::Id),
            "en" => Ok(Language::En),
            other => Err(ValidationError::invalid_format(
                "language",
                format!("expected 'id' or 'en', got '{}'", other),
            )),
        }
    }
}
