//! Customer reviews (testimonials).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Identity, Language, StarRating, ValidationError};

/// A published customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    /// Short descriptor under the name, e.g. "Villa Owner, Canggu".
    pub role: String,
    pub text: String,
    pub rating: StarRating,
}

/// Testimonials the page starts with before any are submitted.
static SEED_REVIEWS: Lazy<Vec<Review>> = Lazy::new(|| {
    vec![
        Review {
            name: "Sarah Jenkins".to_string(),
            role: "Villa Owner, Canggu".to_string(),
            text: "The pool technician came the same day and explained everything clearly. \
                   Finally a service in Bali I can rely on."
                .to_string(),
            rating: StarRating::default(),
        },
        Review {
            name: "Putu Arya".to_string(),
            role: "Homeowner, Denpasar".to_string(),
            text: "AC saya dingin lagi dalam satu jam. Teknisi ramah dan tepat waktu.".to_string(),
            rating: StarRating::default(),
        },
        Review {
            name: "Marco Rossi".to_string(),
            role: "Airbnb Host, Ubud".to_string(),
            text: "Used the villa description tool for my listing, then booked a deep clean. \
                   Both were great."
                .to_string(),
            rating: StarRating::new(4).unwrap_or_default(),
        },
    ]
});

/// Returns a fresh copy of the seed testimonials.
pub fn seed_reviews() -> Vec<Review> {
    SEED_REVIEWS.clone()
}

/// In-progress review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub name: String,
    pub text: String,
    pub rating: StarRating,
}

impl ReviewDraft {
    pub fn new(name: impl Into<String>, text: impl Into<String>, rating: StarRating) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            rating,
        }
    }

    /// Blank draft with the name pre-filled from the current identity.
    pub fn defaults_for(identity: Option<&Identity>, language: Language) -> Self {
        Self {
            name: identity.map(|i| i.form_name(language)).unwrap_or_default(),
            text: String::new(),
            rating: StarRating::default(),
        }
    }

    /// Checks that name and text are filled in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(())
    }

    /// Publishes the draft as a review with the session's role label.
    pub fn into_review(self, language: Language) -> Result<Review, ValidationError> {
        self.validate()?;
        Ok(Review {
            name: self.name,
            role: language.new_customer_role().to_string(),
            text: self.text,
            rating: self.rating,
        })
    }
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self::defaults_for(None, Language::default())
    }
}
