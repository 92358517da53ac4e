//! Identity types for the domain layer.
//!
//! `Identity` is the signed-in (or anonymous) user of the current session.
//! It has **no backend dependencies**: the Firebase adapter and the
//! in-process simulated store both populate it through the
//! `IdentityBackend` port.
//!
//! # Invariant
//!
//! Anonymous identities never carry an email or a display name. Whatever
//! renders them uses the localized guest label instead, see
//! [`Identity::display_label`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Language, UserId};

/// The current user of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user identifier from the identity backend.
    pub id: UserId,

    /// Display name, if the provider supplied one.
    pub display_name: Option<String>,

    /// Email address, if the provider supplied one.
    pub email: Option<String>,

    /// Avatar image URL.
    pub avatar_url: Option<String>,

    /// Whether this is an anonymous (guest) identity.
    pub is_anonymous: bool,
}

impl Identity {
    /// Creates an identity for a user who signed in with a real provider.
    pub fn signed_in(
        id: UserId,
        display_name: Option<String>,
        email: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.filter(|n| !n.trim().is_empty()),
            email: email.filter(|e| !e.trim().is_empty()),
            avatar_url,
            is_anonymous: false,
        }
    }

    /// Creates an anonymous identity. Name and email are always absent.
    pub fn anonymous(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            email: None,
            avatar_url: None,
            is_anonymous: true,
        }
    }

    /// Label to show for this user.
    ///
    /// Anonymous users always get the guest label; named users their
    /// display name, then their email.
    pub fn display_label(&self, language: Language) -> String {
        if self.is_anonymous {
            return language.guest_label().to_string();
        }
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(language.guest_label())
            .to_string()
    }

    /// Name a form is reset to after a submission.
    ///
    /// Display name when present, the guest label for anonymous users,
    /// otherwise empty.
    pub fn form_name(&self, language: Language) -> String {
        match (&self.display_name, self.is_anonymous) {
            (Some(name), false) => name.clone(),
            (_, true) => language.guest_label().to_string(),
            (None, false) => String::new(),
        }
    }

    /// Name written into both forms when this identity signs in.
    ///
    /// Unlike [`Identity::form_name`], an account without a display name
    /// still gets the guest label.
    pub fn prefill_name(&self, language: Language) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| language.guest_label().to_string())
    }
}

/// Identity backend errors.
///
/// None of these are fatal. Callers degrade to an unauthenticated or
/// anonymous session depending on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Backend has no valid configuration. Continue unauthenticated.
    #[error("identity backend is not configured: {0}")]
    Configuration(String),

    /// Backend rejects the calling origin. Fall back to anonymous sign-in.
    #[error("sign-in is not allowed from this origin: {0}")]
    DomainRestricted(String),

    /// Backend could not be reached.
    #[error("identity backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Any other error reported by the backend.
    #[error("identity backend error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a domain restricted error.
    pub fn domain_restricted(message: impl Into<String>) -> Self {
        Self::DomainRestricted(message.into())
    }

    /// Creates a backend unavailable error.
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable(message.into())
    }

    /// Creates an unknown backend error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// Returns true if the caller should retry as an anonymous guest.
    pub fn should_fall_back_to_anonymous(&self) -> bool {
        matches!(self, AuthError::DomainRestricted(_))
    }
}
