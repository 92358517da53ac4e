//! Identity backend configuration (Firebase Authentication)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Identity backend configuration.
///
/// `firebase_config` carries the same JSON object a web page would inject
/// (`{"apiKey": "...", "authDomain": "...", "projectId": "..."}`). When it is
/// absent or unusable the session runs on simulated sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Raw Firebase web config JSON
    pub firebase_config: Option<String>,

    /// Identity Toolkit REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Origin reported to the backend on provider sign-in.
    /// Falls back to `https://<authDomain>` when unset.
    pub request_uri: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Parsed, usable Firebase settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseSettings {
    api_key: Secret<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl FirebaseSettings {
    /// Parses the injected config JSON.
    ///
    /// Usable only when it is a JSON object with a non-empty `apiKey`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| ValidationError::InvalidFirebaseConfig(e.to_string()))?;

        let object = value
            .as_object()
            .filter(|o| !o.is_empty())
            .ok_or_else(|| ValidationError::InvalidFirebaseConfig("expected a non-empty object".into()))?;

        let has_api_key = object
            .get("apiKey")
            .and_then(|k| k.as_str())
            .is_some_and(|k| !k.trim().is_empty());
        if !has_api_key {
            return Err(ValidationError::MissingRequired("apiKey"));
        }

        serde_json::from_value(value)
            .map_err(|e| ValidationError::InvalidFirebaseConfig(e.to_string()))
    }

    /// Exposes the API key (for making requests).
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl IdentityConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns usable Firebase settings, if any were supplied.
    pub fn firebase_settings(&self) -> Result<FirebaseSettings, ValidationError> {
        match self.firebase_config.as_deref() {
            Some(raw) if !raw.trim().is_empty() => FirebaseSettings::parse(raw),
            _ => Err(ValidationError::MissingRequired("FIREBASE_CONFIG")),
        }
    }

    /// Origin sent as `requestUri` on provider sign-in.
    pub fn request_uri(&self, settings: &FirebaseSettings) -> String {
        self.request_uri
            .clone()
            .or_else(|| settings.auth_domain.as_ref().map(|d| format!("https://{}", d)))
            .unwrap_or_else(|| "http://localhost".to_string())
    }

    /// Validate identity configuration
    ///
    /// A missing or unusable Firebase config is not an error here; it only
    /// selects simulated sign-in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("IDENTITY_BASE_URL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            firebase_config: None,
            base_url: default_base_url(),
            request_uri: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
