//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BALECARE` prefix and nested values use double underscores as separators.
//!
//! Every section has defaults, so an empty environment yields a working
//! configuration: simulated sign-in and a gateway that apologizes on every call.
//!
//! # Example
//!
//! ```no_run
//! use balecare::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod identity;
mod session;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use identity::{FirebaseSettings, IdentityConfig};
pub use session::{LoggingConfig, SessionConfig};

use serde::Deserialize;

/// Variable the generative-text API key is read from when
/// `BALECARE__AI__API_KEY` is not set.
pub const FALLBACK_API_KEY_VAR: &str = "API_KEY";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Identity backend configuration (Firebase)
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Generative-text provider configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Booking/review session behaviour
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BALECARE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `API_KEY` for the generative-text key
    ///
    /// # Environment Variable Format
    ///
    /// - `BALECARE__IDENTITY__FIREBASE_CONFIG={"apiKey":"..."}` -> `identity.firebase_config`
    /// - `BALECARE__SESSION__LANGUAGE=en` -> `session.language = en`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("BALECARE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_api_key() {
            config.ai.api_key = std::env::var(FALLBACK_API_KEY_VAR)
                .ok()
                .filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.identity.validate()?;
        self.ai.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
