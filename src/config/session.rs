//! Session behaviour and logging configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::Language;

/// Per-session behaviour of the booking/review store
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Simulated network latency before a booking is confirmed
    #[serde(default = "default_booking_latency")]
    pub booking_latency_ms: u64,

    /// Initial display language
    #[serde(default)]
    pub language: Language,
}

impl SessionConfig {
    /// Get booking latency as Duration
    pub fn booking_latency(&self) -> Duration {
        Duration::from_millis(self.booking_latency_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            booking_latency_ms: default_booking_latency(),
            language: Language::default(),
        }
    }
}

fn default_booking_latency() -> u64 {
    1000
}

/// Log output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filter.trim().is_empty() {
            return Err(ValidationError::InvalidLogFilter("empty filter".to_string()));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "balecare=info".to_string()
}
