//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `auth` - Identity backends (Firebase, simulated, mock)
//! - `ai` - Generative-text providers (Gemini, mock)

pub mod ai;
pub mod auth;
