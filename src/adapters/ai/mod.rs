//! Generative-text adapters.
//!
//! Implementations of the `TextGenerator` port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models via the Generative Language API
//! - `MockTextGenerator` - Configurable mock for testing

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockTextGenerator, DEFAULT_MOCK_RESPONSE};
