//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `IdentityBackend` - Sign-in/sign-out against an identity service
//! - `ProviderCredentialSource` - Interactive provider flow (popup) output
//! - `TextGenerator` - Generative-text provider

mod identity_backend;
mod text_generator;

pub use identity_backend::{IdentityBackend, ProviderCredential, ProviderCredentialSource};
pub use text_generator::{
    AIError, FinishReason, GenerationResponse, ProviderInfo, TextGenerator,
};
