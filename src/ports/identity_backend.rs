//! Identity backend port - sign-in and sign-out against an identity service.
//!
//! This port is provider-agnostic. The Firebase adapter talks to the
//! Identity Toolkit REST API; the simulated store fabricates identities in
//! process. Neither keeps subscriber state: the `IdentityProviderAdapter`
//! owns the current identity and fans out changes.
//!
//! # Example Implementation
//!
//! ```ignore
//! pub struct KeycloakBackend { ... }
//!
//! #[async_trait]
//! impl IdentityBackend for KeycloakBackend {
//!     async fn sign_in_with_primary_provider(&self) -> Result<Identity, AuthError> {
//!         // 1. Obtain a provider credential
//!         // 2. Exchange it for a session
//!         // 3. Map the account to Identity
//!     }
//!     // ...
//! }
//! ```

use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::foundation::{AuthError, Identity};

/// Signs users in and out of an identity service.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::Configuration` when the service rejects the setup
/// - Return `AuthError::DomainRestricted` when the calling origin or the
///   sign-in method is not permitted
/// - Return `AuthError::BackendUnavailable` when the service is unreachable
/// - Return identities built with `Identity::anonymous` from anonymous
///   sign-in, so they never carry name or email
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Interactive sign-in with the primary (Google) provider.
    async fn sign_in_with_primary_provider(&self) -> Result<Identity, AuthError>;

    /// Creates an anonymous guest account.
    async fn sign_in_anonymously(&self) -> Result<Identity, AuthError>;

    /// Ends the backend session. Must succeed when nobody is signed in.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Credential yielded by an interactive provider flow (e.g. a Google popup).
#[derive(Debug, Clone)]
pub struct ProviderCredential {
    /// Provider identifier as the identity service knows it (`google.com`).
    pub provider_id: String,
    /// OAuth ID token issued by the provider.
    pub id_token: Secret<String>,
}

impl ProviderCredential {
    pub fn new(provider_id: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            id_token: Secret::new(id_token.into()),
        }
    }

    /// Google credential.
    pub fn google(id_token: impl Into<String>) -> Self {
        Self::new("google.com", id_token)
    }
}

/// Runs the interactive part of primary sign-in.
///
/// The browser popup lives outside this crate. Whatever hosts it supplies
/// the resulting credential through this port.
#[async_trait]
pub trait ProviderCredentialSource: Send + Sync {
    /// Obtains a credential from the user.
    ///
    /// Returns `AuthError::Unknown` when the user dismisses the flow.
    async fn obtain_credential(&self) -> Result<ProviderCredential, AuthError>;
}
