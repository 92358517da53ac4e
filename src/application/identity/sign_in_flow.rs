//! SignInFlow - login/logout handling for the presentation shell.
//!
//! Applies the identity error taxonomy so the shell never sees an error:
//! a misconfigured backend leaves the session unauthenticated, a restricted
//! origin falls back to anonymous sign-in, anything else is logged.

use std::sync::Arc;

use super::IdentityProviderAdapter;
use crate::domain::foundation::{AuthError, Identity};

/// What a login attempt ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Signed in with the primary provider.
    SignedIn(Identity),
    /// Primary sign-in was not allowed here; signed in as a guest instead.
    /// The shell shows the guest-mode notice.
    GuestFallback(Identity),
    /// The identity backend is not configured. Still signed out.
    Unavailable,
    /// Sign-in failed for another reason. Still signed out.
    Unauthenticated,
}

impl LoginOutcome {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            LoginOutcome::SignedIn(identity) | LoginOutcome::GuestFallback(identity) => {
                Some(identity)
            }
            LoginOutcome::Unavailable | LoginOutcome::Unauthenticated => None,
        }
    }
}

/// Handler behind the login and logout buttons.
pub struct SignInFlow {
    identity: Arc<IdentityProviderAdapter>,
}

impl SignInFlow {
    pub fn new(identity: Arc<IdentityProviderAdapter>) -> Self {
        Self { identity }
    }

    pub async fn login(&self) -> LoginOutcome {
        let error = match self.identity.sign_in_with_primary_provider().await {
            Ok(identity) => return LoginOutcome::SignedIn(identity),
            Err(error) => error,
        };

        match error {
            AuthError::Configuration(detail) => {
                tracing::warn!("Sign-in unavailable, identity backend not configured: {}", detail);
                LoginOutcome::Unavailable
            }
            error if error.should_fall_back_to_anonymous() => {
                tracing::warn!("Primary sign-in not allowed here ({}), continuing as guest", error);
                match self.identity.sign_in_anonymously().await {
                    Ok(identity) => LoginOutcome::GuestFallback(identity),
                    Err(e) => {
                        tracing::error!("Guest sign-in failed: {}", e);
                        LoginOutcome::Unauthenticated
                    }
                }
            }
            error => {
                tracing::error!("Sign-in failed: {}", error);
                LoginOutcome::Unauthenticated
            }
        }
    }

    /// Continues as a guest without trying the primary provider.
    pub async fn continue_as_guest(&self) -> Result<Identity, AuthError> {
        self.identity.sign_in_anonymously().await
    }

    /// Signs out. Subscribers (the session store among them) receive `None`.
    pub async fn logout(&self) {
        self.identity.sign_out().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityBackend;

    fn flow_with(backend: MockIdentityBackend) -> (SignInFlow, Arc<MockIdentityBackend>, Arc<IdentityProviderAdapter>) {
        let backend = Arc::new(backend);
        let adapter = Arc::new(IdentityProviderAdapter::with_backend(backend.clone()));
        (SignInFlow::new(adapter.clone()), backend, adapter)
    }

    #[tokio::test]
    async fn successful_login_is_signed_in() {
        let (flow, _, adapter) = flow_with(MockIdentityBackend::new());

        let outcome = flow.login().await;

        assert_eq!(outcome, LoginOutcome::SignedIn(MockIdentityBackend::test_user()));
        assert_eq!(adapter.current_identity(), Some(MockIdentityBackend::test_user()));
    }

    #[tokio::test]
    async fn configuration_error_is_unavailable_without_fallback() {
        let (flow, backend, adapter) = flow_with(
            MockIdentityBackend::new()
                .with_primary_result(Err(AuthError::configuration("CONFIGURATION_NOT_FOUND"))),
        );

        assert_eq!(flow.login().await, LoginOutcome::Unavailable);
        assert_eq!(backend.anonymous_calls(), 0);
        assert!(adapter.current_identity().is_none());
    }

    #[tokio::test]
    async fn domain_restricted_falls_back_to_guest() {
        let (flow, backend, _) = flow_with(
            MockIdentityBackend::new()
                .with_primary_result(Err(AuthError::domain_restricted("UNAUTHORIZED_DOMAIN"))),
        );

        let outcome = flow.login().await;

        assert!(matches!(outcome, LoginOutcome::GuestFallback(ref i) if i.is_anonymous));
        assert_eq!(backend.anonymous_calls(), 1);
    }

    #[tokio::test]
    async fn failed_guest_fallback_is_swallowed() {
        let (flow, _, adapter) = flow_with(
            MockIdentityBackend::new()
                .with_primary_result(Err(AuthError::domain_restricted("UNAUTHORIZED_DOMAIN")))
                .with_anonymous_result(Err(AuthError::backend_unavailable("offline"))),
        );

        assert_eq!(flow.login().await, LoginOutcome::Unauthenticated);
        assert!(adapter.current_identity().is_none());
    }

    #[tokio::test]
    async fn other_errors_are_unauthenticated() {
        let (flow, backend, _) = flow_with(
            MockIdentityBackend::new().with_primary_result(Err(AuthError::unknown("popup closed"))),
        );

        assert_eq!(flow.login().await, LoginOutcome::Unauthenticated);
        assert_eq!(backend.anonymous_calls(), 0);
    }

    #[tokio::test]
    async fn logout_clears_identity() {
        let (flow, backend, adapter) = flow_with(MockIdentityBackend::new());
        flow.login().await;

        flow.logout().await;

        assert!(adapter.current_identity().is_none());
        assert_eq!(backend.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn simulated_login_always_signs_in() {
        let flow = SignInFlow::new(Arc::new(IdentityProviderAdapter::simulated()));

        let outcome = flow.login().await;

        assert!(matches!(outcome, LoginOutcome::SignedIn(_)));
        assert!(outcome.identity().is_some());
    }
}
