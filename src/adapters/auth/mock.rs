//! Mock identity backend for testing.
//!
//! Implements the `IdentityBackend` port without any external service.
//! Results can be queued per operation or forced to fail, and every call is
//! counted so tests can assert which paths the adapter took.
//!
//! # Example
//!
//! ```ignore
//! use balecare::adapters::auth::MockIdentityBackend;
//! use balecare::domain::foundation::AuthError;
//!
//! // Primary sign-in is blocked, anonymous sign-in works
//! let backend = MockIdentityBackend::new()
//!     .with_primary_result(Err(AuthError::domain_restricted("UNAUTHORIZED_DOMAIN")));
//!
//! let result = backend.sign_in_with_primary_provider().await;
//! assert!(result.is_err());
//! assert_eq!(backend.primary_calls(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Identity, UserId};
use crate::ports::IdentityBackend;

/// Mock identity backend.
///
/// With nothing queued, primary sign-in returns [`MockIdentityBackend::test_user`]
/// and anonymous sign-in returns a fresh guest with a counter-based ID.
#[derive(Debug, Default)]
pub struct MockIdentityBackend {
    /// Queued results for primary sign-in, consumed in order
    primary_results: Mutex<VecDeque<Result<Identity, AuthError>>>,
    /// Queued results for anonymous sign-in, consumed in order
    anonymous_results: Mutex<VecDeque<Result<Identity, AuthError>>>,
    /// Optional error returned by every sign-out
    sign_out_error: Mutex<Option<AuthError>>,
    primary_calls: AtomicUsize,
    anonymous_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockIdentityBackend {
    /// Creates a new mock with default results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity returned by primary sign-in when nothing is queued.
    pub fn test_user() -> Identity {
        Identity::signed_in(
            UserId::new("mock-user").unwrap(),
            Some("Test User".to_string()),
            Some("test@example.com".to_string()),
            None,
        )
    }

    /// Queues a result for the next primary sign-in.
    pub fn with_primary_result(self, result: Result<Identity, AuthError>) -> Self {
        lock(&self.primary_results).push_back(result);
        self
    }

    /// Queues a result for the next anonymous sign-in.
    pub fn with_anonymous_result(self, result: Result<Identity, AuthError>) -> Self {
        lock(&self.anonymous_results).push_back(result);
        self
    }

    /// Forces every sign-out to fail with the given error.
    pub fn with_sign_out_error(self, error: AuthError) -> Self {
        *lock(&self.sign_out_error) = Some(error);
        self
    }

    /// Queues a primary sign-in result at runtime.
    pub fn push_primary_result(&self, result: Result<Identity, AuthError>) {
        lock(&self.primary_results).push_back(result);
    }

    /// Number of primary sign-in calls.
    pub fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    /// Number of anonymous sign-in calls.
    pub fn anonymous_calls(&self) -> usize {
        self.anonymous_calls.load(Ordering::SeqCst)
    }

    /// Number of sign-out calls.
    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityBackend for MockIdentityBackend {
    async fn sign_in_with_primary_provider(&self) -> Result<Identity, AuthError> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.primary_results)
            .pop_front()
            .unwrap_or_else(|| Ok(Self::test_user()))
    }

    async fn sign_in_anonymously(&self) -> Result<Identity, AuthError> {
        let call = self.anonymous_calls.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.anonymous_results).pop_front().unwrap_or_else(|| {
            UserId::new(format!("mock-guest-{}", call))
                .map(Identity::anonymous)
                .map_err(|e| AuthError::unknown(e.to_string()))
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.sign_out_error).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_primary_sign_in_returns_test_user() {
        let backend = MockIdentityBackend::new();

        let identity = backend.sign_in_with_primary_provider().await.unwrap();

        assert_eq!(identity, MockIdentityBackend::test_user());
        assert_eq!(backend.primary_calls(), 1);
    }

    #[tokio::test]
    async fn queued_results_are_consumed_in_order() {
        let backend = MockIdentityBackend::new()
            .with_primary_result(Err(AuthError::configuration("CONFIGURATION_NOT_FOUND")))
            .with_primary_result(Ok(MockIdentityBackend::test_user()));

        assert!(backend.sign_in_with_primary_provider().await.is_err());
        assert!(backend.sign_in_with_primary_provider().await.is_ok());
        assert_eq!(backend.primary_calls(), 2);
    }

    #[tokio::test]
    async fn anonymous_sign_in_returns_distinct_guests() {
        let backend = MockIdentityBackend::new();

        let first = backend.sign_in_anonymously().await.unwrap();
        let second = backend.sign_in_anonymously().await.unwrap();

        assert!(first.is_anonymous);
        assert_ne!(first.id, second.id);
        assert_eq!(backend.anonymous_calls(), 2);
    }

    #[tokio::test]
    async fn forced_sign_out_error_is_returned() {
        let backend =
            MockIdentityBackend::new().with_sign_out_error(AuthError::backend_unavailable("down"));

        assert!(backend.sign_out().await.is_err());
        assert_eq!(backend.sign_out_calls(), 1);
    }
}
