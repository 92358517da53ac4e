//! Simulated identity backend.
//!
//! Lets the site work in preview environments that have no identity
//! backend configured. Sign-in always succeeds with a fabricated identity
//! and no network calls are made.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Identity, Timestamp, UserId};
use crate::ports::IdentityBackend;

/// Display name of the simulated primary-provider user.
pub const DEMO_USER_NAME: &str = "Demo User";

/// Email of the simulated primary-provider user.
pub const DEMO_USER_EMAIL: &str = "demo@example.com";

/// In-process identity backend used when no real backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedIdentityStore;

impl SimulatedIdentityStore {
    pub fn new() -> Self {
        Self
    }

    fn fabricate_id(prefix: &str) -> Result<UserId, AuthError> {
        UserId::new(format!("{}-{}", prefix, Timestamp::now().as_millis()))
            .map_err(|e| AuthError::unknown(e.to_string()))
    }
}

#[async_trait]
impl IdentityBackend for SimulatedIdentityStore {
    async fn sign_in_with_primary_provider(&self) -> Result<Identity, AuthError> {
        tracing::warn!("Identity backend not configured, using simulated sign-in");
        Ok(Identity::signed_in(
            Self::fabricate_id("user")?,
            Some(DEMO_USER_NAME.to_string()),
            Some(DEMO_USER_EMAIL.to_string()),
            None,
        ))
    }

    async fn sign_in_anonymously(&self) -> Result<Identity, AuthError> {
        tracing::warn!("Identity backend not configured, using simulated guest sign-in");
        Ok(Identity::anonymous(Self::fabricate_id("guest")?))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
