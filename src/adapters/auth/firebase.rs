//! Firebase Authentication adapter.
//!
//! This adapter implements the `IdentityBackend` port against the Firebase
//! Identity Toolkit REST API:
//!
//! 1. Anonymous sign-in creates a guest account via `accounts:signUp`
//! 2. Primary sign-in exchanges a Google ID token via `accounts:signInWithIdp`
//! 3. Sign-out drops the locally held session tokens (Firebase has no
//!    server-side sign-out for client sessions)
//!
//! # Error Mapping
//!
//! Identity Toolkit reports failures as `{"error": {"message": "CODE : detail"}}`.
//! - `CONFIGURATION_NOT_FOUND`, `INVALID_API_KEY`, "API key not valid" -> `Configuration`
//! - `UNAUTHORIZED_DOMAIN`, `OPERATION_NOT_ALLOWED`, `ADMIN_ONLY_OPERATION` -> `DomainRestricted`
//! - 5xx and transport failures -> `BackendUnavailable`
//! - anything else -> `Unknown`
//!
//! # Example
//!
//! ```ignore
//! let settings = config.identity.firebase_settings()?;
//! let backend = FirebaseIdentityBackend::new(&config.identity, settings, credentials)?;
//! let identity = backend.sign_in_anonymously().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::{FirebaseSettings, IdentityConfig};
use crate::domain::foundation::{AuthError, Identity, UserId};
use crate::ports::{IdentityBackend, ProviderCredential, ProviderCredentialSource};

/// Session of the currently signed-in Firebase account.
struct FirebaseSession {
    id_token: Secret<String>,
    local_id: String,
}

/// Firebase Identity Toolkit backend.
pub struct FirebaseIdentityBackend {
    settings: FirebaseSettings,
    base_url: String,
    request_uri: String,
    timeout: Duration,
    http_client: Client,
    credentials: Arc<dyn ProviderCredentialSource>,
    session: RwLock<Option<FirebaseSession>>,
}

impl FirebaseIdentityBackend {
    /// Creates the backend.
    ///
    /// Fails with `AuthError::Configuration` when the HTTP client cannot be
    /// built; callers then run on simulated sign-in.
    pub fn new(
        config: &IdentityConfig,
        settings: FirebaseSettings,
        credentials: Arc<dyn ProviderCredentialSource>,
    ) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            request_uri: config.request_uri(&settings),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            settings,
            http_client,
            credentials,
            session: RwLock::new(None),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}", self.base_url, method)
    }

    /// Posts to an Identity Toolkit method and decodes the account response.
    async fn post<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<AccountResponse, AuthError> {
        tracing::debug!("Calling Identity Toolkit accounts:{}", method);

        let response = self
            .http_client
            .post(self.endpoint(method))
            .query(&[("key", self.settings.api_key())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!("Identity Toolkit timed out after {:?}", self.timeout);
                    AuthError::backend_unavailable(format!("timed out after {}s", self.timeout.as_secs()))
                } else {
                    tracing::error!("Identity Toolkit request failed: {}", e);
                    AuthError::backend_unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_error(status, &body);
            tracing::warn!("Identity Toolkit accounts:{} returned {}: {}", method, status, error);
            return Err(error);
        }

        response.json::<AccountResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse Identity Toolkit response: {}", e);
            AuthError::unknown(format!("Failed to parse response: {}", e))
        })
    }

    async fn store_session(&self, account: &AccountResponse) {
        let session = account.id_token.as_ref().map(|id_token| FirebaseSession {
            id_token: Secret::new(id_token.clone()),
            local_id: account.local_id.clone(),
        });
        *self.session.write().await = session;
    }

    /// Firebase account ID of the signed-in user, if any.
    pub async fn signed_in_account(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.local_id.clone())
    }

    /// ID token for authorizing calls to Firebase-protected services.
    pub async fn current_id_token(&self) -> Option<Secret<String>> {
        self.session.read().await.as_ref().map(|s| s.id_token.clone())
    }
}

#[async_trait]
impl IdentityBackend for FirebaseIdentityBackend {
    async fn sign_in_with_primary_provider(&self) -> Result<Identity, AuthError> {
        let credential = self.credentials.obtain_credential().await?;
        let body = SignInWithIdpRequest::new(&credential, &self.request_uri);

        let account = self.post("signInWithIdp", &body).await?;
        self.store_session(&account).await;
        account.into_identity(false)
    }

    async fn sign_in_anonymously(&self) -> Result<Identity, AuthError> {
        let account = self.post("signUp", &SignUpRequest { return_secure_token: true }).await?;
        self.store_session(&account).await;
        account.into_identity(true)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().await = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "firebase"
    }
}

impl std::fmt::Debug for FirebaseIdentityBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseIdentityBackend")
            .field("base_url", &self.base_url)
            .field("project_id", &self.settings.project_id)
            .finish_non_exhaustive()
    }
}

/// Maps an Identity Toolkit error response onto the domain taxonomy.
fn classify_error(status: StatusCode, body: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let code = message
        .split(|c: char| c == ' ' || c == ':')
        .next()
        .unwrap_or_default()
        .to_string();

    match code.as_str() {
        "CONFIGURATION_NOT_FOUND" | "INVALID_API_KEY" | "API_KEY_INVALID" | "PROJECT_NOT_FOUND" => {
            AuthError::configuration(message)
        }
        _ if message.contains("API key not valid") => AuthError::configuration(message),
        "UNAUTHORIZED_DOMAIN" | "OPERATION_NOT_ALLOWED" | "ADMIN_ONLY_OPERATION" => {
            AuthError::domain_restricted(message)
        }
        _ if status.is_server_error() => AuthError::backend_unavailable(format!("{}: {}", status, message)),
        _ => AuthError::unknown(message),
    }
}

/// Refuses interactive sign-in.
///
/// Used where no browser popup can be shown. Reported as a restricted
/// operation so callers fall back to anonymous sign-in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInteractiveSignIn;

#[async_trait]
impl ProviderCredentialSource for NoInteractiveSignIn {
    async fn obtain_credential(&self) -> Result<ProviderCredential, AuthError> {
        Err(AuthError::domain_restricted(
            "OPERATION_NOT_ALLOWED : interactive sign-in is not available in this context",
        ))
    }
}

/// Hands out a credential obtained elsewhere (e.g. passed on the command line).
#[derive(Debug, Clone)]
pub struct StaticCredentialSource {
    credential: ProviderCredential,
}

impl StaticCredentialSource {
    pub fn new(credential: ProviderCredential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProviderCredentialSource for StaticCredentialSource {
    async fn obtain_credential(&self) -> Result<ProviderCredential, AuthError> {
        Ok(self.credential.clone())
    }
}

// ----- Identity Toolkit API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpRequest {
    post_body: String,
    request_uri: String,
    return_idp_credential: bool,
    return_secure_token: bool,
}

impl SignInWithIdpRequest {
    fn new(credential: &ProviderCredential, request_uri: &str) -> Self {
        Self {
            post_body: format!(
                "id_token={}&providerId={}",
                credential.id_token.expose_secret(),
                credential.provider_id
            ),
            request_uri: request_uri.to_string(),
            return_idp_credential: true,
            return_secure_token: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

impl AccountResponse {
    fn into_identity(self, anonymous: bool) -> Result<Identity, AuthError> {
        let id = UserId::new(self.local_id).map_err(|_| {
            tracing::warn!("Identity Toolkit returned an empty localId");
            AuthError::unknown("response is missing localId")
        })?;

        if anonymous {
            return Ok(Identity::anonymous(id));
        }
        Ok(Identity::signed_in(id, self.display_name, self.email, self.photo_url))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_body(message: &str) -> String {
        format!(r#"{{"error":{{"code":400,"message":"{}","errors":[]}}}}"#, message)
    }

    fn backend(raw_config: &str) -> FirebaseIdentityBackend {
        let config = IdentityConfig {
            firebase_config: Some(raw_config.to_string()),
            ..Default::default()
        };
        let settings = config.firebase_settings().unwrap();
        FirebaseIdentityBackend::new(&config, settings, Arc::new(NoInteractiveSignIn)).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Classification Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn configuration_not_found_is_configuration_error() {
        let err = classify_error(StatusCode::BAD_REQUEST, &error_body("CONFIGURATION_NOT_FOUND"));
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn invalid_api_key_is_configuration_error() {
        let err = classify_error(
            StatusCode::BAD_REQUEST,
            &error_body("API key not valid. Please pass a valid API key."),
        );
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn operation_not_allowed_with_detail_is_domain_restricted() {
        let err = classify_error(
            StatusCode::BAD_REQUEST,
            &error_body("OPERATION_NOT_ALLOWED : Anonymous user sign-in is disabled"),
        );
        assert!(matches!(err, AuthError::DomainRestricted(_)));
    }

    #[test]
    fn unauthorized_domain_is_domain_restricted() {
        let err = classify_error(StatusCode::BAD_REQUEST, &error_body("UNAUTHORIZED_DOMAIN"));
        assert!(err.should_fall_back_to_anonymous());
    }

    #[test]
    fn server_error_is_backend_unavailable() {
        let err = classify_error(StatusCode::SERVICE_UNAVAILABLE, "upstream connect error");
        assert!(matches!(err, AuthError::BackendUnavailable(_)));
    }

    #[test]
    fn other_errors_are_unknown() {
        let err = classify_error(StatusCode::BAD_REQUEST, &error_body("USER_DISABLED"));
        assert_eq!(err, AuthError::unknown("USER_DISABLED"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Response Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn idp_response_maps_to_named_identity() {
        let json = r#"{
            "localId": "abc123",
            "email": "wayan@example.com",
            "displayName": "Wayan",
            "photoUrl": "https://lh3.googleusercontent.com/a/photo",
            "idToken": "id",
            "refreshToken": "refresh"
        }"#;
        let account: AccountResponse = serde_json::from_str(json).unwrap();
        let identity = account.into_identity(false).unwrap();

        assert_eq!(identity.id.as_str(), "abc123");
        assert_eq!(identity.display_name.as_deref(), Some("Wayan"));
        assert_eq!(identity.email.as_deref(), Some("wayan@example.com"));
        assert!(identity.avatar_url.is_some());
        assert!(!identity.is_anonymous);
    }

    #[test]
    fn anonymous_response_never_carries_email() {
        let json = r#"{"localId": "anon1", "email": "", "idToken": "id", "refreshToken": "r"}"#;
        let account: AccountResponse = serde_json::from_str(json).unwrap();
        let identity = account.into_identity(true).unwrap();

        assert!(identity.is_anonymous);
        assert!(identity.email.is_none());
        assert!(identity.display_name.is_none());
    }

    #[test]
    fn empty_local_id_is_rejected() {
        let account: AccountResponse = serde_json::from_str(r#"{"localId": ""}"#).unwrap();
        assert!(account.into_identity(false).is_err());
    }

    #[test]
    fn idp_request_serializes_post_body() {
        let request = SignInWithIdpRequest::new(
            &ProviderCredential::google("tok"),
            "https://balecare.firebaseapp.com",
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["postBody"], "id_token=tok&providerId=google.com");
        assert_eq!(json["requestUri"], "https://balecare.firebaseapp.com");
        assert_eq!(json["returnSecureToken"], true);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Backend Behaviour Tests (no network)
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn endpoint_joins_base_url_and_method() {
        let backend = backend(r#"{"apiKey":"k"}"#);
        assert_eq!(
            backend.endpoint("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp"
        );
    }

    #[tokio::test]
    async fn primary_sign_in_without_popup_is_domain_restricted() {
        let backend = backend(r#"{"apiKey":"k"}"#);

        let result = backend.sign_in_with_primary_provider().await;

        assert!(matches!(result, Err(AuthError::DomainRestricted(_))));
    }

    #[tokio::test]
    async fn sign_out_without_session_succeeds() {
        let backend = backend(r#"{"apiKey":"k"}"#);

        assert!(backend.sign_out().await.is_ok());
        assert!(backend.signed_in_account().await.is_none());
        assert!(backend.current_id_token().await.is_none());
    }

    #[tokio::test]
    async fn static_credential_source_returns_credential() {
        let source = StaticCredentialSource::new(ProviderCredential::google("tok"));
        let credential = source.obtain_credential().await.unwrap();
        assert_eq!(credential.provider_id, "google.com");
    }
}
