//! IdentityProviderAdapter - one interface for "who is signed in".
//!
//! The adapter picks its mode once at construction. With a usable Firebase
//! configuration it delegates to the Firebase backend; otherwise (or when the
//! backend cannot be built) it serves sign-in from the in-process simulated
//! store. In both modes it owns the current identity and the listener
//! registry, and fans out every transition synchronously.
//!
//! # Example
//!
//! ```ignore
//! let adapter = IdentityProviderAdapter::from_config(&config.identity, None);
//!
//! let subscription = adapter.subscribe(|identity| {
//!     println!("identity changed: {:?}", identity.map(|i| i.id.as_str()));
//! });
//!
//! adapter.sign_in_anonymously().await?;
//! subscription.unsubscribe();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::adapters::auth::{FirebaseIdentityBackend, NoInteractiveSignIn, SimulatedIdentityStore};
use crate::config::IdentityConfig;
use crate::domain::foundation::{AuthError, Identity};
use crate::ports::{IdentityBackend, ProviderCredentialSource};

/// Callback invoked with the current identity, `None` when signed out.
pub type IdentityListener = dyn Fn(Option<&Identity>) + Send + Sync;

/// Where sign-in requests go.
#[derive(Clone)]
pub enum IdentityMode {
    /// A real identity backend is configured.
    Configured(Arc<dyn IdentityBackend>),
    /// No usable configuration; sign-in is simulated in process.
    Simulated(SimulatedIdentityStore),
}

impl IdentityMode {
    /// Chooses the mode for a startup configuration.
    ///
    /// Configured only when the Firebase config is a JSON object with a
    /// non-empty `apiKey` and the backend can be built.
    pub fn select(
        config: &IdentityConfig,
        credentials: Option<Arc<dyn ProviderCredentialSource>>,
    ) -> Self {
        let settings = match config.firebase_settings() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::info!("Identity backend not configured ({}), using simulated sign-in", e);
                return IdentityMode::Simulated(SimulatedIdentityStore::new());
            }
        };

        let credentials = credentials.unwrap_or_else(|| Arc::new(NoInteractiveSignIn));
        match FirebaseIdentityBackend::new(config, settings, credentials) {
            Ok(backend) => IdentityMode::Configured(Arc::new(backend)),
            Err(e) => {
                tracing::error!("Identity backend initialization failed: {}", e);
                IdentityMode::Simulated(SimulatedIdentityStore::new())
            }
        }
    }

    /// Returns true when a real backend is in use.
    pub fn is_configured(&self) -> bool {
        matches!(self, IdentityMode::Configured(_))
    }

    /// Backend name for logs ("firebase", "simulated", ...).
    pub fn name(&self) -> &'static str {
        self.backend().name()
    }

    fn backend(&self) -> &dyn IdentityBackend {
        match self {
            IdentityMode::Configured(backend) => backend.as_ref(),
            IdentityMode::Simulated(store) => store as &dyn IdentityBackend,
        }
    }
}

impl std::fmt::Debug for IdentityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityMode::Configured(backend) => {
                f.debug_tuple("Configured").field(&backend.name()).finish()
            }
            IdentityMode::Simulated(_) => f.write_str("Simulated"),
        }
    }
}

#[derive(Clone)]
struct ListenerEntry {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Arc<IdentityListener>,
}

impl ListenerEntry {
    fn notify(&self, identity: Option<&Identity>) {
        if self.active.load(Ordering::SeqCst) {
            (self.callback)(identity);
        }
    }
}

#[derive(Default)]
struct AuthState {
    current: Option<Identity>,
    listeners: Vec<ListenerEntry>,
    next_listener_id: u64,
}

type SharedState = Arc<Mutex<AuthState>>;

fn lock(state: &Mutex<AuthState>) -> MutexGuard<'_, AuthState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`IdentityProviderAdapter::subscribe`].
///
/// Dropping the handle does not unsubscribe.
#[derive(Debug, Clone)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    state: Weak<Mutex<AuthState>>,
}

impl Subscription {
    /// Stops further notifications to the callback. Idempotent.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(state) = self.state.upgrade() {
            lock(&state).listeners.retain(|entry| entry.id != self.id);
        }
    }

    /// Returns true until `unsubscribe` is called.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Identity provider with subscriber fan-out.
pub struct IdentityProviderAdapter {
    mode: IdentityMode,
    state: SharedState,
}

impl IdentityProviderAdapter {
    /// Creates the adapter with an explicit mode.
    pub fn new(mode: IdentityMode) -> Self {
        tracing::info!(mode = ?mode, "Identity provider ready");
        Self {
            mode,
            state: Arc::new(Mutex::new(AuthState::default())),
        }
    }

    /// Creates the adapter from startup configuration.
    ///
    /// The configuration is read once; later changes to it have no effect.
    pub fn from_config(
        config: &IdentityConfig,
        credentials: Option<Arc<dyn ProviderCredentialSource>>,
    ) -> Self {
        Self::new(IdentityMode::select(config, credentials))
    }

    /// Creates an adapter that delegates to the given backend.
    pub fn with_backend(backend: Arc<dyn IdentityBackend>) -> Self {
        Self::new(IdentityMode::Configured(backend))
    }

    /// Creates an adapter running on simulated sign-in.
    pub fn simulated() -> Self {
        Self::new(IdentityMode::Simulated(SimulatedIdentityStore::new()))
    }

    pub fn mode(&self) -> &IdentityMode {
        &self.mode
    }

    /// The signed-in identity, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        lock(&self.state).current.clone()
    }

    /// Registers `callback` and immediately calls it with the current identity.
    ///
    /// The callback is then invoked after every sign-in and sign-out until
    /// the returned subscription is unsubscribed. Registering a listener
    /// never notifies the other listeners.
    ///
    /// The initial call runs after the registry lock is released, so a
    /// callback may itself subscribe or unsubscribe. Ordering between that
    /// initial call and a transition is only guaranteed when both happen on
    /// the same task; a sign-in racing on another worker thread can reach
    /// the new listener before its initial identity does.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let callback: Arc<IdentityListener> = Arc::new(callback);

        let (id, current) = {
            let mut state = lock(&self.state);
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.push(ListenerEntry {
                id,
                active: Arc::clone(&active),
                callback: Arc::clone(&callback),
            });
            (id, state.current.clone())
        };

        if active.load(Ordering::SeqCst) {
            callback(current.as_ref());
        }

        Subscription {
            id,
            active,
            state: Arc::downgrade(&self.state),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Interactive sign-in with the primary provider.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the backend rejects its configuration
    /// - `DomainRestricted` if this origin or sign-in method is not allowed
    /// - `BackendUnavailable` / `Unknown` for anything else
    pub async fn sign_in_with_primary_provider(&self) -> Result<Identity, AuthError> {
        tracing::debug!(backend = self.mode.name(), "Primary sign-in requested");
        let identity = self
            .mode
            .backend()
            .sign_in_with_primary_provider()
            .await
            .map_err(|e| {
                tracing::warn!(backend = self.mode.name(), "Primary sign-in failed: {}", e);
                e
            })?;

        self.transition(Some(identity.clone()));
        Ok(identity)
    }

    /// Signs in as an anonymous guest.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the backend cannot be reached.
    pub async fn sign_in_anonymously(&self) -> Result<Identity, AuthError> {
        tracing::debug!(backend = self.mode.name(), "Anonymous sign-in requested");
        let identity = self.mode.backend().sign_in_anonymously().await.map_err(|e| {
            tracing::warn!(backend = self.mode.name(), "Anonymous sign-in failed: {}", e);
            e
        })?;

        self.transition(Some(identity.clone()));
        Ok(identity)
    }

    /// Signs out. Never fails and may be called repeatedly.
    ///
    /// Listeners are notified with `None` only when someone was signed in.
    pub async fn sign_out(&self) {
        if let Err(e) = self.mode.backend().sign_out().await {
            tracing::warn!(backend = self.mode.name(), "Backend sign-out failed: {}", e);
        }

        let was_signed_in = lock(&self.state).current.is_some();
        if was_signed_in {
            self.transition(None);
        }
    }

    /// Replaces the current identity and notifies every active listener.
    ///
    /// The state lock is released before any callback runs, so callbacks
    /// may subscribe, unsubscribe or read the current identity.
    fn transition(&self, identity: Option<Identity>) {
        let listeners = {
            let mut state = lock(&self.state);
            state.current = identity.clone();
            state.listeners.clone()
        };

        tracing::info!(
            signed_in = identity.is_some(),
            anonymous = identity.as_ref().is_some_and(|i| i.is_anonymous),
            listeners = listeners.len(),
            "Identity changed"
        );

        for listener in &listeners {
            listener.notify(identity.as_ref());
        }
    }
}

impl std::fmt::Debug for IdentityProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityProviderAdapter")
            .field("mode", &self.mode)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityBackend;

    fn recorder() -> (Arc<Mutex<Vec<Option<Identity>>>>, impl Fn(Option<&Identity>) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |identity: Option<&Identity>| {
            sink.lock().unwrap().push(identity.cloned())
        })
    }

    fn config_with(raw: Option<&str>) -> IdentityConfig {
        IdentityConfig {
            firebase_config: raw.map(str::to_string),
            ..Default::default()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Mode Selection Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn missing_config_selects_simulated() {
        assert!(!IdentityMode::select(&config_with(None), None).is_configured());
    }

    #[test]
    fn config_without_api_key_selects_simulated() {
        let mode = IdentityMode::select(&config_with(Some(r#"{"authDomain":"x"}"#)), None);
        assert!(!mode.is_configured());
    }

    #[test]
    fn malformed_config_selects_simulated() {
        let mode = IdentityMode::select(&config_with(Some("not json")), None);
        assert_eq!(mode.name(), "simulated");
    }

    #[test]
    fn valid_config_selects_firebase() {
        let mode = IdentityMode::select(&config_with(Some(r#"{"apiKey":"AIza"}"#)), None);
        assert!(mode.is_configured());
        assert_eq!(mode.name(), "firebase");
    }

    #[test]
    fn later_config_changes_do_not_affect_mode() {
        let mut config = config_with(None);
        let adapter = IdentityProviderAdapter::from_config(&config, None);
        config.firebase_config = Some(r#"{"apiKey":"AIza"}"#.to_string());

        assert!(!adapter.mode().is_configured());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Subscription Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn subscribe_delivers_current_identity_immediately() {
        let adapter = IdentityProviderAdapter::simulated();
        let (seen, callback) = recorder();

        let _subscription = adapter.subscribe(callback);

        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn new_subscriber_does_not_renotify_others() {
        let adapter = IdentityProviderAdapter::simulated();
        let (first, callback) = recorder();
        let _a = adapter.subscribe(callback);
        adapter.sign_in_anonymously().await.unwrap();

        let (second, callback) = recorder();
        let _b = adapter.subscribe(callback);

        assert_eq!(first.lock().unwrap().len(), 2);
        let second = second.lock().unwrap();
        assert_eq!(second.len(), 1);
        assert!(second[0].as_ref().unwrap().is_anonymous);
    }

    #[tokio::test]
    async fn each_sign_in_notifies_once() {
        let adapter = IdentityProviderAdapter::simulated();
        let (seen, callback) = recorder();
        let _subscription = adapter.subscribe(callback);

        adapter.sign_in_with_primary_provider().await.unwrap();
        adapter.sign_in_anonymously().await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(!seen[1].as_ref().unwrap().is_anonymous);
        assert!(seen[2].as_ref().unwrap().is_anonymous);
    }

    #[tokio::test]
    async fn unsubscribe_stops_notifications() {
        let adapter = IdentityProviderAdapter::simulated();
        let (seen, callback) = recorder();
        let subscription = adapter.subscribe(callback);

        subscription.unsubscribe();
        subscription.unsubscribe();
        adapter.sign_in_anonymously().await.unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(!subscription.is_active());
        assert_eq!(adapter.listener_count(), 0);
    }

    #[tokio::test]
    async fn listener_may_unsubscribe_itself_during_fan_out() {
        let adapter = IdentityProviderAdapter::simulated();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0));

        let slot_in_cb = Arc::clone(&slot);
        let calls_in_cb = Arc::clone(&calls);
        let subscription = adapter.subscribe(move |_| {
            *calls_in_cb.lock().unwrap() += 1;
            if let Some(subscription) = slot_in_cb.lock().unwrap().as_ref() {
                subscription.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(subscription);

        adapter.sign_in_anonymously().await.unwrap();
        adapter.sign_in_anonymously().await.unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn listener_subscribed_during_fan_out_sees_new_identity_once() {
        let adapter = Arc::new(IdentityProviderAdapter::simulated());
        let (seen, callback) = recorder();
        let late = Arc::new(Mutex::new(Some(callback)));
        let nested: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

        let adapter_in_cb = Arc::downgrade(&adapter);
        let late_in_cb = Arc::clone(&late);
        let nested_in_cb = Arc::clone(&nested);
        let _outer = adapter.subscribe(move |identity| {
            if identity.is_none() {
                return;
            }
            let Some(adapter) = adapter_in_cb.upgrade() else {
                return;
            };
            let pending = late_in_cb.lock().unwrap().take();
            if let Some(callback) = pending {
                nested_in_cb.lock().unwrap().push(adapter.subscribe(callback));
            }
        });

        let guest = adapter.sign_in_anonymously().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![Some(guest)]);
        assert_eq!(nested.lock().unwrap().len(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Sign-in / Sign-out Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn sign_out_clears_identity_and_notifies() {
        let adapter = IdentityProviderAdapter::simulated();
        adapter.sign_in_with_primary_provider().await.unwrap();
        let (seen, callback) = recorder();
        let _subscription = adapter.subscribe(callback);

        adapter.sign_out().await;
        adapter.sign_out().await;

        assert!(adapter.current_identity().is_none());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].is_none());
    }

    #[tokio::test]
    async fn backend_errors_leave_identity_unchanged() {
        let backend = Arc::new(
            MockIdentityBackend::new()
                .with_primary_result(Err(AuthError::configuration("CONFIGURATION_NOT_FOUND"))),
        );
        let adapter = IdentityProviderAdapter::with_backend(backend.clone());
        let (seen, callback) = recorder();
        let _subscription = adapter.subscribe(callback);

        let result = adapter.sign_in_with_primary_provider().await;

        assert!(matches!(result, Err(AuthError::Configuration(_))));
        assert!(adapter.current_identity().is_none());
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(backend.primary_calls(), 1);
    }

    #[tokio::test]
    async fn sign_out_succeeds_even_when_backend_fails() {
        let backend = Arc::new(
            MockIdentityBackend::new().with_sign_out_error(AuthError::backend_unavailable("down")),
        );
        let adapter = IdentityProviderAdapter::with_backend(backend.clone());
        adapter.sign_in_anonymously().await.unwrap();

        adapter.sign_out().await;

        assert!(adapter.current_identity().is_none());
        assert_eq!(backend.sign_out_calls(), 1);
    }
}
