//! BookingSessionStore - transient booking form and review list.
//!
//! Lives for one session and is never persisted. Names on both forms are
//! pre-filled from the current identity, which the store learns about by
//! subscribing to the [`IdentityProviderAdapter`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::sleep;

use crate::application::identity::{IdentityProviderAdapter, Subscription};
use crate::config::SessionConfig;
use crate::domain::booking::{
    seed_reviews, BookingConfirmation, BookingRequest, Review, ReviewDraft, ServiceCategory,
};
use crate::domain::foundation::{Identity, Language, ValidationError};

struct SessionState {
    identity: Option<Identity>,
    language: Language,
    booking_form: BookingRequest,
    review_draft: ReviewDraft,
    /// Most recent first.
    reviews: Vec<Review>,
}

impl SessionState {
    fn reset_booking_form(&mut self) {
        self.booking_form = BookingRequest::defaults_for(self.identity.as_ref(), self.language);
    }

    fn reset_review_draft(&mut self) {
        self.review_draft = ReviewDraft::defaults_for(self.identity.as_ref(), self.language);
    }

    fn prefill_names(&mut self) {
        let name = self
            .identity
            .as_ref()
            .map(|i| i.prefill_name(self.language))
            .unwrap_or_default();
        self.booking_form.name = name.clone();
        self.review_draft.name = name;
    }
}

/// Per-session booking and review state.
pub struct BookingSessionStore {
    state: Mutex<SessionState>,
    booking_latency: Duration,
}

impl BookingSessionStore {
    pub fn new(booking_latency: Duration, language: Language) -> Self {
        Self {
            state: Mutex::new(SessionState {
                identity: None,
                language,
                booking_form: BookingRequest::default(),
                review_draft: ReviewDraft::default(),
                reviews: seed_reviews(),
            }),
            booking_latency,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.booking_latency(), config.language)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribes the store to identity changes.
    ///
    /// The current identity is applied immediately.
    pub fn attach(self: &Arc<Self>, identity: &IdentityProviderAdapter) -> Subscription {
        let store = Arc::clone(self);
        identity.subscribe(move |current| store.apply_identity(current))
    }

    /// Pre-fills both forms from `identity`, or clears the names on sign-out.
    pub fn apply_identity(&self, identity: Option<&Identity>) {
        let mut state = self.lock();
        state.identity = identity.cloned();
        state.prefill_names();
    }

    /// Records a booking request.
    ///
    /// Waits the configured latency, then resets the form to its
    /// identity-derived defaults.
    pub async fn record_booking(&self, request: BookingRequest) -> BookingConfirmation {
        tracing::info!(
            service = request.service.map(|s| s.id()),
            date = %request.date,
            "Recording booking request"
        );

        {
            let mut state = self.lock();
            state.booking_form = request.clone();
        }

        if !self.booking_latency.is_zero() {
            sleep(self.booking_latency).await;
        }

        let confirmation = BookingConfirmation::new(request);
        self.lock().reset_booking_form();

        tracing::info!(booking_id = %confirmation.id, "Booking recorded");
        confirmation
    }

    /// Publishes a review at the top of the list.
    ///
    /// A draft with an empty name or text is kept in the form and the list
    /// is left unchanged.
    pub fn add_review(&self, draft: ReviewDraft) -> Result<(), ValidationError> {
        let mut state = self.lock();
        let language = state.language;

        match draft.clone().into_review(language) {
            Ok(review) => {
                state.reviews.insert(0, review);
                state.reset_review_draft();
                tracing::info!(reviews = state.reviews.len(), "Review added");
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Review rejected: {}", e);
                state.review_draft = draft;
                Err(e)
            }
        }
    }

    /// Replaces the booking description (AI tool hand-off).
    pub fn set_booking_description(&self, description: impl Into<String>) {
        self.lock().booking_form.description = description.into();
    }

    /// Opens the booking form for a catalog category.
    pub fn select_service(&self, service: ServiceCategory) {
        self.lock().booking_form.service = Some(service);
    }

    /// Changes the display language.
    ///
    /// Both form names are pre-filled again for the current identity, so a
    /// guest label follows the new language.
    pub fn set_language(&self, language: Language) {
        let mut state = self.lock();
        state.language = language;
        state.prefill_names();
    }

    pub fn language(&self) -> Language {
        self.lock().language
    }

    pub fn booking_form(&self) -> BookingRequest {
        self.lock().booking_form.clone()
    }

    pub fn review_draft(&self) -> ReviewDraft {
        self.lock().review_draft.clone()
    }

    /// Reviews, most recent first.
    pub fn reviews(&self) -> Vec<Review> {
        self.lock().reviews.clone()
    }

    pub fn review_count(&self) -> usize {
        self.lock().reviews.len()
    }

    pub fn booking_latency(&self) -> Duration {
        self.booking_latency
    }
}

impl std::fmt::Debug for BookingSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSessionStore")
            .field("booking_latency", &self.booking_latency)
            .field("reviews", &self.review_count())
            .finish_non_exhaustive()
    }
}
