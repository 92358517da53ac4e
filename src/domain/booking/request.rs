//! Booking request form values.

use serde::{Deserialize, Serialize};

use super::ServiceCategory;
use crate::domain::foundation::{BookingId, Identity, Language, Timestamp};

/// Values of the booking form.
///
/// Transient: held only for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Preferred visit date as entered (`YYYY-MM-DD` from the date picker).
    pub date: String,
    /// Free-text problem description. AI tools may pre-fill it.
    pub description: String,
    /// Category picked from the catalog, if the form was opened from one.
    pub service: Option<ServiceCategory>,
}

impl BookingRequest {
    /// Blank form with the name pre-filled from the current identity.
    pub fn defaults_for(identity: Option<&Identity>, language: Language) -> Self {
        Self {
            name: identity.map(|i| i.form_name(language)).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Sets the catalog category.
    pub fn with_service(mut self, service: ServiceCategory) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the problem description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Acknowledgement returned once a booking has been recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub id: BookingId,
    pub request: BookingRequest,
    pub submitted_at: Timestamp,
}

impl BookingConfirmation {
    pub fn new(request: BookingRequest) -> Self {
        Self {
            id: BookingId::new(),
            request,
            submitted_at: Timestamp::now(),
        }
    }
}
