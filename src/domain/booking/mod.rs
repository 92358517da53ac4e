//! Booking module - catalog, booking requests, and customer reviews.

mod catalog;
mod request;
mod review;

pub use catalog::ServiceCategory;
pub use request::{BookingConfirmation, BookingRequest};
pub use review::{seed_reviews, Review, ReviewDraft};
