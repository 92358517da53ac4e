//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the BaleCare domain.

mod auth;
mod errors;
mod ids;
mod language;
mod rating;
mod timestamp;

pub use auth::{AuthError, Identity};
pub use errors::ValidationError;
pub use ids::{BookingId, UserId};
pub use language::Language;
pub use rating::StarRating;
pub use timestamp::Timestamp;
