//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identity, IDs, language, errors)
//! - `booking` - Service catalog, booking requests, and reviews
//! - `assistant` - AI tool prompts and gateway result texts

pub mod assistant;
pub mod booking;
pub mod foundation;
