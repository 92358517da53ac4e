//! Booking handlers - the per-session booking and review store.

mod session_store;

pub use session_store::BookingSessionStore;
