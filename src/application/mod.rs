//! Application layer - handlers that coordinate domain types and ports.
//!
//! - `identity` - identity provider adapter and login/logout flow
//! - `assistant` - generative text gateway and AI tools
//! - `booking` - booking and review session store

pub mod assistant;
pub mod booking;
pub mod identity;

pub use assistant::{AiTools, GenerativeTextGateway, ToolOutput};
pub use booking::BookingSessionStore;
pub use identity::{
    IdentityListener, IdentityMode, IdentityProviderAdapter, LoginOutcome, SignInFlow,
    Subscription,
};
