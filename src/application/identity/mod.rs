//! Identity handlers - the provider adapter and the login/logout flow.

mod adapter;
mod sign_in_flow;

pub use adapter::{IdentityListener, IdentityMode, IdentityProviderAdapter, Subscription};
pub use sign_in_flow::{LoginOutcome, SignInFlow};
