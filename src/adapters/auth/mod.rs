//! Identity backend adapters.
//!
//! Implementations of the `IdentityBackend` port:
//!
//! - `firebase` - Firebase Identity Toolkit REST implementation
//! - `simulated` - In-process sign-in for unconfigured environments
//! - `mock` - Test implementation with queued results and call counts

mod firebase;
mod mock;
mod simulated;

pub use firebase::{FirebaseIdentityBackend, NoInteractiveSignIn, StaticCredentialSource};
pub use mock::MockIdentityBackend;
pub use simulated::{SimulatedIdentityStore, DEMO_USER_EMAIL, DEMO_USER_NAME};
