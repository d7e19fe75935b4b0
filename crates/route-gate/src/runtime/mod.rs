//! Wires the session store, identity and profile providers, and the routing
//! dispatcher into the boot / sign-in / sign-out lifecycle.

mod controller;
pub mod providers;

pub use controller::SessionRuntime;
pub use providers::{
    Credentials, IdentityError, IdentityProvider, ProfileProvider, ProfileQueryError,
    SignInOutcome,
};
