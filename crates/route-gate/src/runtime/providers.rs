use std::fmt;

use crate::routing::{IdentitySignal, OnboardingStatus, UserId};

/// Sign-in material passed through to the identity provider untouched.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Successful sign-in: the opaque token to persist and the resolved identity.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub token: String,
    pub identity: IdentitySignal,
}

/// Boundary to the external identity provider.
pub trait IdentityProvider: Send + Sync {
    /// Restores identity from a persisted token, or resolves the anonymous
    /// state when there is none.
    fn restore(&self, token: Option<&str>) -> Result<IdentitySignal, IdentityError>;
    fn current_identity(&self) -> Result<IdentitySignal, IdentityError>;
    fn sign_in(&self, credentials: &Credentials) -> Result<SignInOutcome, IdentityError>;
    fn sign_out(&self) -> Result<(), IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("session token rejected")]
    SessionRejected,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to the backend holding onboarding records. Never called without
/// a user id.
pub trait ProfileProvider: Send + Sync {
    fn profile_status(&self, user_id: &UserId) -> Result<OnboardingStatus, ProfileQueryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileQueryError {
    #[error("profile backend unavailable: {0}")]
    Unavailable(String),
}
