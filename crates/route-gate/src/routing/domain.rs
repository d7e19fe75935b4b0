use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier issued by the identity provider for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Area of the application a user works in, taken from provider metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Vendor,
    Public,
}

impl Role {
    /// Parses provider metadata. Anything other than the two recognized
    /// values yields `None` so the engine treats the user as indeterminate.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "vendor" => Some(Self::Vendor),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Public => "public",
        }
    }
}

/// Snapshot of what the identity provider currently knows about the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySignal {
    pub loaded: bool,
    pub signed_in: bool,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Option<Role>,
}

impl IdentitySignal {
    /// Identity provider has not answered yet.
    pub fn loading() -> Self {
        Self::default()
    }

    /// Resolved with no active session. Also used when resolution fails.
    pub fn signed_out() -> Self {
        Self {
            loaded: true,
            signed_in: false,
            user_id: None,
            role: None,
        }
    }

    pub fn signed_in(user_id: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            loaded: true,
            signed_in: true,
            user_id: Some(UserId(user_id.into())),
            role,
        }
    }
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::parse))
}

/// Resolution state of the remote onboarding record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    /// Query not resolved yet, never issued, or failed.
    #[default]
    Unknown,
    Pending,
    Complete,
}

impl OnboardingStatus {
    pub fn from_onboarded(is_onboarded: bool) -> Self {
        if is_onboarded {
            Self::Complete
        } else {
            Self::Pending
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OnboardingStatus::Unknown => "unknown",
            OnboardingStatus::Pending => "pending",
            OnboardingStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingSignal {
    pub status: OnboardingStatus,
}

impl OnboardingSignal {
    pub fn unknown() -> Self {
        Self {
            status: OnboardingStatus::Unknown,
        }
    }

    pub fn pending() -> Self {
        Self {
            status: OnboardingStatus::Pending,
        }
    }

    pub fn complete() -> Self {
        Self {
            status: OnboardingStatus::Complete,
        }
    }
}

impl From<OnboardingStatus> for OnboardingSignal {
    fn from(status: OnboardingStatus) -> Self {
        Self { status }
    }
}

/// Top-level area currently rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSegment {
    Auth,
    Public,
    Vendor,
    VendorOnboarding,
    Other,
}

impl RouteSegment {
    pub fn label(&self) -> &'static str {
        match self {
            RouteSegment::Auth => "auth",
            RouteSegment::Public => "public",
            RouteSegment::Vendor => "vendor",
            RouteSegment::VendorOnboarding => "vendor_onboarding",
            RouteSegment::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auth" => Some(Self::Auth),
            "public" => Some(Self::Public),
            "vendor" => Some(Self::Vendor),
            "vendor_onboarding" | "onboarding" => Some(Self::VendorOnboarding),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for RouteSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingAction {
    None,
    Navigate,
}

/// Pure output of one engine evaluation. `reason` is diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub action: RoutingAction,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<RouteSegment>,
    pub reason: String,
}

impl RoutingDecision {
    pub fn stay(reason: impl Into<String>) -> Self {
        Self {
            action: RoutingAction::None,
            target: None,
            reason: reason.into(),
        }
    }

    pub fn navigate(target: RouteSegment, reason: impl Into<String>) -> Self {
        Self {
            action: RoutingAction::Navigate,
            target: Some(target),
            reason: reason.into(),
        }
    }

    /// Target segment when the decision asks for navigation.
    pub fn navigation_target(&self) -> Option<RouteSegment> {
        match self.action {
            RoutingAction::Navigate => self.target,
            RoutingAction::None => None,
        }
    }

    pub fn is_navigate(&self) -> bool {
        self.navigation_target().is_some()
    }

    /// Behavioral equality; ignores `reason`.
    pub fn same_effect(&self, other: &RoutingDecision) -> bool {
        self.navigation_target() == other.navigation_target()
    }
}

/// Coarse classification of the user derived from the current signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    Unauthenticated,
    VendorPendingOnboarding,
    VendorOnboarded,
    PublicUser,
    Indeterminate,
}

impl UserState {
    pub fn label(&self) -> &'static str {
        match self {
            UserState::Unauthenticated => "unauthenticated",
            UserState::VendorPendingOnboarding => "vendor pending onboarding",
            UserState::VendorOnboarded => "vendor onboarded",
            UserState::PublicUser => "public user",
            UserState::Indeterminate => "indeterminate",
        }
    }
}
