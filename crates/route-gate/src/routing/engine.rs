use super::domain::{
    IdentitySignal, OnboardingSignal, OnboardingStatus, Role, RouteSegment, RoutingDecision,
    UserState,
};

/// Maps the current signals and displayed segment to a routing decision.
///
/// Rules are checked in order and the first match wins:
///
/// 1. identity not loaded: stay
/// 2. signed out: go to `Auth` unless already there
/// 3. vendor: wait on an unknown onboarding status, send pending vendors to
///    onboarding, send onboarded vendors out of `Auth`/`Public` into `Vendor`
/// 4. public: move out of `Auth`/`Vendor` into `Public`
/// 5. signed in without a role: stay
pub fn decide(
    identity: &IdentitySignal,
    onboarding: &OnboardingSignal,
    current: RouteSegment,
) -> RoutingDecision {
    if !identity.loaded {
        return RoutingDecision::stay("identity provider has not responded");
    }

    if !identity.signed_in {
        return if current == RouteSegment::Auth {
            RoutingDecision::stay("signed out on auth screen")
        } else {
            RoutingDecision::navigate(RouteSegment::Auth, "signed out")
        };
    }

    match identity.role {
        Some(Role::Vendor) => decide_vendor(onboarding.status, current),
        Some(Role::Public) => match current {
            RouteSegment::Auth | RouteSegment::Vendor => RoutingDecision::navigate(
                RouteSegment::Public,
                "public user outside public area",
            ),
            _ => RoutingDecision::stay("public user in permitted area"),
        },
        None => RoutingDecision::stay("role metadata not available"),
    }
}

fn decide_vendor(status: OnboardingStatus, current: RouteSegment) -> RoutingDecision {
    match status {
        OnboardingStatus::Unknown => RoutingDecision::stay("onboarding status unresolved"),
        OnboardingStatus::Pending => {
            if current == RouteSegment::VendorOnboarding {
                RoutingDecision::stay("vendor already onboarding")
            } else {
                RoutingDecision::navigate(
                    RouteSegment::VendorOnboarding,
                    "vendor onboarding pending",
                )
            }
        }
        OnboardingStatus::Complete => match current {
            RouteSegment::Auth | RouteSegment::Public => RoutingDecision::navigate(
                RouteSegment::Vendor,
                "onboarded vendor outside vendor area",
            ),
            _ => RoutingDecision::stay("onboarded vendor in permitted area"),
        },
    }
}

/// Classifies the user for diagnostics. Shares the precedence of [`decide`].
pub fn classify(identity: &IdentitySignal, onboarding: &OnboardingSignal) -> UserState {
    if !identity.loaded {
        return UserState::Indeterminate;
    }
    if !identity.signed_in {
        return UserState::Unauthenticated;
    }
    match (identity.role, onboarding.status) {
        (Some(Role::Vendor), OnboardingStatus::Pending) => UserState::VendorPendingOnboarding,
        (Some(Role::Vendor), OnboardingStatus::Complete) => UserState::VendorOnboarded,
        (Some(Role::Vendor), OnboardingStatus::Unknown) => UserState::Indeterminate,
        (Some(Role::Public), _) => UserState::PublicUser,
        (None, _) => UserState::Indeterminate,
    }
}
