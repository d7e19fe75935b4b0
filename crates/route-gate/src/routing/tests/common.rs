use std::sync::{Arc, Mutex};

use crate::routing::domain::{
    IdentitySignal, OnboardingSignal, OnboardingStatus, Role, RouteSegment,
};
use crate::routing::navigator::{NavigationError, NavigationSink};
use crate::routing::RoutingDispatcher;

pub(super) const ALL_SEGMENTS: [RouteSegment; 5] = [
    RouteSegment::Auth,
    RouteSegment::Public,
    RouteSegment::Vendor,
    RouteSegment::VendorOnboarding,
    RouteSegment::Other,
];

pub(super) const ALL_STATUSES: [OnboardingStatus; 3] = [
    OnboardingStatus::Unknown,
    OnboardingStatus::Pending,
    OnboardingStatus::Complete,
];

pub(super) const ALL_ROLES: [Option<Role>; 3] = [Some(Role::Vendor), Some(Role::Public), None];

pub(super) fn vendor() -> IdentitySignal {
    IdentitySignal::signed_in("vendor-1", Some(Role::Vendor))
}

pub(super) fn public_user() -> IdentitySignal {
    IdentitySignal::signed_in("public-1", Some(Role::Public))
}

pub(super) fn onboarding(status: OnboardingStatus) -> OnboardingSignal {
    OnboardingSignal { status }
}

/// Every identity shape the engine distinguishes, including unloaded ones.
pub(super) fn identity_variants() -> Vec<IdentitySignal> {
    let mut variants = vec![
        IdentitySignal::loading(),
        IdentitySignal::signed_out(),
        IdentitySignal {
            loaded: false,
            signed_in: true,
            user_id: Some(crate::routing::UserId("early".to_string())),
            role: Some(Role::Vendor),
        },
    ];
    for role in ALL_ROLES {
        variants.push(IdentitySignal::signed_in("user-1", role));
    }
    variants
}

#[derive(Default)]
pub(super) struct RecordingSink {
    calls: Mutex<Vec<RouteSegment>>,
}

impl RecordingSink {
    pub(super) fn calls(&self) -> Vec<RouteSegment> {
        self.calls.lock().expect("sink mutex poisoned").clone()
    }
}

impl NavigationSink for RecordingSink {
    fn replace(&self, segment: RouteSegment) -> Result<(), NavigationError> {
        self.calls
            .lock()
            .expect("sink mutex poisoned")
            .push(segment);
        Ok(())
    }
}

pub(super) fn dispatcher_at(
    segment: RouteSegment,
) -> (RoutingDispatcher<RecordingSink>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (RoutingDispatcher::new(sink.clone(), segment), sink)
}
