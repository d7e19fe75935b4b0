use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{
    IdentitySignal, OnboardingSignal, OnboardingStatus, RouteSegment, RoutingDecision, UserId,
    UserState,
};
use super::engine::{classify, decide};
use super::navigator::{NavigationOutcome, NavigationSink, Navigator};

/// Everything the engine reads, owned by the dispatcher and passed to the
/// engine by reference on each evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingState {
    pub identity: IdentitySignal,
    pub onboarding: OnboardingSignal,
    pub segment: RouteSegment,
}

impl RoutingState {
    pub fn new(segment: RouteSegment) -> Self {
        Self {
            identity: IdentitySignal::loading(),
            onboarding: OnboardingSignal::unknown(),
            segment,
        }
    }
}

/// Binds an in-flight profile query to the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTicket {
    user_id: UserId,
    epoch: u64,
}

impl ProfileTicket {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub decision: RoutingDecision,
    pub navigation: NavigationOutcome,
    pub user_state: UserState,
}

/// Receives signal updates in arrival order, re-runs the engine on every
/// change, and hands the result to the navigator.
pub struct RoutingDispatcher<S> {
    state: RoutingState,
    navigator: Navigator<S>,
    epoch: u64,
    last_report: Option<DispatchReport>,
}

impl<S> RoutingDispatcher<S>
where
    S: NavigationSink,
{
    pub fn new(sink: Arc<S>, initial_segment: RouteSegment) -> Self {
        Self {
            state: RoutingState::new(initial_segment),
            navigator: Navigator::new(sink),
            epoch: 0,
            last_report: None,
        }
    }

    pub fn state(&self) -> &RoutingState {
        &self.state
    }

    pub fn navigator(&self) -> &Navigator<S> {
        &self.navigator
    }

    pub fn last_report(&self) -> Option<&DispatchReport> {
        self.last_report.as_ref()
    }

    /// Returns `None` when the signal is identical to the current one.
    pub fn update_identity(&mut self, identity: IdentitySignal) -> Option<DispatchReport> {
        if self.state.identity == identity {
            return None;
        }

        if self.state.identity.user_id != identity.user_id {
            self.epoch += 1;
            self.state.onboarding = OnboardingSignal::unknown();
            debug!(epoch = self.epoch, "identity changed; onboarding status reset");
        }

        self.state.identity = identity;
        Some(self.evaluate())
    }

    pub fn update_onboarding(&mut self, onboarding: OnboardingSignal) -> Option<DispatchReport> {
        if self.state.onboarding == onboarding {
            return None;
        }

        self.state.onboarding = onboarding;
        Some(self.evaluate())
    }

    /// Records the segment the host is displaying now.
    pub fn update_segment(&mut self, segment: RouteSegment) -> Option<DispatchReport> {
        if self.state.segment == segment {
            return None;
        }

        self.state.segment = segment;
        if self
            .navigator
            .last_applied()
            .is_some_and(|applied| applied != segment)
        {
            self.navigator.forget();
        }
        Some(self.evaluate())
    }

    /// Ticket for a profile query, or `None` when there is no identity to
    /// query for.
    pub fn begin_profile_query(&self) -> Option<ProfileTicket> {
        let identity = &self.state.identity;
        if !identity.loaded || !identity.signed_in {
            return None;
        }

        identity.user_id.clone().map(|user_id| ProfileTicket {
            user_id,
            epoch: self.epoch,
        })
    }

    /// Applies a profile query result. Results for an identity that is no
    /// longer current are dropped; failures leave the status unknown.
    pub fn resolve_profile<E>(
        &mut self,
        ticket: ProfileTicket,
        result: Result<OnboardingStatus, E>,
    ) -> Option<DispatchReport>
    where
        E: fmt::Display,
    {
        let current = self.state.identity.user_id.as_ref();
        if ticket.epoch != self.epoch || current != Some(&ticket.user_id) {
            debug!(
                user_id = %ticket.user_id,
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "discarding stale profile result"
            );
            return None;
        }

        let status = match result {
            Ok(status) => status,
            Err(err) => {
                warn!(user_id = %ticket.user_id, error = %err, "profile query failed");
                OnboardingStatus::Unknown
            }
        };

        self.update_onboarding(status.into())
    }

    /// Runs the engine against the current state and applies the result.
    pub fn evaluate(&mut self) -> DispatchReport {
        let decision = decide(
            &self.state.identity,
            &self.state.onboarding,
            self.state.segment,
        );
        let navigation = self.navigator.apply(&decision);
        let report = DispatchReport {
            user_state: classify(&self.state.identity, &self.state.onboarding),
            decision,
            navigation,
        };

        self.last_report = Some(report.clone());
        report
    }
}
