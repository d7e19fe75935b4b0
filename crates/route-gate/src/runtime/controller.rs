use std::sync::Arc;

use tracing::{info, warn};

use super::providers::{Credentials, IdentityError, IdentityProvider, ProfileProvider};
use crate::routing::{
    DispatchReport, IdentitySignal, NavigationSink, OnboardingStatus, Role, RouteSegment,
    RoutingDispatcher,
};
use crate::session::SessionStore;

/// Owns the session store and the dispatcher, and translates provider
/// results into signal updates. Identity failures degrade to signed-out and
/// profile failures to an unknown onboarding status.
pub struct SessionRuntime<I, P, S> {
    identity: Arc<I>,
    profiles: Arc<P>,
    store: SessionStore,
    dispatcher: RoutingDispatcher<S>,
}

impl<I, P, S> SessionRuntime<I, P, S>
where
    I: IdentityProvider,
    P: ProfileProvider,
    S: NavigationSink,
{
    pub fn new(
        identity: Arc<I>,
        profiles: Arc<P>,
        store: SessionStore,
        sink: Arc<S>,
        initial_segment: RouteSegment,
    ) -> Self {
        Self {
            identity,
            profiles,
            store,
            dispatcher: RoutingDispatcher::new(sink, initial_segment),
        }
    }

    pub fn dispatcher(&self) -> &RoutingDispatcher<S> {
        &self.dispatcher
    }

    /// Mutable access for hosts that run profile queries themselves.
    pub fn dispatcher_mut(&mut self) -> &mut RoutingDispatcher<S> {
        &mut self.dispatcher
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Reads the persisted token once and resolves identity from it.
    pub fn boot(&mut self) -> Vec<DispatchReport> {
        let token = self.store.load_token();
        let identity = match self.identity.restore(token.as_deref()) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, had_token = token.is_some(), "identity restore failed");
                IdentitySignal::signed_out()
            }
        };
        info!(
            signed_in = identity.signed_in,
            backend = %self.store.backend_kind(),
            "identity restored"
        );

        self.publish_identity(identity)
    }

    /// Persists the token immediately on success. On failure the user is
    /// routed as signed out and the error is returned for display.
    pub fn sign_in(
        &mut self,
        credentials: &Credentials,
    ) -> Result<Vec<DispatchReport>, IdentityError> {
        match self.identity.sign_in(credentials) {
            Ok(outcome) => {
                self.store.save_token(&outcome.token);
                info!(identifier = %credentials.identifier, "signed in");
                Ok(self.publish_identity(outcome.identity))
            }
            Err(err) => {
                warn!(identifier = %credentials.identifier, error = %err, "sign-in failed");
                self.publish_identity(IdentitySignal::signed_out());
                Err(err)
            }
        }
    }

    pub fn sign_out(&mut self) -> Vec<DispatchReport> {
        if let Err(err) = self.identity.sign_out() {
            warn!(error = %err, "identity provider sign-out failed");
        }
        self.store.clear_token();
        info!("signed out");

        self.publish_identity(IdentitySignal::signed_out())
    }

    /// Pulls the provider's current identity and dispatches it.
    pub fn refresh_identity(&mut self) -> Vec<DispatchReport> {
        let identity = match self.identity.current_identity() {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "identity resolution failed");
                IdentitySignal::signed_out()
            }
        };

        self.publish_identity(identity)
    }

    /// Queries onboarding status for the current user, if there is one.
    pub fn refresh_profile(&mut self) -> Option<DispatchReport> {
        let ticket = self.dispatcher.begin_profile_query()?;
        let result = self.profiles.profile_status(ticket.user_id());
        self.dispatcher.resolve_profile(ticket, result)
    }

    pub fn update_segment(&mut self, segment: RouteSegment) -> Option<DispatchReport> {
        self.dispatcher.update_segment(segment)
    }

    fn publish_identity(&mut self, identity: IdentitySignal) -> Vec<DispatchReport> {
        let mut reports: Vec<DispatchReport> =
            self.dispatcher.update_identity(identity).into_iter().collect();

        // A changed user resets onboarding to unknown, so this also covers
        // the first query after sign-in. Only vendor routing reads the status.
        let state = self.dispatcher.state();
        if state.identity.role == Some(Role::Vendor)
            && state.onboarding.status == OnboardingStatus::Unknown
        {
            reports.extend(self.refresh_profile());
        }
        reports
    }
}
