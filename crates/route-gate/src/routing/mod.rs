//! Routing gate: decides which area of the application the current user may
//! see and issues replace-style navigations when that changes.

pub mod dispatcher;
pub mod domain;
pub mod engine;
pub mod navigator;

#[cfg(test)]
mod tests;

pub use dispatcher::{DispatchReport, ProfileTicket, RoutingDispatcher, RoutingState};
pub use domain::{
    IdentitySignal, OnboardingSignal, OnboardingStatus, Role, RouteSegment, RoutingAction,
    RoutingDecision, UserId, UserState,
};
pub use engine::{classify, decide};
pub use navigator::{NavigationError, NavigationOutcome, NavigationSink, Navigator};
