use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{RouteSegment, RoutingDecision};

/// Host boundary that swaps the top-level screen for `segment`, discarding the
/// current history entry so back navigation cannot return to it.
pub trait NavigationSink: Send + Sync {
    fn replace(&self, segment: RouteSegment) -> Result<(), NavigationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation host unavailable: {0}")]
    Unavailable(String),
}

/// What happened when a decision was handed to the [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// Decision did not ask for navigation.
    Idle,
    /// Target matches the last applied navigation.
    Suppressed(RouteSegment),
    Issued(RouteSegment),
    /// Sink rejected the navigation; nothing is recorded so it is retried.
    Failed(RouteSegment),
}

impl NavigationOutcome {
    pub fn issued(&self) -> Option<RouteSegment> {
        match self {
            NavigationOutcome::Issued(segment) => Some(*segment),
            _ => None,
        }
    }
}

/// Applies routing decisions to a [`NavigationSink`] at most once per target.
pub struct Navigator<S> {
    sink: Arc<S>,
    last_applied: Option<RouteSegment>,
}

impl<S> Navigator<S>
where
    S: NavigationSink,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            last_applied: None,
        }
    }

    pub fn apply(&mut self, decision: &RoutingDecision) -> NavigationOutcome {
        let Some(target) = decision.navigation_target() else {
            return NavigationOutcome::Idle;
        };

        if self.last_applied == Some(target) {
            debug!(%target, reason = %decision.reason, "navigation already applied");
            return NavigationOutcome::Suppressed(target);
        }

        match self.sink.replace(target) {
            Ok(()) => {
                info!(%target, reason = %decision.reason, "navigation issued");
                self.last_applied = Some(target);
                NavigationOutcome::Issued(target)
            }
            Err(err) => {
                warn!(%target, error = %err, "navigation rejected by host");
                NavigationOutcome::Failed(target)
            }
        }
    }

    pub fn last_applied(&self) -> Option<RouteSegment> {
        self.last_applied
    }

    /// Drops the last applied target so the next navigation to it is issued.
    pub fn forget(&mut self) {
        self.last_applied = None;
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }
}
