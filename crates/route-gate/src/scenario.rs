//! Scripted signal sequences replayed through a [`RoutingDispatcher`].
//!
//! A scenario is a JSON document:
//!
//! ```json
//! {
//!   "initial_segment": "auth",
//!   "events": [
//!     { "event": "identity", "loaded": true, "signed_in": true, "user_id": "v-1", "role": "vendor" },
//!     { "event": "query_profile", "query": "first" },
//!     { "event": "resolve_profile", "query": "first", "status": "pending" },
//!     { "event": "segment", "segment": "vendor_onboarding" }
//!   ]
//! }
//! ```
//!
//! `query_profile` opens a ticket for the identity current at that point;
//! `resolve_profile` delivers its result later, so stale deliveries can be
//! scripted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::{
    DispatchReport, IdentitySignal, NavigationSink, OnboardingSignal, OnboardingStatus,
    ProfileTicket, RouteSegment, RoutingDispatcher,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_segment")]
    pub initial_segment: RouteSegment,
    pub events: Vec<ScenarioEvent>,
}

fn default_segment() -> RouteSegment {
    RouteSegment::Auth
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Identity(IdentitySignal),
    Onboarding {
        status: OnboardingStatus,
    },
    Segment {
        segment: RouteSegment,
    },
    QueryProfile {
        query: String,
    },
    ResolveProfile {
        query: String,
        #[serde(default)]
        status: Option<OnboardingStatus>,
        #[serde(default)]
        error: Option<String>,
    },
}

impl ScenarioEvent {
    pub fn describe(&self) -> String {
        match self {
            ScenarioEvent::Identity(identity) => match (identity.loaded, identity.signed_in) {
                (false, _) => "identity loading".to_string(),
                (true, false) => "identity signed out".to_string(),
                (true, true) => format!(
                    "identity signed in as {} ({})",
                    identity
                        .user_id
                        .as_ref()
                        .map(|id| id.0.as_str())
                        .unwrap_or("?"),
                    identity.role.map(|role| role.label()).unwrap_or("no role")
                ),
            },
            ScenarioEvent::Onboarding { status } => format!("onboarding {}", status.label()),
            ScenarioEvent::Segment { segment } => format!("host shows {segment}"),
            ScenarioEvent::QueryProfile { query } => format!("profile query '{query}' issued"),
            ScenarioEvent::ResolveProfile { query, status, .. } => match status {
                Some(status) => format!("profile query '{query}' resolved {}", status.label()),
                None => format!("profile query '{query}' failed"),
            },
        }
    }
}

impl Scenario {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&raw)
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, ScenarioError> {
        serde_json::from_slice(raw).map_err(ScenarioError::Parse)
    }
}

/// One replayed event and the evaluation it triggered, if any.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DispatchReport>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("event {index} resolves profile query '{query}' which was never issued")]
    UnknownQuery { index: usize, query: String },
}

pub fn replay<S>(scenario: &Scenario, sink: Arc<S>) -> Result<Vec<ReplayStep>, ScenarioError>
where
    S: NavigationSink,
{
    let mut dispatcher = RoutingDispatcher::new(sink, scenario.initial_segment);
    let mut tickets: HashMap<String, Option<ProfileTicket>> = HashMap::new();
    let mut steps = Vec::with_capacity(scenario.events.len());

    for (index, event) in scenario.events.iter().enumerate() {
        let report = match event {
            ScenarioEvent::Identity(identity) => dispatcher.update_identity(identity.clone()),
            ScenarioEvent::Onboarding { status } => {
                dispatcher.update_onboarding(OnboardingSignal::from(*status))
            }
            ScenarioEvent::Segment { segment } => dispatcher.update_segment(*segment),
            ScenarioEvent::QueryProfile { query } => {
                tickets.insert(query.clone(), dispatcher.begin_profile_query());
                None
            }
            ScenarioEvent::ResolveProfile {
                query,
                status,
                error,
            } => {
                let ticket = tickets
                    .remove(query)
                    .ok_or_else(|| ScenarioError::UnknownQuery {
                        index,
                        query: query.clone(),
                    })?;
                // A skipped query has nothing to deliver.
                ticket.and_then(|ticket| {
                    let result = status.ok_or_else(|| {
                        error
                            .clone()
                            .unwrap_or_else(|| "profile query failed".to_string())
                    });
                    dispatcher.resolve_profile(ticket, result)
                })
            }
        };

        steps.push(ReplayStep {
            index,
            event: event.describe(),
            report,
        });
    }

    Ok(steps)
}
