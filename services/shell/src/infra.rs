use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use route_gate::routing::{NavigationError, NavigationSink, RouteSegment, RoutingDispatcher};
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Dispatcher shared by the HTTP handlers; the mutex serializes updates so
/// they are evaluated in arrival order.
#[derive(Clone)]
pub(crate) struct GateState {
    pub(crate) dispatcher: Arc<Mutex<RoutingDispatcher<HostNavigator>>>,
    pub(crate) navigator: Arc<HostNavigator>,
}

impl GateState {
    pub(crate) fn new(initial_segment: RouteSegment) -> Self {
        let navigator = Arc::new(HostNavigator::default());
        let dispatcher = RoutingDispatcher::new(navigator.clone(), initial_segment);
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            navigator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NavigationRecord {
    pub(crate) segment: RouteSegment,
    pub(crate) issued_at: DateTime<Utc>,
}

/// Navigation sink for hosts that poll: every replace is recorded with the
/// time it was issued.
#[derive(Default)]
pub(crate) struct HostNavigator {
    history: Mutex<Vec<NavigationRecord>>,
}

impl HostNavigator {
    pub(crate) fn history(&self) -> Vec<NavigationRecord> {
        self.history.lock().expect("navigation mutex poisoned").clone()
    }

    pub(crate) fn last(&self) -> Option<NavigationRecord> {
        self.history
            .lock()
            .expect("navigation mutex poisoned")
            .last()
            .cloned()
    }
}

impl NavigationSink for HostNavigator {
    fn replace(&self, segment: RouteSegment) -> Result<(), NavigationError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|_| NavigationError::Unavailable("navigation log poisoned".to_string()))?;
        guard.push(NavigationRecord {
            segment,
            issued_at: Utc::now(),
        });
        Ok(())
    }
}

pub(crate) fn parse_segment(raw: &str) -> Result<RouteSegment, String> {
    RouteSegment::parse(raw).ok_or_else(|| {
        format!(
            "unknown segment '{raw}' (expected auth, public, vendor, vendor_onboarding or other)"
        )
    })
}
