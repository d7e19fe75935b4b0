use crate::infra::{AppState, GateState, NavigationRecord};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use route_gate::routing::{
    classify, decide, DispatchReport, IdentitySignal, OnboardingSignal, OnboardingStatus,
    RouteSegment, RoutingDecision, RoutingState, UserId, UserState,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct SegmentUpdate {
    pub(crate) segment: RouteSegment,
}

/// Profile result delivered by the host, tagged with the user it was read for.
#[derive(Debug, Deserialize)]
pub(crate) struct OnboardingUpdate {
    pub(crate) user_id: UserId,
    pub(crate) status: OnboardingStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecideRequest {
    pub(crate) identity: IdentitySignal,
    #[serde(default)]
    pub(crate) onboarding: OnboardingSignal,
    pub(crate) segment: RouteSegment,
}

#[derive(Debug, Serialize)]
pub(crate) struct DispatchResponse {
    /// False when the update matched the current signal and nothing ran.
    pub(crate) evaluated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) report: Option<DispatchReport>,
    pub(crate) state: RoutingState,
}

#[derive(Debug, Serialize)]
pub(crate) struct GateSnapshot {
    pub(crate) state: RoutingState,
    pub(crate) user_state: UserState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_navigation: Option<NavigationRecord>,
    pub(crate) history: Vec<NavigationRecord>,
}

pub(crate) fn with_routing_routes(gate: GateState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/routing/identity", post(identity_endpoint))
        .route("/api/v1/routing/onboarding", post(onboarding_endpoint))
        .route("/api/v1/routing/segment", post(segment_endpoint))
        .route("/api/v1/routing/state", get(state_endpoint))
        .route("/api/v1/routing/decide", post(decide_endpoint))
        .layer(Extension(gate))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn identity_endpoint(
    Extension(gate): Extension<GateState>,
    Json(identity): Json<IdentitySignal>,
) -> Json<DispatchResponse> {
    let mut dispatcher = gate.dispatcher.lock().expect("routing mutex poisoned");
    let report = dispatcher.update_identity(identity);
    Json(DispatchResponse {
        evaluated: report.is_some(),
        report,
        state: dispatcher.state().clone(),
    })
}

pub(crate) async fn onboarding_endpoint(
    Extension(gate): Extension<GateState>,
    Json(update): Json<OnboardingUpdate>,
) -> Json<DispatchResponse> {
    let mut dispatcher = gate.dispatcher.lock().expect("routing mutex poisoned");
    let ticket = dispatcher
        .begin_profile_query()
        .filter(|ticket| ticket.user_id() == &update.user_id);
    let report = match ticket {
        Some(ticket) => dispatcher.resolve_profile(ticket, Ok::<_, Infallible>(update.status)),
        None => {
            debug!(user_id = %update.user_id, "onboarding result for a user no longer signed in");
            None
        }
    };
    Json(DispatchResponse {
        evaluated: report.is_some(),
        report,
        state: dispatcher.state().clone(),
    })
}

pub(crate) async fn segment_endpoint(
    Extension(gate): Extension<GateState>,
    Json(update): Json<SegmentUpdate>,
) -> Json<DispatchResponse> {
    let mut dispatcher = gate.dispatcher.lock().expect("routing mutex poisoned");
    let report = dispatcher.update_segment(update.segment);
    Json(DispatchResponse {
        evaluated: report.is_some(),
        report,
        state: dispatcher.state().clone(),
    })
}

pub(crate) async fn state_endpoint(Extension(gate): Extension<GateState>) -> Json<GateSnapshot> {
    let state = gate
        .dispatcher
        .lock()
        .expect("routing mutex poisoned")
        .state()
        .clone();

    Json(GateSnapshot {
        user_state: classify(&state.identity, &state.onboarding),
        state,
        last_navigation: gate.navigator.last(),
        history: gate.navigator.history(),
    })
}

/// Stateless evaluation; nothing is dispatched.
pub(crate) async fn decide_endpoint(Json(request): Json<DecideRequest>) -> Json<RoutingDecision> {
    Json(decide(
        &request.identity,
        &request.onboarding,
        request.segment,
    ))
}
