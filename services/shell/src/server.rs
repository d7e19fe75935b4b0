use crate::cli::ServeArgs;
use crate::infra::{AppState, GateState};
use crate::routes::with_routing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use route_gate::config::AppConfig;
use route_gate::error::AppError;
use route_gate::routing::RouteSegment;
use route_gate::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let initial_segment = args.initial_segment.unwrap_or(RouteSegment::Auth);
    let gate = GateState::new(initial_segment);

    let app = with_routing_routes(gate)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        ?config.platform,
        %addr,
        %initial_segment,
        "routing gate host ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
