//! HTTP health endpoint with observability for the workshop web server.
//!
//! Serves the aggregated health report on `/health` (any method) and the
//! service's own Prometheus metrics on `/metrics`, with structured logging
//! (tracing) around every request.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get};
use health::{HealthAggregator, SysinfoProbe, SystemProbe};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use config::Config;
use routes::health::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P: SystemProbe + 'static>(
    state: Arc<AppState<P>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", any(routes::health::check::<P>))
        .with_state(state)
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state backed by the host operating system.
pub fn create_default_state(config: &Config) -> Arc<AppState<SysinfoProbe>> {
    let probe = SysinfoProbe::new(config.inventory());
    let aggregator = HealthAggregator::new(probe, config.aggregator_settings());
    Arc::new(AppState::new(aggregator))
}
