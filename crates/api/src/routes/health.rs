//! Health check endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use health::{HealthAggregator, RequestContext, SystemProbe};

use crate::error::ApiError;

pub const STUDENT_NAME_HEADER: &str = "x-student-name";
pub const ENVIRONMENT_HEADER: &str = "x-environment";

/// Shared application state accessible from the health handler.
pub struct AppState<P> {
    pub aggregator: Arc<HealthAggregator<P>>,
}

impl<P: SystemProbe> AppState<P> {
    pub fn new(aggregator: HealthAggregator<P>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

/// ANY /health — full health report; 200 when healthy, 503 when degraded.
#[tracing::instrument(skip(state, request), fields(method = %request.method()))]
pub async fn check<P: SystemProbe + 'static>(
    State(state): State<Arc<AppState<P>>>,
    request: Request,
) -> Result<Response, ApiError> {
    let ctx = request_context(&request);
    drop(request);

    let aggregator = state.aggregator.clone();
    let started = Instant::now();
    let report = tokio::task::spawn_blocking(move || aggregator.run(&ctx)).await?;
    metrics::histogram!("health_check_duration_seconds")
        .record(started.elapsed().as_secs_f64());
    metrics::counter!("health_checks_total", "status" => report.status.as_str()).increment(1);
    metrics::gauge!("health_check_issues").set(report.issues.len() as f64);

    let body = report.to_pretty_json()?;
    let status = if report.status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let response = (
        status,
        [
            (CONTENT_TYPE, "application/json"),
            (CACHE_CONTROL, "no-cache, must-revalidate"),
        ],
        body,
    )
        .into_response();

    health::log_summary(&report);
    Ok(response)
}

/// Extracts the request facts the report echoes back.
fn request_context(request: &Request) -> RequestContext {
    let headers = request.headers();
    // Header bytes are not guaranteed ASCII; decode them as UTF-8.
    let header = |name: &str| {
        headers
            .get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    };

    RequestContext {
        received_at: Utc::now(),
        request_uri: request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string()),
        remote_addr: request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string()),
        user_agent: header(USER_AGENT.as_str()),
        student_name: header(STUDENT_NAME_HEADER),
        environment: header(ENVIRONMENT_HEADER),
    }
}
