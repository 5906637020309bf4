//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures of the serving layer itself.
///
/// Probe failures are not errors here; they end up inside the report.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The blocking probe task panicked or was cancelled.
    #[error("health probe task failed: {0}")]
    ProbeTask(#[from] tokio::task::JoinError),
    /// The report could not be encoded.
    #[error("failed to encode health report: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "internal server error");

        let body = serde_json::json!({ "error": message });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
