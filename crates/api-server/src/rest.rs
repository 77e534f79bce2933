//! Shared REST state, error mapping and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campaign_core::error::DspError;
use campaign_dsp::DspClient;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, warn};
use utoipa::ToSchema;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<DspClient>,
    pub node_id: String,
    pub start_time: Instant,
    /// Upper bound on how long a report request may wait for the job.
    pub report_timeout: Duration,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Map an engine error onto an HTTP status and a stable error code.
pub fn api_error(err: DspError) -> ApiError {
    let status = match &err {
        DspError::InvalidDraft(_) => StatusCode::BAD_REQUEST,
        DspError::Auth { .. } => StatusCode::UNAUTHORIZED,
        DspError::Api { .. }
        | DspError::Submission { .. }
        | DspError::ReportFailed { .. }
        | DspError::Transport(_)
        | DspError::Decode(_) => StatusCode::BAD_GATEWAY,
        DspError::ReportTimeout { .. } | DspError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        DspError::Config(_) | DspError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(error = %err, code = err.code(), "Request failed");
    } else {
        warn!(error = %err, code = err.code(), "Request rejected");
    }
    metrics::counter!("api.errors", "code" => err.code()).increment(1);

    (
        status,
        Json(ErrorResponse {
            error: err.code().to_string(),
            message: err.to_string(),
        }),
    )
}

/// GET /health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe.
/// Ready once a token has been acquired at least once.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "No access token acquired yet"),
    )
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.client.session().cached_token().is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
