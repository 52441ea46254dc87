//! Liveness, health and fallback handlers.

use axum::Json;
use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tally_core::responses::{ErrorEnvelope, HealthResponse, LivenessResponse};

use crate::AppState;

pub const BUG_TRACKER_LIVENESS: &str = "Bug Tracker API is running";
pub const AGRO_LIVENESS: &str = "MT Kenya Agro API is running";

/// `GET /`: JSON when the bug tracker is served, plain text for agro alone.
pub async fn liveness_handler(State(state): State<AppState>) -> Response {
    if state.serves_bugs() {
        Json(LivenessResponse {
            message: BUG_TRACKER_LIVENESS.to_string(),
        })
        .into_response()
    } else {
        AGRO_LIVENESS.into_response()
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::new(format!("Not Found - {target}"))),
    )
}
