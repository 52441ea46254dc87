//! Turns a panicking handler into a 500 instead of a dropped connection.

use axum::Json;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tally_core::responses::ErrorEnvelope;

use crate::http::error::MSG_SERVER_ERROR;

pub async fn catch_panic_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match tokio::spawn(next.run(req)).await {
        Ok(resp) => resp,
        Err(err) => {
            if err.is_panic() {
                tracing::error!(%method, %path, "handler panicked");
            } else {
                tracing::error!(%method, %path, error = %err, "handler task cancelled");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::new(MSG_SERVER_ERROR)),
            )
                .into_response()
        }
    }
}
