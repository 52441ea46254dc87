//! # tally-server
//!
//! axum HTTP surface for Tally.
//!
//! Two services share one router: the bug tracker under `/api/bugs` and the
//! agro marketplace under `/api/agro`. Either can be left out by not wiring its
//! store into [`AppState`]. Cross-cutting behavior (request logging, CORS,
//! security headers, per-client rate limiting, panic recovery, body limit)
//! is applied as middleware in [`build_router`].

pub mod http;
pub mod middleware;
mod state;

pub use state::{AppState, HttpSettings};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;

/// Assemble the full application router.
///
/// Layers, outermost first: request log, CORS, security headers, rate limit,
/// panic recovery, body limit.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(http::meta::liveness_handler))
        .route("/health", get(http::meta::health_handler))
        .with_state(state.clone());

    if let Some(store) = state.bugs.clone() {
        router = router.merge(http::bugs::routes(store));
    }
    if let Some(store) = state.agro.clone() {
        router = router.merge(http::agro::routes(store));
    }

    router
        .fallback(http::meta::not_found_handler)
        .layer(DefaultBodyLimit::max(state.settings.max_body_bytes))
        .layer(from_fn(middleware::panic::catch_panic_middleware))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(from_fn(middleware::security::security_headers_middleware))
        .layer(from_fn_with_state(
            state,
            middleware::cors::cors_middleware,
        ))
        .layer(from_fn(middleware::request_log::request_log_middleware))
}
