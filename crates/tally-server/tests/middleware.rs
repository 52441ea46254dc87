mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::{PanickingStore, app, get, json_request, memory_service, send};
use pretty_assertions::assert_eq;
use serde_json::json;
use tally_config::TallyConfig;
use tally_server::{AppState, build_router};

fn with_origin(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn any_origin_gets_wildcard() {
    let (router, _) = app(&TallyConfig::default()).await;
    let resp = send(&router, with_origin("/health", "https://shop.example")).await;
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    assert_eq!(resp.header("access-control-allow-credentials"), None);
}

#[tokio::test]
async fn explicit_origins_are_echoed_only_when_listed() {
    let mut config = TallyConfig::default();
    config.cors.allowed_origins = vec!["https://app.example".into()];
    let (router, _) = app(&config).await;

    let allowed = send(&router, with_origin("/api/bugs", "https://app.example")).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(
        allowed.header("access-control-allow-origin"),
        Some("https://app.example")
    );
    assert_eq!(allowed.header("access-control-allow-credentials"), Some("true"));
    assert_eq!(allowed.header("vary"), Some("Origin"));

    let denied = send(&router, with_origin("/api/bugs", "https://evil.example")).await;
    assert_eq!(denied.header("access-control-allow-origin"), None);
}

#[tokio::test]
async fn preflight_short_circuits() {
    let (router, _) = app(&TallyConfig::default()).await;
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/bugs/0123456789abcdef01234567")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-trace")
        .body(Body::empty())
        .unwrap();

    let resp = send(&router, req).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(
        resp.header("access-control-allow-methods"),
        Some("GET,POST,PUT,PATCH,DELETE,OPTIONS")
    );
    assert_eq!(
        resp.header("access-control-allow-headers"),
        Some("content-type,x-trace")
    );
}

#[tokio::test]
async fn security_headers_on_every_response() {
    let (router, _) = app(&TallyConfig::default()).await;
    for uri in ["/health", "/api/bugs/bad", "/missing"] {
        let resp = send(&router, get(uri)).await;
        assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(resp.header("x-frame-options"), Some("SAMEORIGIN"));
        assert_eq!(resp.header("referrer-policy"), Some("no-referrer"));
    }
}

#[tokio::test]
async fn rate_limit_rejects_after_budget() {
    let mut config = TallyConfig::default();
    config.rate_limit.max_requests = 2;
    let (router, _) = app(&config).await;

    for remaining in ["1", "0"] {
        let resp = send(&router, get("/health")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.header("ratelimit-limit"), Some("2"));
        assert_eq!(resp.header("ratelimit-remaining"), Some(remaining));
    }

    let resp = send(&router, get("/api/bugs")).await;
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        resp.json(),
        json!({"success": false, "error": "Too many requests, please try again later."})
    );
    assert!(resp.header("ratelimit-reset").is_some());
}

#[tokio::test]
async fn rate_limit_can_be_disabled() {
    let mut config = TallyConfig::default();
    config.rate_limit.enabled = false;
    config.rate_limit.max_requests = 1;
    let (router, _) = app(&config).await;

    for _ in 0..3 {
        let resp = send(&router, get("/health")).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.header("ratelimit-limit"), None);
    }
}

#[tokio::test]
async fn unknown_routes_echo_the_target() {
    let (router, _) = app(&TallyConfig::default()).await;
    let resp = send(&router, get("/api/nowhere?page=2")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(
        resp.json(),
        json!({"success": false, "error": "Not Found - /api/nowhere?page=2"})
    );
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let mut config = TallyConfig::default();
    config.server.max_body_bytes = 64;
    let (router, _) = app(&config).await;

    let body = json!({"title": "x".repeat(200), "description": "y", "reportedBy": "z"});
    let resp = send(&router, json_request(Method::POST, "/api/bugs", &body)).await;
    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(resp.json()["error"], "Payload Too Large");
}

#[tokio::test]
async fn handler_panic_becomes_server_error() {
    let state = AppState::new(&TallyConfig::default()).with_bugs(Arc::new(PanickingStore));
    let router = build_router(state);

    let resp = send(&router, get("/api/bugs")).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.json(), json!({"success": false, "error": "Server Error"}));

    let health = send(&router, get("/health")).await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn liveness_and_health() {
    let (router, _) = app(&TallyConfig::default()).await;
    let live = send(&router, get("/")).await;
    assert_eq!(live.json(), json!({"message": "Bug Tracker API is running"}));

    let health = send(&router, get("/health")).await.json();
    assert_eq!(health["status"], "ok");
    assert!(health["uptime"].as_f64().unwrap() >= 0.0);
    assert!(health["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn agro_only_server() {
    let state = AppState::new(&TallyConfig::default()).with_agro(memory_service().await);
    let router = build_router(state);

    let live = send(&router, get("/")).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "MT Kenya Agro API is running");

    let bugs = send(&router, get("/api/bugs")).await;
    assert_eq!(bugs.status, StatusCode::NOT_FOUND);
    assert_eq!(send(&router, get("/api/agro")).await.json(), json!([]));
}
