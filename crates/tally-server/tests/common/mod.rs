//! Shared fixtures for router-level tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use tally_config::TallyConfig;
use tally_core::entities::{AgroListing, BugReport, NewBug, NewListing};
use tally_core::validation::BugFilter;
use tally_db::error::DatabaseError;
use tally_db::service::TallyService;
use tally_db::store::{AgroStore, BugStore};
use tally_db::updates::agro::ListingUpdate;
use tally_db::updates::bug::BugUpdate;
use tally_server::{AppState, build_router};
use tower::ServiceExt;

pub const MISSING_ID: &str = "0123456789abcdef01234567";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> TestResponse {
    let resp = router.clone().oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

pub fn form_request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub async fn memory_service() -> Arc<TallyService> {
    Arc::new(TallyService::new_local(":memory:").await.unwrap())
}

/// Router serving both APIs from one in-memory database.
pub async fn app(config: &TallyConfig) -> (Router, Arc<TallyService>) {
    let service = memory_service().await;
    let state = AppState::new(config)
        .with_bugs(service.clone())
        .with_agro(service.clone());
    (build_router(state), service)
}

/// Counts every store call before delegating to an in-memory database.
pub struct CountingStore {
    inner: Arc<TallyService>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: memory_service().await,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BugStore for CountingStore {
    async fn list_bugs(&self, filter: &BugFilter) -> Result<Vec<BugReport>, DatabaseError> {
        self.hit();
        BugStore::list_bugs(self.inner.as_ref(), filter).await
    }

    async fn get_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        self.hit();
        BugStore::get_bug(self.inner.as_ref(), id).await
    }

    async fn create_bug(&self, bug: NewBug) -> Result<BugReport, DatabaseError> {
        self.hit();
        BugStore::create_bug(self.inner.as_ref(), bug).await
    }

    async fn update_bug(
        &self,
        id: &str,
        update: BugUpdate,
    ) -> Result<Option<BugReport>, DatabaseError> {
        self.hit();
        BugStore::update_bug(self.inner.as_ref(), id, update).await
    }

    async fn delete_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        self.hit();
        BugStore::delete_bug(self.inner.as_ref(), id).await
    }
}

#[async_trait]
impl AgroStore for CountingStore {
    async fn list_listings(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<AgroListing>, DatabaseError> {
        self.hit();
        AgroStore::list_listings(self.inner.as_ref(), user_id).await
    }

    async fn create_listing(&self, listing: NewListing) -> Result<AgroListing, DatabaseError> {
        self.hit();
        AgroStore::create_listing(self.inner.as_ref(), listing).await
    }

    async fn update_listing(
        &self,
        id: &str,
        update: ListingUpdate,
    ) -> Result<Option<AgroListing>, DatabaseError> {
        self.hit();
        AgroStore::update_listing(self.inner.as_ref(), id, update).await
    }

    async fn delete_listing(&self, id: &str) -> Result<Option<AgroListing>, DatabaseError> {
        self.hit();
        AgroStore::delete_listing(self.inner.as_ref(), id).await
    }
}

/// A bug store whose every call panics.
pub struct PanickingStore;

#[async_trait]
impl BugStore for PanickingStore {
    async fn list_bugs(&self, _filter: &BugFilter) -> Result<Vec<BugReport>, DatabaseError> {
        panic!("list_bugs exploded")
    }

    async fn get_bug(&self, _id: &str) -> Result<Option<BugReport>, DatabaseError> {
        panic!("get_bug exploded")
    }

    async fn create_bug(&self, _bug: NewBug) -> Result<BugReport, DatabaseError> {
        panic!("create_bug exploded")
    }

    async fn update_bug(
        &self,
        _id: &str,
        _update: BugUpdate,
    ) -> Result<Option<BugReport>, DatabaseError> {
        panic!("update_bug exploded")
    }

    async fn delete_bug(&self, _id: &str) -> Result<Option<BugReport>, DatabaseError> {
        panic!("delete_bug exploded")
    }
}
