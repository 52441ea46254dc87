//! `/api/bugs` handlers.
//!
//! Every id-scoped handler checks the id shape before touching the store, and
//! every write sanitizes then validates its body first. Bodies may be JSON or
//! URL-encoded forms; an empty body reads as `{}`.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use tally_core::ids::ensure_object_id;
use tally_core::responses::{
    BugResponse, DataEnvelope, ListEnvelope, MessageEnvelope, format_bug_response,
};
use tally_core::validation::{BugFilter, BugInput, StatusInput};
use tally_db::store::BugStore;
use tally_db::updates::bug::{BugUpdate, BugUpdateBuilder};

use super::body::{BodyRejection, JsonOrForm};
use super::error::ApiError;

pub const MSG_BUG_DELETED: &str = "Bug deleted successfully";

type Store = State<Arc<dyn BugStore>>;

pub fn routes(store: Arc<dyn BugStore>) -> Router {
    Router::new()
        .route("/api/bugs", get(list_bugs).post(create_bug))
        .route(
            "/api/bugs/:id",
            get(get_bug).put(update_bug).delete(delete_bug),
        )
        .route("/api/bugs/:id/status", patch(update_bug_status))
        .with_state(store)
}

async fn list_bugs(
    State(store): Store,
    query: Result<Query<BugFilter>, QueryRejection>,
) -> Result<Json<ListEnvelope<BugResponse>>, ApiError> {
    let Query(filter) = query?;
    let bugs = store.list_bugs(&filter).await?;
    tracing::debug!(count = bugs.len(), ?filter, "listed bugs");
    Ok(Json(ListEnvelope::ok(
        bugs.iter().map(BugResponse::from).collect(),
    )))
}

async fn get_bug(
    State(store): Store,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<BugResponse>>, ApiError> {
    ensure_object_id(&id)?;
    let bug = store.get_bug(&id).await?;
    let bug = format_bug_response(bug.as_ref()).ok_or(ApiError::NotFound)?;
    Ok(Json(DataEnvelope::ok(bug)))
}

async fn create_bug(
    State(store): Store,
    body: Result<JsonOrForm<BugInput>, BodyRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<BugResponse>>), ApiError> {
    let JsonOrForm(input) = body?;
    let new_bug = input.into_new_bug()?;
    let bug = store.create_bug(new_bug).await?;
    tracing::info!(id = %bug.id, priority = %bug.priority, "bug reported");
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::ok(BugResponse::from(&bug))),
    ))
}

async fn update_bug(
    State(store): Store,
    Path(id): Path<String>,
    body: Result<JsonOrForm<BugInput>, BodyRejection>,
) -> Result<Json<DataEnvelope<BugResponse>>, ApiError> {
    ensure_object_id(&id)?;
    let JsonOrForm(input) = body?;
    let update = BugUpdate::from(input.into_new_bug()?);
    let bug = store.update_bug(&id, update).await?;
    let bug = format_bug_response(bug.as_ref()).ok_or(ApiError::NotFound)?;
    tracing::info!(id = %bug.id, "bug updated");
    Ok(Json(DataEnvelope::ok(bug)))
}

async fn update_bug_status(
    State(store): Store,
    Path(id): Path<String>,
    body: Result<JsonOrForm<StatusInput>, BodyRejection>,
) -> Result<Json<DataEnvelope<BugResponse>>, ApiError> {
    ensure_object_id(&id)?;
    let JsonOrForm(input) = body?;
    let status = input.parsed().ok_or(ApiError::InvalidStatus)?;
    let bug = store
        .update_bug(&id, BugUpdateBuilder::new().status(status).build())
        .await?;
    let bug = format_bug_response(bug.as_ref()).ok_or(ApiError::NotFound)?;
    tracing::info!(id = %bug.id, %status, "bug status changed");
    Ok(Json(DataEnvelope::ok(bug)))
}

async fn delete_bug(
    State(store): Store,
    Path(id): Path<String>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    ensure_object_id(&id)?;
    let deleted = store.delete_bug(&id).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %deleted.id, "bug deleted");
    Ok(Json(MessageEnvelope {
        success: true,
        message: MSG_BUG_DELETED.to_string(),
    }))
}
