//! `/api/agro` handlers.
//!
//! Responses are the stored listing documents themselves (no envelope); failures
//! are `{message}` objects.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tally_core::entities::AgroListing;
use tally_core::ids::ensure_object_id;
use tally_core::validation::{AgroInput, AgroListFilter};
use tally_db::store::AgroStore;
use tally_db::updates::agro::ListingUpdate;

use super::body::{BodyRejection, JsonBody};
use super::error::AgroError;

type Store = State<Arc<dyn AgroStore>>;

pub fn routes(store: Arc<dyn AgroStore>) -> Router {
    Router::new()
        .route("/api/agro", get(list_by_query).post(list_by_body))
        .route("/api/agro/add", post(create_listing))
        .route("/api/agro/update/:id", put(update_listing))
        .route("/api/agro/delete/:id", delete(delete_listing))
        .with_state(store)
}

async fn list(
    store: &dyn AgroStore,
    filter: &AgroListFilter,
) -> Result<Json<Vec<AgroListing>>, AgroError> {
    let listings = store.list_listings(filter.user_id()).await?;
    tracing::debug!(count = listings.len(), user_id = ?filter.user_id(), "listed produce");
    Ok(Json(listings))
}

async fn list_by_query(
    State(store): Store,
    query: Result<Query<AgroListFilter>, QueryRejection>,
) -> Result<Json<Vec<AgroListing>>, AgroError> {
    let Query(filter) = query?;
    list(store.as_ref(), &filter).await
}

/// An empty or non-JSON body lists everything.
async fn list_by_body(
    State(store): Store,
    body: Result<JsonBody<AgroListFilter>, BodyRejection>,
) -> Result<Json<Vec<AgroListing>>, AgroError> {
    let JsonBody(filter) = body?;
    list(store.as_ref(), &filter).await
}

async fn create_listing(
    State(store): Store,
    body: Result<JsonBody<AgroInput>, BodyRejection>,
) -> Result<(StatusCode, Json<AgroListing>), AgroError> {
    let JsonBody(input) = body?;
    let listing = store.create_listing(input.into_new_listing()?).await?;
    tracing::info!(id = %listing.id, crop = %listing.crop_type, "produce listed");
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn update_listing(
    State(store): Store,
    Path(id): Path<String>,
    body: Result<JsonBody<AgroInput>, BodyRejection>,
) -> Result<Json<AgroListing>, AgroError> {
    ensure_object_id(&id)?;
    let JsonBody(input) = body?;
    let update = ListingUpdate::from_input(input)?;
    let listing = store
        .update_listing(&id, update)
        .await?
        .ok_or(AgroError::NotFound)?;
    tracing::info!(id = %listing.id, "listing updated");
    Ok(Json(listing))
}

async fn delete_listing(
    State(store): Store,
    Path(id): Path<String>,
) -> Result<Json<AgroListing>, AgroError> {
    ensure_object_id(&id)?;
    let listing = store
        .delete_listing(&id)
        .await?
        .ok_or(AgroError::NotFound)?;
    tracing::info!(id = %listing.id, "listing deleted");
    Ok(Json(listing))
}
