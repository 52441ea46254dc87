//! Storage traits consumed by the HTTP layer.
//!
//! Handlers hold `Arc<dyn BugStore>` / `Arc<dyn AgroStore>`, so tests can swap
//! the libSQL-backed [`TallyService`] for an in-memory double.

use async_trait::async_trait;
use tally_core::entities::{AgroListing, BugReport, NewBug, NewListing};
use tally_core::validation::BugFilter;

use crate::error::DatabaseError;
use crate::service::TallyService;
use crate::updates::agro::ListingUpdate;
use crate::updates::bug::BugUpdate;

#[async_trait]
pub trait BugStore: Send + Sync {
    async fn list_bugs(&self, filter: &BugFilter) -> Result<Vec<BugReport>, DatabaseError>;
    async fn get_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError>;
    async fn create_bug(&self, bug: NewBug) -> Result<BugReport, DatabaseError>;
    async fn update_bug(
        &self,
        id: &str,
        update: BugUpdate,
    ) -> Result<Option<BugReport>, DatabaseError>;
    async fn delete_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError>;
}

#[async_trait]
pub trait AgroStore: Send + Sync {
    async fn list_listings(&self, user_id: Option<&str>)
    -> Result<Vec<AgroListing>, DatabaseError>;
    async fn create_listing(&self, listing: NewListing) -> Result<AgroListing, DatabaseError>;
    async fn update_listing(
        &self,
        id: &str,
        update: ListingUpdate,
    ) -> Result<Option<AgroListing>, DatabaseError>;
    async fn delete_listing(&self, id: &str) -> Result<Option<AgroListing>, DatabaseError>;
}

#[async_trait]
impl BugStore for TallyService {
    async fn list_bugs(&self, filter: &BugFilter) -> Result<Vec<BugReport>, DatabaseError> {
        Self::list_bugs(self, filter).await
    }

    async fn get_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        Self::get_bug(self, id).await
    }

    async fn create_bug(&self, bug: NewBug) -> Result<BugReport, DatabaseError> {
        Self::create_bug(self, bug).await
    }

    async fn update_bug(
        &self,
        id: &str,
        update: BugUpdate,
    ) -> Result<Option<BugReport>, DatabaseError> {
        Self::update_bug(self, id, update).await
    }

    async fn delete_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        Self::delete_bug(self, id).await
    }
}

#[async_trait]
impl AgroStore for TallyService {
    async fn list_listings(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<AgroListing>, DatabaseError> {
        Self::list_listings(self, user_id).await
    }

    async fn create_listing(&self, listing: NewListing) -> Result<AgroListing, DatabaseError> {
        Self::create_listing(self, listing).await
    }

    async fn update_listing(
        &self,
        id: &str,
        update: ListingUpdate,
    ) -> Result<Option<AgroListing>, DatabaseError> {
        Self::update_listing(self, id, update).await
    }

    async fn delete_listing(&self, id: &str) -> Result<Option<AgroListing>, DatabaseError> {
        Self::delete_listing(self, id).await
    }
}
