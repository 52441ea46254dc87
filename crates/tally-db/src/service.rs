//! Service layer over [`TallyDb`].
//!
//! All repo methods are implemented as `impl TallyService` blocks in
//! [`crate::repos`]; [`crate::store`] exposes them to the HTTP layer as traits.

use tally_config::DatabaseConfig;

use crate::TallyDb;
use crate::error::DatabaseError;

pub struct TallyService {
    db: TallyDb,
}

impl TallyService {
    /// Open a local database at `db_path` (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(TallyDb::open_local(db_path).await?))
    }

    /// Open the database described by the `[database]` config section.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(TallyDb::open(config).await?))
    }

    #[must_use]
    pub const fn from_db(db: TallyDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TallyDb {
        &self.db
    }
}
