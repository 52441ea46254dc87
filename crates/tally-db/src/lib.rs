//! # tally-db
//!
//! libSQL storage for Tally: bug reports and agro listings.
//!
//! One table per entity, with named `CHECK` constraints mirroring the request
//! validation rules. Connections come from a bounded [`pool::ConnectionPool`];
//! every repository method checks out one connection and runs one statement
//! (writes use `INSERT/UPDATE/DELETE ... RETURNING`).
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod error;
pub mod helpers;
mod migrations;
pub mod pool;
pub mod repos;
pub mod service;
pub mod store;
pub mod updates;

mod test_support;

use error::DatabaseError;
use libsql::Builder;
use pool::{ConnectionPool, PooledConnection};
use tally_config::DatabaseConfig;

/// Central database handle.
///
/// Owns the connection pool and runs migrations on open.
pub struct TallyDb {
    pool: ConnectionPool,
}

impl TallyDb {
    /// Open a local database at `path` with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the database described by `config` and run migrations.
    ///
    /// File databases are switched to WAL so readers do not block the writer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, the pool is
    /// misconfigured, or migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(&config.path).build().await?;
        let pool = ConnectionPool::new(
            db,
            config.is_in_memory(),
            config.max_pool_size,
            config.acquire_timeout(),
        )?;
        let tally_db = Self { pool };

        if !config.is_in_memory() {
            let conn = tally_db.conn().await?;
            conn.query("PRAGMA journal_mode = WAL", ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA journal_mode: {e}")))?;
        }

        tally_db.run_migrations().await?;
        tracing::info!(path = %config.path, pool = config.max_pool_size, "database ready");
        Ok(tally_db)
    }

    /// Check out a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::PoolTimeout` when no connection frees up in time.
    pub async fn conn(&self) -> Result<PooledConnection<'_>, DatabaseError> {
        self.pool.acquire().await
    }

    #[must_use]
    pub const fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Mint an ObjectId-shaped identifier via libSQL.
    ///
    /// 8 hex chars of the current Unix time in seconds, then `randomblob(8)`
    /// as 16 lowercase hex chars. Returns e.g. `"65c4a1f0e4b0a1b2c3d4e5f6"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(conn: &libsql::Connection) -> Result<String, DatabaseError> {
        let mut rows = conn
            .query(
                "SELECT printf('%08x', CAST(strftime('%s', 'now') AS INTEGER)) || lower(hex(randomblob(8)))",
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tally_core::ids::is_valid_object_id;

    async fn test_db() -> TallyDb {
        TallyDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let conn = db.conn().await.unwrap();

        for table in ["bugs", "agro_listings"] {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_is_object_id_shaped() {
        let db = test_db().await;
        let conn = db.conn().await.unwrap();
        let id = TallyDb::generate_id(&conn).await.unwrap();

        assert!(is_valid_object_id(&id), "not an object id: {id}");
        assert_eq!(id, id.to_ascii_lowercase());

        let secs = u32::from_str_radix(&id[..8], 16).unwrap();
        let now = u32::try_from(chrono::Utc::now().timestamp()).unwrap();
        assert!(now.abs_diff(secs) <= 5, "timestamp prefix {secs} vs now {now}");
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let conn = db.conn().await.unwrap();
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = TallyDb::generate_id(&conn).await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn check_constraints_guard_bug_rows() {
        let db = test_db().await;
        let conn = db.conn().await.unwrap();

        let err = conn
            .execute(
                "INSERT INTO bugs (id, title, description, status, priority, reported_by, created_at, updated_at)
                 VALUES ('a', 'Valid title', 'Long enough text', 'closed', 'low', 'Jane', 'x', 'x')",
                (),
            )
            .await
            .unwrap_err();
        let err = DatabaseError::from(err);
        assert!(
            matches!(err, DatabaseError::Constraint(ref msg) if msg == "Invalid status value"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.db");
        let path = path.to_str().unwrap();

        {
            let db = TallyDb::open_local(path).await.unwrap();
            let conn = db.conn().await.unwrap();
            conn.execute(
                "INSERT INTO agro_listings (id, user_id, name, email, crop_type, quantity, location, harvest_date, created_at, updated_at)
                 VALUES ('65c4a1f0e4b0a1b2c3d4e5f6', 'u1', 'Kamau', 'k@example.com', 'Tea', 5.0, 'Kericho', '2024-01-02', 'x', 'x')",
                (),
            )
            .await
            .unwrap();
        }

        let db = TallyDb::open_local(path).await.unwrap();
        let conn = db.conn().await.unwrap();
        let mut rows = conn
            .query("SELECT count(*) FROM agro_listings", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
