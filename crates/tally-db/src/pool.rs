//! Bounded connection pool over one libSQL database.
//!
//! A semaphore caps the number of checked-out connections at
//! `database.max_pool_size`; waiting longer than the acquire timeout yields
//! [`DatabaseError::PoolTimeout`]. Released file connections go back on an idle
//! list. An in-memory database exists only per connection, so `:memory:` pools
//! hand out clones of a single shared connection instead.

use std::ops::Deref;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::DatabaseError;

/// How long a file connection waits on a locked database before `SQLITE_BUSY`.
const BUSY_TIMEOUT_MS: u64 = 5000;

pub struct ConnectionPool {
    db: libsql::Database,
    shared: Option<libsql::Connection>,
    idle: Mutex<Vec<libsql::Connection>>,
    permits: Semaphore,
    max_size: usize,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    /// Build a pool. For in-memory databases one connection is opened eagerly.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a zero-sized pool, or the
    /// libSQL error if the shared connection cannot be opened.
    pub fn new(
        db: libsql::Database,
        in_memory: bool,
        max_size: usize,
        acquire_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        if max_size == 0 {
            return Err(DatabaseError::InvalidState(
                "connection pool size must be at least 1".into(),
            ));
        }
        let shared = if in_memory { Some(db.connect()?) } else { None };
        Ok(Self {
            db,
            shared,
            idle: Mutex::new(Vec::with_capacity(max_size)),
            permits: Semaphore::new(max_size),
            max_size,
            acquire_timeout,
        })
    }

    /// Check out a connection, waiting up to the acquire timeout.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::PoolTimeout` if every connection stays busy, or
    /// the libSQL error if a new connection cannot be opened.
    pub async fn acquire(&self) -> Result<PooledConnection<'_>, DatabaseError> {
        let permit = tokio::time::timeout(self.acquire_timeout, self.permits.acquire())
            .await
            .map_err(|_| DatabaseError::PoolTimeout(self.acquire_timeout))?
            .map_err(|_| DatabaseError::InvalidState("connection pool is closed".into()))?;

        let conn = if let Some(shared) = &self.shared {
            shared.clone()
        } else {
            let reused = self.idle.lock().ok().and_then(|mut idle| idle.pop());
            match reused {
                Some(conn) => conn,
                None => self.open_connection().await?,
            }
        };

        Ok(PooledConnection {
            conn,
            pool: self,
            _permit: permit,
        })
    }

    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Connections currently available without waiting.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    async fn open_connection(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.db.connect()?;
        // PRAGMA busy_timeout answers with a row, so it goes through query().
        conn.query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ())
            .await?;
        tracing::debug!("opened pooled database connection");
        Ok(conn)
    }

    fn release(&self, conn: libsql::Connection) {
        if self.shared.is_some() {
            return;
        }
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(conn);
        }
    }
}

/// A checked-out connection. Returned to the pool on drop.
pub struct PooledConnection<'a> {
    conn: libsql::Connection,
    pool: &'a ConnectionPool,
    _permit: SemaphorePermit<'a>,
}

impl Deref for PooledConnection<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        // `Connection` is a reference-counted handle; the clone goes back idle.
        self.pool.release(self.conn.clone());
    }
}
