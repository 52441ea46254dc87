//! Database error types for tally-db.
//!
//! libSQL reports constraint failures as plain `SQLite` messages. The
//! `From<libsql::Error>` impl sorts them into [`DatabaseError::Constraint`],
//! [`DatabaseError::Duplicate`] and [`DatabaseError::InvalidValue`] so the HTTP
//! layer can answer 400 instead of 500.

use std::time::Duration;

use tally_core::validation::{
    MSG_DESCRIPTION_TOO_SHORT, MSG_INVALID_PRIORITY, MSG_INVALID_STATUS, MSG_REPORTER_REQUIRED,
};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No pooled connection became free within the acquire timeout.
    #[error("Timed out after {0:?} waiting for a database connection")]
    PoolTimeout(Duration),

    /// A `CHECK` or `NOT NULL` constraint rejected the row. Carries a field message.
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// A `UNIQUE` or primary key constraint rejected the row.
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// A value could not be stored as its column type.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Any other libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(libsql::Error),
}

impl DatabaseError {
    /// True for failures caused by the stored values rather than the database.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Constraint(_) | Self::Duplicate(_) | Self::InvalidValue { .. }
        )
    }
}

impl From<libsql::Error> for DatabaseError {
    fn from(err: libsql::Error) -> Self {
        let message = err.to_string();

        if let Some(name) = detail_after(&message, "CHECK constraint failed: ") {
            return Self::Constraint(check_message(name));
        }
        if let Some(column) = detail_after(&message, "NOT NULL constraint failed: ") {
            let field = column.rsplit('.').next().unwrap_or(column);
            return Self::Constraint(format!("{field} is required"));
        }
        if let Some(column) = detail_after(&message, "UNIQUE constraint failed: ") {
            return Self::Duplicate(column.to_string());
        }
        if message.contains("datatype mismatch") {
            return Self::InvalidValue {
                field: "value".to_string(),
                reason: "datatype mismatch".to_string(),
            };
        }
        Self::LibSql(err)
    }
}

/// The identifier following `marker`, e.g. a constraint name or `table.column`.
fn detail_after<'a>(message: &'a str, marker: &str) -> Option<&'a str> {
    let start = message.find(marker)? + marker.len();
    let rest = &message[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Field message for a named `CHECK` constraint from `001_initial.sql`.
fn check_message(name: &str) -> String {
    match name {
        "bug_title_length" => "Title must be between 3 and 100 characters".to_string(),
        "bug_description_length" => MSG_DESCRIPTION_TOO_SHORT.to_string(),
        "bug_status_value" => MSG_INVALID_STATUS.to_string(),
        "bug_priority_value" => MSG_INVALID_PRIORITY.to_string(),
        "bug_reporter_present" => MSG_REPORTER_REQUIRED.to_string(),
        "agro_harvest_date_format" => "harvestDate must be a calendar date".to_string(),
        other => format!("{other} failed"),
    }
}
