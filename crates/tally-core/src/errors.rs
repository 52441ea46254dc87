//! Cross-cutting error types for Tally.
//!
//! Storage errors (`DatabaseError`) live in `tally-db` and HTTP mapping
//! (`ApiError`) in `tally-server`. This module covers failures raised while
//! turning free-form request input into typed records.

use thiserror::Error;

/// Errors raised while checking or converting request input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identifier is not a 24-character hex string.
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Bug field validation failed. Messages are in rule order.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// One or more required fields are absent.
    #[error("All fields are required")]
    MissingFields,

    /// A field is present but cannot be cast to its stored type.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl CoreError {
    /// Build an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
