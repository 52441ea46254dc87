//! Central mapping from handler failures to HTTP responses.
//!
//! The bug tracker answers with [`ErrorEnvelope`] bodies, the agro marketplace
//! with [`AgroMessage`] bodies. Both share the storage-error taxonomy: value
//! problems caught by the schema are the client's fault (400), everything
//! else is a 500 with a generic message.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tally_core::errors::CoreError;
use tally_core::responses::{AgroMessage, ErrorEnvelope};
use tally_db::error::DatabaseError;

use super::body::BodyRejection;
use thiserror::Error;

pub const MSG_SERVER_ERROR: &str = "Server Error";
pub const MSG_INVALID_JSON: &str = "Invalid JSON body";
pub const MSG_PAYLOAD_TOO_LARGE: &str = "Payload Too Large";

/// How a storage failure surfaces to the client.
enum StorageFailure {
    /// Schema constraint rejected a value. Carries the field message.
    Validation(String),
    Duplicate,
    Cast,
    Internal,
}

fn classify(err: &DatabaseError) -> StorageFailure {
    match err {
        DatabaseError::Constraint(msg) => StorageFailure::Validation(msg.clone()),
        DatabaseError::Duplicate(_) => StorageFailure::Duplicate,
        DatabaseError::InvalidValue { .. } => StorageFailure::Cast,
        _ => StorageFailure::Internal,
    }
}

fn log_storage_error(err: &DatabaseError) {
    if err.is_client_error() {
        tracing::warn!(error = %err, "storage rejected request data");
    } else {
        tracing::error!(error = %err, "storage failure");
    }
}

fn is_too_large(rejection: &BodyRejection) -> bool {
    rejection.status() == StatusCode::PAYLOAD_TOO_LARGE
}

// ---------------------------------------------------------------------------
// Bug tracker
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid bug ID format")]
    InvalidId,

    #[error("Bug not found")]
    NotFound,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invalid status value")]
    InvalidStatus,

    #[error("Invalid JSON body: {0}")]
    BadBody(String),

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidId(_) => Self::InvalidId,
            CoreError::Validation(errors) => Self::Validation(errors),
            CoreError::MissingFields => Self::Validation(vec![err.to_string()]),
            CoreError::InvalidValue { .. } => Self::Validation(vec![err.to_string()]),
        }
    }
}

impl From<BodyRejection> for ApiError {
    fn from(rejection: BodyRejection) -> Self {
        if is_too_large(&rejection) {
            Self::PayloadTooLarge
        } else {
            Self::BadBody(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidId | Self::InvalidStatus => {
                (StatusCode::BAD_REQUEST, ErrorEnvelope::new(self.to_string()))
            }
            Self::NotFound => (StatusCode::NOT_FOUND, ErrorEnvelope::new(self.to_string())),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::with_errors("Validation failed", errors),
            ),
            Self::BadBody(text) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::with_errors(MSG_INVALID_JSON, vec![text]),
            ),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorEnvelope::new(MSG_PAYLOAD_TOO_LARGE),
            ),
            Self::Database(err) => {
                log_storage_error(&err);
                match classify(&err) {
                    StorageFailure::Validation(msg) => (
                        StatusCode::BAD_REQUEST,
                        ErrorEnvelope::with_errors("Validation Error", vec![msg]),
                    ),
                    StorageFailure::Duplicate => (
                        StatusCode::BAD_REQUEST,
                        ErrorEnvelope::new("Duplicate field value"),
                    ),
                    StorageFailure::Cast => {
                        (StatusCode::BAD_REQUEST, ErrorEnvelope::new("Invalid ID format"))
                    }
                    StorageFailure::Internal => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorEnvelope::new(MSG_SERVER_ERROR),
                    ),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Agro marketplace
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AgroError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid ID format")]
    InvalidId,

    #[error("Agro entry not found")]
    NotFound,

    /// `quantity` or `harvestDate` could not be cast.
    #[error("{0}")]
    InvalidValue(String),

    #[error("Invalid JSON body: {0}")]
    BadBody(String),

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<CoreError> for AgroError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingFields => Self::MissingFields,
            CoreError::InvalidId(_) => Self::InvalidId,
            CoreError::InvalidValue { .. } | CoreError::Validation(_) => {
                Self::InvalidValue(err.to_string())
            }
        }
    }
}

impl From<BodyRejection> for AgroError {
    fn from(rejection: BodyRejection) -> Self {
        if is_too_large(&rejection) {
            Self::PayloadTooLarge
        } else {
            Self::BadBody(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AgroError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

impl IntoResponse for AgroError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingFields | Self::InvalidId => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::InvalidValue(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::BadBody(_) => (StatusCode::BAD_REQUEST, MSG_INVALID_JSON.to_string()),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                MSG_PAYLOAD_TOO_LARGE.to_string(),
            ),
            Self::Database(err) => {
                log_storage_error(&err);
                match classify(&err) {
                    StorageFailure::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                    StorageFailure::Duplicate => {
                        (StatusCode::BAD_REQUEST, "Duplicate field value".to_string())
                    }
                    StorageFailure::Cast => {
                        (StatusCode::BAD_REQUEST, "Invalid ID format".to_string())
                    }
                    StorageFailure::Internal => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        MSG_SERVER_ERROR.to_string(),
                    ),
                }
            }
        };
        (status, Json(AgroMessage { message })).into_response()
    }
}
