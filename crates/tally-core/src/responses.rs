//! Wire response types returned as JSON by the Tally HTTP services.
//!
//! The bug tracker wraps every body in an envelope (`success` plus `data`,
//! `message` or `error`/`errors`). The agro marketplace returns raw stored
//! documents and `{message}` objects for failures.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::BugReport;
use crate::enums::{BugPriority, BugStatus};

/// Wire representation of a bug report: the storage `_id` becomes `id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BugResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub priority: BugPriority,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Convert a stored bug into its wire form. `None` stays `None`.
#[must_use]
pub fn format_bug_response(bug: Option<&BugReport>) -> Option<BugResponse> {
    bug.map(BugResponse::from)
}

impl From<&BugReport> for BugResponse {
    fn from(bug: &BugReport) -> Self {
        Self {
            id: bug.id.clone(),
            title: bug.title.clone(),
            description: bug.description.clone(),
            status: bug.status,
            priority: bug.priority,
            reported_by: bug.reported_by.clone(),
            created_at: bug.created_at,
            updated_at: bug.updated_at,
        }
    }
}

/// `{success: true, data}` from single-bug endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{success: true, count, data: [...]}` from `GET /api/bugs`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ListEnvelope<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    #[must_use]
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// `{success: true, message}` from `DELETE /api/bugs/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

/// `{success: false, error, errors?}` from any failing bug-tracker request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            errors: None,
        }
    }

    pub fn with_errors(error: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            errors: Some(errors),
        }
    }
}

/// `{message}` body used by the agro marketplace for failures.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AgroMessage {
    pub message: String,
}

/// Body of `GET /` when the bug tracker is served.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LivenessResponse {
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the process started serving.
    pub uptime: f64,
    /// Unix time in milliseconds.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bug() -> BugReport {
        let now = Utc::now();
        BugReport {
            id: "507f1f77bcf86cd799439011".into(),
            title: "Login broken".into(),
            description: "Clicking login does nothing".into(),
            status: BugStatus::InProgress,
            priority: BugPriority::High,
            reported_by: "Jane".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn none_formats_to_none() {
        assert_eq!(format_bug_response(None), None);
    }

    #[test]
    fn formatted_bug_renames_storage_id() {
        let bug = sample_bug();
        let formatted = format_bug_response(Some(&bug)).unwrap();
        assert_eq!(formatted.id, bug.id);

        let json = serde_json::to_value(&formatted).unwrap();
        assert!(json.get("_id").is_none());
        assert_eq!(json["id"], "507f1f77bcf86cd799439011");
        assert_eq!(json["reportedBy"], "Jane");
        assert_eq!(json["status"], "in-progress");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn stored_bug_uses_storage_id_key() {
        let json = serde_json::to_value(sample_bug()).unwrap();
        assert_eq!(json["_id"], "507f1f77bcf86cd799439011");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn list_envelope_counts_items() {
        let env = ListEnvelope::ok(vec![1, 2, 3]);
        assert!(env.success);
        assert_eq!(env.count, 3);
    }

    #[test]
    fn error_envelope_omits_absent_errors() {
        let json = serde_json::to_value(ErrorEnvelope::new("Bug not found")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "Bug not found"}));

        let json = serde_json::to_value(ErrorEnvelope::with_errors(
            "Validation failed",
            vec!["Title is required".into()],
        ))
        .unwrap();
        assert_eq!(json["errors"][0], "Title is required");
    }
}
