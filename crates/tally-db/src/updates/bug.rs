//! Bug report update builder.

use serde::Serialize;
use tally_core::entities::NewBug;
use tally_core::enums::{BugPriority, BugStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BugUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BugStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<BugPriority>,
}

/// A validated PUT body: the three text fields are always written, enums only
/// when supplied.
impl From<NewBug> for BugUpdate {
    fn from(bug: NewBug) -> Self {
        Self {
            title: Some(bug.title),
            description: Some(bug.description),
            reported_by: Some(bug.reported_by),
            status: bug.status,
            priority: bug.priority,
        }
    }
}

pub struct BugUpdateBuilder(BugUpdate);

impl BugUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(BugUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn reported_by(mut self, reported_by: impl Into<String>) -> Self {
        self.0.reported_by = Some(reported_by.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: BugStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: BugPriority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn build(self) -> BugUpdate {
        self.0
    }
}

impl Default for BugUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_only_named_fields() {
        let update = BugUpdateBuilder::new().status(BugStatus::Resolved).build();
        assert_eq!(update.status, Some(BugStatus::Resolved));
        assert_eq!(update.title, None);

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"status": "resolved"}));
    }

    #[test]
    fn put_body_keeps_absent_enums_absent() {
        let update = BugUpdate::from(NewBug {
            title: "Crash".into(),
            description: "Crashes on every launch".into(),
            reported_by: "Jane".into(),
            status: None,
            priority: Some(BugPriority::High),
        });
        assert_eq!(update.title.as_deref(), Some("Crash"));
        assert_eq!(update.status, None);
        assert_eq!(update.priority, Some(BugPriority::High));
    }
}
