//! Bug report repository: CRUD with filtered, newest-first listing.

use chrono::Utc;

use tally_core::entities::{BugReport, NewBug};
use tally_core::validation::BugFilter;

use crate::TallyDb;
use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, parse_datetime, parse_enum};
use crate::service::TallyService;
use crate::updates::bug::BugUpdate;

const SELECT_COLS: &str =
    "id, title, description, status, priority, reported_by, created_at, updated_at";

fn row_to_bug(row: &libsql::Row) -> Result<BugReport, DatabaseError> {
    Ok(BugReport {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        priority: parse_enum(&row.get::<String>(4)?)?,
        reported_by: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl TallyService {
    /// Insert a bug. Absent status/priority take the defaults (`open`, `medium`).
    pub async fn create_bug(&self, bug: NewBug) -> Result<BugReport, DatabaseError> {
        let conn = self.db().conn().await?;
        let id = TallyDb::generate_id(&conn).await?;
        let now = format_timestamp(&Utc::now());

        let mut rows = conn
            .query(
                &format!(
                    "INSERT INTO bugs (id, title, description, status, priority, reported_by, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     RETURNING {SELECT_COLS}"
                ),
                libsql::params![
                    id.as_str(),
                    bug.title.as_str(),
                    bug.description.as_str(),
                    bug.status.unwrap_or_default().as_str(),
                    bug.priority.unwrap_or_default().as_str(),
                    bug.reported_by.as_str(),
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let created = row_to_bug(&row)?;
        tracing::debug!(id = %created.id, "bug created");
        Ok(created)
    }

    pub async fn get_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        let conn = self.db().conn().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM bugs WHERE id = ?1"),
                [id.to_ascii_lowercase()],
            )
            .await?;
        rows.next().await?.map(|row| row_to_bug(&row)).transpose()
    }

    /// All bugs matching `filter`, newest first.
    pub async fn list_bugs(&self, filter: &BugFilter) -> Result<Vec<BugReport>, DatabaseError> {
        let mut clauses = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status() {
            params.push(status.into());
            clauses.push(format!("status = ?{}", params.len()));
        }
        if let Some(priority) = filter.priority() {
            params.push(priority.into());
            clauses.push(format!("priority = ?{}", params.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {SELECT_COLS} FROM bugs {where_clause} ORDER BY created_at DESC, rowid DESC"
        );

        let conn = self.db().conn().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut bugs = Vec::new();
        while let Some(row) = rows.next().await? {
            bugs.push(row_to_bug(&row)?);
        }
        Ok(bugs)
    }

    /// Apply `update` and return the new row, or `None` if no bug has `id`.
    pub async fn update_bug(
        &self,
        id: &str,
        update: BugUpdate,
    ) -> Result<Option<BugReport>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.into());
            idx += 1;
        }
        if let Some(description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.into());
            idx += 1;
        }
        if let Some(reported_by) = update.reported_by {
            sets.push(format!("reported_by = ?{idx}"));
            params.push(reported_by.into());
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(priority) = update.priority {
            sets.push(format!("priority = ?{idx}"));
            params.push(priority.as_str().into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(format_timestamp(&Utc::now()).into());
        idx += 1;

        params.push(id.to_ascii_lowercase().into());
        let sql = format!(
            "UPDATE bugs SET {} WHERE id = ?{idx} RETURNING {SELECT_COLS}",
            sets.join(", ")
        );

        let conn = self.db().conn().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        rows.next().await?.map(|row| row_to_bug(&row)).transpose()
    }

    /// Delete and return the removed bug, or `None` if no bug has `id`.
    pub async fn delete_bug(&self, id: &str) -> Result<Option<BugReport>, DatabaseError> {
        let conn = self.db().conn().await?;
        let mut rows = conn
            .query(
                &format!("DELETE FROM bugs WHERE id = ?1 RETURNING {SELECT_COLS}"),
                [id.to_ascii_lowercase()],
            )
            .await?;
        rows.next().await?.map(|row| row_to_bug(&row)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{new_bug, test_service};
    use crate::updates::bug::BugUpdateBuilder;
    use pretty_assertions::assert_eq;
    use tally_core::enums::{BugPriority, BugStatus};
    use tally_core::ids::is_valid_object_id;

    fn filter(status: Option<&str>, priority: Option<&str>) -> BugFilter {
        BugFilter {
            status: status.map(String::from),
            priority: priority.map(String::from),
        }
    }

    #[tokio::test]
    async fn create_bug_applies_defaults() {
        let svc = test_service().await;
        let bug = svc.create_bug(new_bug("Login broken")).await.unwrap();

        assert!(is_valid_object_id(&bug.id));
        assert_eq!(bug.status, BugStatus::Open);
        assert_eq!(bug.priority, BugPriority::Medium);
        assert_eq!(bug.created_at, bug.updated_at);

        let fetched = svc.get_bug(&bug.id).await.unwrap().unwrap();
        assert_eq!(fetched, bug);
    }

    #[tokio::test]
    async fn get_bug_missing_is_none() {
        let svc = test_service().await;
        assert!(svc.get_bug("507f1f77bcf86cd799439011").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_bug_accepts_uppercase_id() {
        let svc = test_service().await;
        let bug = svc.create_bug(new_bug("Upper case id")).await.unwrap();
        let fetched = svc.get_bug(&bug.id.to_ascii_uppercase()).await.unwrap();
        assert_eq!(fetched.map(|b| b.id), Some(bug.id));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let svc = test_service().await;
        let first = svc.create_bug(new_bug("First bug")).await.unwrap();
        let second = svc.create_bug(new_bug("Second bug")).await.unwrap();
        let third = svc.create_bug(new_bug("Third bug")).await.unwrap();

        let ids: Vec<String> = svc
            .list_bugs(&BugFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn list_filters_combine_with_and() {
        let svc = test_service().await;
        let mut a = new_bug("Open and high");
        a.priority = Some(BugPriority::High);
        let a = svc.create_bug(a).await.unwrap();
        let mut b = new_bug("Resolved and high");
        b.status = Some(BugStatus::Resolved);
        b.priority = Some(BugPriority::High);
        svc.create_bug(b).await.unwrap();
        svc.create_bug(new_bug("Open and medium")).await.unwrap();

        let found = svc.list_bugs(&filter(Some("open"), Some("high"))).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);

        assert_eq!(svc.list_bugs(&filter(None, Some("high"))).await.unwrap().len(), 2);
        assert_eq!(svc.list_bugs(&filter(Some("open"), None)).await.unwrap().len(), 2);
        assert!(svc.list_bugs(&filter(Some("closed"), None)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_status_only_touches_status() {
        let svc = test_service().await;
        let bug = svc.create_bug(new_bug("Status change")).await.unwrap();

        let updated = svc
            .update_bug(&bug.id, BugUpdateBuilder::new().status(BugStatus::InProgress).build())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BugStatus::InProgress);
        assert_eq!(updated.title, bug.title);
        assert_eq!(updated.priority, bug.priority);
        assert_eq!(updated.created_at, bug.created_at);
        assert!(updated.updated_at >= bug.updated_at);
    }

    #[tokio::test]
    async fn put_keeps_unsupplied_enums() {
        let svc = test_service().await;
        let mut original = new_bug("Keep my priority");
        original.priority = Some(BugPriority::Critical);
        let bug = svc.create_bug(original).await.unwrap();

        let replacement = new_bug("Renamed title");
        let updated = svc
            .update_bug(&bug.id, BugUpdate::from(replacement))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed title");
        assert_eq!(updated.priority, BugPriority::Critical);
        assert_eq!(updated.status, BugStatus::Open);
    }

    #[tokio::test]
    async fn update_missing_is_none() {
        let svc = test_service().await;
        let result = svc
            .update_bug(
                "507f1f77bcf86cd799439011",
                BugUpdateBuilder::new().title("Nothing here").build(),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_violating_check_is_constraint_error() {
        let svc = test_service().await;
        let bug = svc.create_bug(new_bug("Valid title")).await.unwrap();
        let err = svc
            .update_bug(&bug.id, BugUpdateBuilder::new().description("short").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint(_)), "{err:?}");
    }

    #[tokio::test]
    async fn delete_returns_removed_bug() {
        let svc = test_service().await;
        let bug = svc.create_bug(new_bug("Delete me")).await.unwrap();

        let deleted = svc.delete_bug(&bug.id).await.unwrap();
        assert_eq!(deleted.map(|b| b.id), Some(bug.id.clone()));
        assert!(svc.get_bug(&bug.id).await.unwrap().is_none());
        assert!(svc.delete_bug(&bug.id).await.unwrap().is_none());
    }
}
