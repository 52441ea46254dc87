//! Agro listing repository: CRUD with an optional owner filter.

use chrono::Utc;

use tally_core::entities::{AgroListing, NewListing};

use crate::TallyDb;
use crate::error::DatabaseError;
use crate::helpers::{format_date, format_timestamp, parse_date, parse_datetime};
use crate::service::TallyService;
use crate::updates::agro::ListingUpdate;

const SELECT_COLS: &str = "id, user_id, name, email, crop_type, quantity, location, harvest_date, created_at, updated_at";

fn row_to_listing(row: &libsql::Row) -> Result<AgroListing, DatabaseError> {
    Ok(AgroListing {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        crop_type: row.get(4)?,
        quantity: row.get(5)?,
        location: row.get(6)?,
        harvest_date: parse_date(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl TallyService {
    pub async fn create_listing(&self, listing: NewListing) -> Result<AgroListing, DatabaseError> {
        let conn = self.db().conn().await?;
        let id = TallyDb::generate_id(&conn).await?;
        let now = format_timestamp(&Utc::now());

        let mut rows = conn
            .query(
                &format!(
                    "INSERT INTO agro_listings (id, user_id, name, email, crop_type, quantity, location, harvest_date, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                     RETURNING {SELECT_COLS}"
                ),
                libsql::params![
                    id.as_str(),
                    listing.user_id.as_str(),
                    listing.name.as_str(),
                    listing.email.as_str(),
                    listing.crop_type.as_str(),
                    listing.quantity,
                    listing.location.as_str(),
                    format_date(&listing.harvest_date),
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let created = row_to_listing(&row)?;
        tracing::debug!(id = %created.id, user_id = %created.user_id, "listing created");
        Ok(created)
    }

    /// Listings, latest harvest first, optionally only those owned by `user_id`.
    pub async fn list_listings(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<AgroListing>, DatabaseError> {
        let conn = self.db().conn().await?;
        let order = "ORDER BY harvest_date DESC, rowid DESC";
        let mut rows = match user_id {
            Some(user_id) => {
                conn.query(
                    &format!("SELECT {SELECT_COLS} FROM agro_listings WHERE user_id = ?1 {order}"),
                    [user_id],
                )
                .await?
            }
            None => {
                conn.query(&format!("SELECT {SELECT_COLS} FROM agro_listings {order}"), ())
                    .await?
            }
        };

        let mut listings = Vec::new();
        while let Some(row) = rows.next().await? {
            listings.push(row_to_listing(&row)?);
        }
        Ok(listings)
    }

    pub async fn get_listing(&self, id: &str) -> Result<Option<AgroListing>, DatabaseError> {
        let conn = self.db().conn().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM agro_listings WHERE id = ?1"),
                [id.to_ascii_lowercase()],
            )
            .await?;
        rows.next().await?.map(|row| row_to_listing(&row)).transpose()
    }

    /// Apply `update` and return the new row, or `None` if no listing has `id`.
    pub async fn update_listing(
        &self,
        id: &str,
        update: ListingUpdate,
    ) -> Result<Option<AgroListing>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        let text_fields = [
            ("user_id", update.user_id),
            ("name", update.name),
            ("email", update.email),
            ("crop_type", update.crop_type),
            ("location", update.location),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                sets.push(format!("{column} = ?{idx}"));
                params.push(value.into());
                idx += 1;
            }
        }
        if let Some(quantity) = update.quantity {
            sets.push(format!("quantity = ?{idx}"));
            params.push(quantity.into());
            idx += 1;
        }
        if let Some(harvest_date) = update.harvest_date {
            sets.push(format!("harvest_date = ?{idx}"));
            params.push(format_date(&harvest_date).into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(format_timestamp(&Utc::now()).into());
        idx += 1;

        params.push(id.to_ascii_lowercase().into());
        let sql = format!(
            "UPDATE agro_listings SET {} WHERE id = ?{idx} RETURNING {SELECT_COLS}",
            sets.join(", ")
        );

        let conn = self.db().conn().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        rows.next().await?.map(|row| row_to_listing(&row)).transpose()
    }

    /// Delete and return the removed listing, or `None` if no listing has `id`.
    pub async fn delete_listing(&self, id: &str) -> Result<Option<AgroListing>, DatabaseError> {
        let conn = self.db().conn().await?;
        let mut rows = conn
            .query(
                &format!("DELETE FROM agro_listings WHERE id = ?1 RETURNING {SELECT_COLS}"),
                [id.to_ascii_lowercase()],
            )
            .await?;
        rows.next().await?.map(|row| row_to_listing(&row)).transpose()
    }
}
