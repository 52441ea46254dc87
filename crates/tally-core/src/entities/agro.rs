use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A produce listing posted by a farmer.
///
/// Field names follow the marketplace wire format, including the capitalised
/// `Name` and `Email` keys.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AgroListing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "cropType")]
    pub crop_type: String,
    pub quantity: f64,
    pub location: String,
    #[serde(rename = "harvestDate")]
    pub harvest_date: NaiveDate,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A listing with every required field present, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub crop_type: String,
    pub quantity: f64,
    pub location: String,
    pub harvest_date: NaiveDate,
}
