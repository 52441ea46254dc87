//! Agro listing update builder.

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::errors::CoreError;
use tally_core::validation::AgroInput;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
}

impl ListingUpdate {
    /// Take every supplied field of an update body, casting `quantity` and
    /// `harvestDate`. Absent fields stay untouched.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` if a supplied `quantity` or
    /// `harvestDate` cannot be cast.
    pub fn from_input(input: AgroInput) -> Result<Self, CoreError> {
        let quantity = input.quantity()?;
        let harvest_date = input.harvest_date()?;
        Ok(Self {
            user_id: input.user_id,
            name: input.name,
            email: input.email,
            crop_type: input.crop_type,
            quantity,
            location: input.location,
            harvest_date,
        })
    }
}

pub struct ListingUpdateBuilder(ListingUpdate);

impl ListingUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ListingUpdate::default())
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.0.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.0.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn crop_type(mut self, crop_type: impl Into<String>) -> Self {
        self.0.crop_type = Some(crop_type.into());
        self
    }

    #[must_use]
    pub const fn quantity(mut self, quantity: f64) -> Self {
        self.0.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.0.location = Some(location.into());
        self
    }

    #[must_use]
    pub const fn harvest_date(mut self, harvest_date: NaiveDate) -> Self {
        self.0.harvest_date = Some(harvest_date);
        self
    }

    #[must_use]
    pub fn build(self) -> ListingUpdate {
        self.0
    }
}

impl Default for ListingUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
