//! Request body types and the field rules applied to them.
//!
//! Bodies arrive as structural types with every field optional. Bug bodies go
//! through [`sanitize_bug_data`] then [`validate_bug_data`]; only a body that
//! passes both becomes a [`NewBug`]. Agro bodies only need every field to be
//! present, plus a cast of `quantity` and `harvestDate` to their stored types.
//!
//! Message strings and their order are part of the API: clients assert on the
//! exact text of individual errors.

use chrono::{DateTime, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{NewBug, NewListing};
use crate::enums::{BugPriority, BugStatus};
use crate::errors::CoreError;

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MIN_LEN: usize = 10;

pub const MSG_TITLE_REQUIRED: &str = "Title is required";
pub const MSG_TITLE_TOO_SHORT: &str = "Title must be at least 3 characters long";
pub const MSG_TITLE_TOO_LONG: &str = "Title cannot exceed 100 characters";
pub const MSG_DESCRIPTION_REQUIRED: &str = "Description is required";
pub const MSG_DESCRIPTION_TOO_SHORT: &str = "Description must be at least 10 characters long";
pub const MSG_REPORTER_REQUIRED: &str = "Reporter name is required";
pub const MSG_INVALID_STATUS: &str = "Invalid status value";
pub const MSG_INVALID_PRIORITY: &str = "Invalid priority value";

// ---------------------------------------------------------------------------
// Bug bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/bugs` and `PUT /api/bugs/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BugInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Body of `PATCH /api/bugs/:id/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusInput {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusInput {
    /// The requested status, if it is one of the enumerated values.
    #[must_use]
    pub fn parsed(&self) -> Option<BugStatus> {
        self.status.as_deref().and_then(BugStatus::parse)
    }
}

/// Query of `GET /api/bugs`: optional equality filters, combined with AND.
///
/// Values are compared against stored text as-is, so an unknown status simply
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BugFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl BugFilter {
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        non_empty(self.priority.as_deref())
    }
}

/// Outcome of [`validate_bug_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Trim `title`, `description` and `reportedBy`. Enum fields pass through.
#[must_use]
pub fn sanitize_bug_data(input: &BugInput) -> BugInput {
    BugInput {
        title: input.title.as_deref().map(|s| trim_text(s).to_string()),
        description: input.description.as_deref().map(|s| trim_text(s).to_string()),
        reported_by: input.reported_by.as_deref().map(|s| trim_text(s).to_string()),
        status: input.status.clone(),
        priority: input.priority.clone(),
    }
}

/// Run every bug field rule and collect the failures in rule order.
///
/// Each field stops at its first failing rule; fields are independent.
#[must_use]
pub fn validate_bug_data(input: &BugInput) -> ValidationReport {
    let mut errors = Vec::new();

    let title_len = trimmed_len(input.title.as_deref());
    if title_len == 0 {
        errors.push(MSG_TITLE_REQUIRED);
    } else if title_len < TITLE_MIN_LEN {
        errors.push(MSG_TITLE_TOO_SHORT);
    } else if title_len > TITLE_MAX_LEN {
        errors.push(MSG_TITLE_TOO_LONG);
    }

    let description_len = trimmed_len(input.description.as_deref());
    if description_len == 0 {
        errors.push(MSG_DESCRIPTION_REQUIRED);
    } else if description_len < DESCRIPTION_MIN_LEN {
        errors.push(MSG_DESCRIPTION_TOO_SHORT);
    }

    if trimmed_len(input.reported_by.as_deref()) == 0 {
        errors.push(MSG_REPORTER_REQUIRED);
    }

    if let Some(status) = non_empty(input.status.as_deref()) {
        if BugStatus::parse(status).is_none() {
            errors.push(MSG_INVALID_STATUS);
        }
    }

    if let Some(priority) = non_empty(input.priority.as_deref()) {
        if BugPriority::parse(priority).is_none() {
            errors.push(MSG_INVALID_PRIORITY);
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors: errors.into_iter().map(String::from).collect(),
    }
}

impl BugInput {
    /// Sanitize, validate, and convert into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` carrying every failed rule's message.
    pub fn into_new_bug(self) -> Result<NewBug, CoreError> {
        let clean = sanitize_bug_data(&self);
        let report = validate_bug_data(&clean);
        if !report.is_valid {
            return Err(CoreError::Validation(report.errors));
        }

        Ok(NewBug {
            title: clean.title.unwrap_or_default(),
            description: clean.description.unwrap_or_default(),
            reported_by: clean.reported_by.unwrap_or_default(),
            status: non_empty(clean.status.as_deref()).and_then(BugStatus::parse),
            priority: non_empty(clean.priority.as_deref()).and_then(BugPriority::parse),
        })
    }
}

/// Whitespace as ECMAScript `String.prototype.trim` defines it: Unicode
/// `White_Space` minus U+0085 NEXT LINE, plus U+FEFF BYTE ORDER MARK.
fn is_trimmed(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Strip leading and trailing whitespace from a text field.
#[must_use]
pub fn trim_text(s: &str) -> &str {
    s.trim_matches(is_trimmed)
}

fn trimmed_len(value: Option<&str>) -> usize {
    value.map_or(0, |s| trim_text(s).chars().count())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Agro bodies
// ---------------------------------------------------------------------------

/// A numeric field that may arrive as a JSON number or a numeric string
/// (HTML form values are strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Empty text and zero count as "not provided".
    fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0.0,
            Self::Text(s) => s.is_empty(),
        }
    }

    fn to_f64(&self) -> Result<f64, CoreError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| CoreError::invalid_value("quantity", format!("'{s}' is not a number"))),
        }
    }
}

/// Body of `POST /api/agro/add` and `PUT /api/agro/update/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgroInput {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "cropType", default, skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "harvestDate", default, skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<String>,
}

/// Body of `POST /api/agro` (and query of `GET /api/agro`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AgroListFilter {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

impl AgroListFilter {
    /// The owner to filter by; an empty string means no filter.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        non_empty(self.user_id.as_deref())
    }
}

impl AgroInput {
    /// True when every field required on create is present and non-blank.
    #[must_use]
    pub fn has_all_fields(&self) -> bool {
        [
            &self.user_id,
            &self.name,
            &self.email,
            &self.crop_type,
            &self.location,
            &self.harvest_date,
        ]
        .iter()
        .all(|field| non_empty(field.as_deref()).is_some())
            && self.quantity.as_ref().is_some_and(|q| !q.is_blank())
    }

    /// `quantity` cast to a number, if supplied.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` for text that is not a finite number.
    pub fn quantity(&self) -> Result<Option<f64>, CoreError> {
        self.quantity.as_ref().map(NumberOrText::to_f64).transpose()
    }

    /// `harvestDate` cast to a calendar date, if supplied.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` when the text is neither `YYYY-MM-DD`
    /// nor an RFC 3339 timestamp.
    pub fn harvest_date(&self) -> Result<Option<NaiveDate>, CoreError> {
        self.harvest_date.as_deref().map(parse_harvest_date).transpose()
    }

    /// Check presence of all seven fields and convert into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingFields` if any field is absent or blank, and
    /// `CoreError::InvalidValue` if `quantity` or `harvestDate` cannot be cast.
    pub fn into_new_listing(self) -> Result<NewListing, CoreError> {
        if !self.has_all_fields() {
            return Err(CoreError::MissingFields);
        }
        let quantity = self.quantity()?.ok_or(CoreError::MissingFields)?;
        let harvest_date = self.harvest_date()?.ok_or(CoreError::MissingFields)?;

        Ok(NewListing {
            user_id: self.user_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            crop_type: self.crop_type.unwrap_or_default(),
            quantity,
            location: self.location.unwrap_or_default(),
            harvest_date,
        })
    }
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its date.
///
/// # Errors
///
/// Returns `CoreError::InvalidValue` for any other shape.
pub fn parse_harvest_date(s: &str) -> Result<NaiveDate, CoreError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| CoreError::invalid_value("harvestDate", format!("'{s}' is not a date")))
}
