//! Cross-origin request configuration.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty means any origin (`*`).
    ///
    /// Accepts a list, or a single comma-separated string so that
    /// `TALLY_CORS__ALLOWED_ORIGINS=https://a.example,https://b.example` works.
    #[serde(default, deserialize_with = "list_or_csv")]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// True when no explicit origin list is configured.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }

    /// Whether `origin` may receive CORS headers.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.allowed_origins.iter().any(|o| o == origin)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items,
        ListOrCsv::Csv(s) => s.split(',').map(String::from).collect(),
    };
    Ok(raw
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect())
}
