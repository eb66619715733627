use serde::{Deserialize, Serialize};

/// One repository as returned by the search endpoint.
///
/// Only the fields the UI shows are kept; everything else in the API payload
/// is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    /// `owner/name`.
    pub full_name: Option<String>,
    pub description: Option<String>,
    /// Primary language tag.
    pub language: Option<String>,
    #[serde(rename = "stargazers_count")]
    pub stars: Option<u64>,
    /// ISO-8601 timestamp of the last update.
    pub updated_at: Option<String>,
    pub html_url: Option<String>,
}

impl RepositorySummary {
    /// Minimal summary, mostly useful for tests and fakes.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            full_name: None,
            description: None,
            language: None,
            stars: None,
            updated_at: None,
            html_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stars = Some(stars);
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }
}

/// Body of `GET /search/repositories`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    pub total_count: Option<u64>,
    /// Absent or `null` when the endpoint has nothing to return.
    pub items: Option<Vec<RepositorySummary>>,
}

impl SearchResponse {
    pub fn into_items(self) -> Vec<RepositorySummary> {
        self.items.unwrap_or_default()
    }
}
