use serde::{Deserialize, Serialize};

use crate::error::WatchError;

/// Placeholder the metadata API uses for missing fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// A user-supplied title. Always non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Result<Self, WatchError> {
        let t = raw.trim();
        if t.is_empty() { return Err(WatchError::Validation); }
        Ok(Self(t.to_string()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

/// Authoritative record for a title, as returned by the metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMedia {
    pub title: String,
    pub year: String,
    /// `"N/A"` when the source has no IMDb rating.
    pub imdb_rating: String,
    /// `"N/A"` when the source has no Rotten Tomatoes entry.
    pub rotten_tomatoes_rating: String,
    pub plot: String,
    pub poster_url: String,
    pub imdb_id: Option<String>,
    /// movie / series / episode
    pub kind: Option<String>,
}

impl CanonicalMedia {
    pub fn poster(&self) -> Option<&str> {
        let p = self.poster_url.trim();
        (!p.is_empty() && p != NOT_AVAILABLE).then_some(p)
    }
}

/// One scraped result link, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub label: String,
    pub url: String,
}

impl RawCandidate {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self { label: label.into(), url: url.into() }
    }
}

/// Ranked, capped candidates for one source. Only built by [`crate::rank::rank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidateList {
    source: String,
    entries: Vec<RawCandidate>,
}

impl RankedCandidateList {
    pub(crate) fn new(source: impl Into<String>, entries: Vec<RawCandidate>) -> Self {
        Self { source: source.into(), entries }
    }

    pub fn source(&self) -> &str { &self.source }
    pub fn entries(&self) -> &[RawCandidate] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// True when nothing relevant survived; the reply shows a placeholder.
    pub fn no_results(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_rejects_blank() {
        assert!(matches!(Query::new(""), Err(WatchError::Validation)));
        assert!(matches!(Query::new(" \t "), Err(WatchError::Validation)));
        assert_eq!(Query::new("  Heat ").unwrap().as_str(), "Heat");
    }

    #[test]
    fn poster_sentinel_is_absent() {
        let mut m = CanonicalMedia {
            title: "Heat".into(),
            year: "1995".into(),
            imdb_rating: "8.3".into(),
            rotten_tomatoes_rating: NOT_AVAILABLE.into(),
            plot: String::new(),
            poster_url: NOT_AVAILABLE.into(),
            imdb_id: None,
            kind: None,
        };
        assert_eq!(m.poster(), None);
        m.poster_url = "https://img.example/heat.jpg".into();
        assert_eq!(m.poster(), Some("https://img.example/heat.jpg"));
    }
}
