use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::types::{CanonicalMedia, NOT_AVAILABLE};

/// Resolves a free-text title to its canonical record.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// `Ok(None)` when the source has no match; `Err` only for transport or
    /// decoding failures.
    async fn lookup(&self, title: &str) -> Result<Option<CanonicalMedia>>;
}

#[derive(Debug, Deserialize)]
struct OmdbRating {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct OmdbTitle {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Ratings", default)]
    ratings: Vec<OmdbRating>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
}

const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";

fn or_na(v: Option<String>) -> String {
    v.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl OmdbTitle {
    fn into_media(self) -> Option<CanonicalMedia> {
        if !self.response.eq_ignore_ascii_case("true") { return None; }
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let rotten = self.ratings.into_iter().find(|r| r.source == ROTTEN_TOMATOES).map(|r| r.value);
        Some(CanonicalMedia {
            title,
            year: or_na(self.year),
            imdb_rating: or_na(self.imdb_rating),
            rotten_tomatoes_rating: or_na(rotten),
            plot: self.plot.unwrap_or_default(),
            poster_url: or_na(self.poster),
            imdb_id: self.imdb_id.filter(|s| s != NOT_AVAILABLE),
            kind: self.kind.filter(|s| !s.is_empty()),
        })
    }
}

/// OMDb title lookup (`?apikey=..&t=..`).
pub struct OmdbClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).with_context(|| format!("invalid metadata endpoint {endpoint:?}"))?;
        Ok(Self { client, endpoint, api_key: api_key.into() })
    }

    fn title_url(&self, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("t", title)
            .append_pair("plot", "short");
        url
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<Option<CanonicalMedia>> {
        let resp = self.client
            .get(self.title_url(title))
            .send()
            .await
            .context("metadata request failed")?
            .error_for_status()
            .context("metadata request returned error")?;
        let body = resp.text().await.context("metadata response body unreadable")?;
        parse_title(title, &body)
    }
}

/// Decode a title response. A `"False"` response is `Ok(None)`; a body that
/// is not a title response at all is an error.
fn parse_title(title: &str, body: &str) -> Result<Option<CanonicalMedia>> {
    let parsed: OmdbTitle = serde_json::from_str(body).context("metadata response was not valid json")?;
    if let Some(err) = &parsed.error { debug!(title, error = %err, "metadata lookup miss"); }
    Ok(parsed.into_media())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<CanonicalMedia> {
        parse_title("test", json).unwrap()
    }

    #[test]
    fn found_record_maps_fields() {
        let m = parse(r#"{
            "Title": "Inception", "Year": "2010", "imdbRating": "8.8",
            "Ratings": [{"Source": "Internet Movie Database", "Value": "8.8/10"},
                        {"Source": "Rotten Tomatoes", "Value": "87%"}],
            "Plot": "A thief who steals corporate secrets.", "Poster": "https://img.example/inception.jpg",
            "imdbID": "tt1375666", "Type": "movie", "Response": "True"
        }"#).unwrap();
        assert_eq!(m.title, "Inception");
        assert_eq!(m.year, "2010");
        assert_eq!(m.imdb_rating, "8.8");
        assert_eq!(m.rotten_tomatoes_rating, "87%");
        assert_eq!(m.imdb_id.as_deref(), Some("tt1375666"));
        assert_eq!(m.kind.as_deref(), Some("movie"));
    }

    #[test]
    fn missing_rotten_tomatoes_is_na() {
        let m = parse(r#"{"Title": "Heat", "Year": "1995", "Ratings": [], "Response": "True"}"#).unwrap();
        assert_eq!(m.rotten_tomatoes_rating, NOT_AVAILABLE);
        assert_eq!(m.imdb_rating, NOT_AVAILABLE);
        assert_eq!(m.poster(), None);
    }

    #[test]
    fn false_response_is_not_found() {
        assert!(parse(r#"{"Response": "False", "Error": "Movie not found!"}"#).is_none());
    }

    #[test]
    fn undecodable_body_is_an_error() {
        assert!(parse_title("Heat", "<html>502 Bad Gateway</html>").is_err());
        assert!(parse_title("Heat", r#"{"Title": "Heat", "Year": "1995"}"#).is_err());
    }

    #[test]
    fn request_url_carries_key_and_encoded_title() {
        let c = OmdbClient::new(reqwest::Client::new(), "http://www.omdbapi.com/", "abc").unwrap();
        let url = c.title_url("Dune (2021)");
        assert_eq!(url.as_str(), "http://www.omdbapi.com/?apikey=abc&t=Dune+%282021%29&plot=short");
    }
}
