//! Reply payloads. Pure rendering over already-ranked data.

use std::fmt;

use serde::Serialize;

use crate::types::{CanonicalMedia, RankedCandidateList};

pub const PONG: &str = "Pong!";
pub const MISSING_TITLE: &str = "Please provide a title to search for.";
pub const MEDIA_NOT_FOUND: &str = "Media not found.";
pub const REQUEST_FAILED: &str = "Something went wrong while searching. Please try again later.";
pub const NO_RESULTS: &str = "No results found.";

/// Chat platforms reject embed field values longer than this.
pub const FIELD_VALUE_LIMIT: usize = 1024;
/// Accent color of the result embed.
pub const ACCENT: u32 = 0x3498db;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyPayload {
    Text { content: String },
    Embed(Embed),
}

impl ReplyPayload {
    pub fn text(content: impl Into<String>) -> Self { ReplyPayload::Text { content: content.into() } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub description: String,
    pub thumbnail: Option<String>,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

pub fn assemble(media: &CanonicalMedia, lists: &[RankedCandidateList]) -> ReplyPayload {
    ReplyPayload::Embed(Embed {
        title: media.title.clone(),
        color: ACCENT,
        description: describe(media),
        thumbnail: media.poster().map(str::to_string),
        fields: lists.iter().map(section).collect(),
    })
}

fn describe(media: &CanonicalMedia) -> String {
    let mut d = format!(
        "**Year:** {}\n**IMDb Rating:** {}\n**Rotten Tomatoes:** {}",
        media.year, media.imdb_rating, media.rotten_tomatoes_rating
    );
    if let Some(kind) = media.kind.as_deref() {
        d.push_str(&format!("\n**Type:** {}", capitalize(kind)));
    }
    if !media.plot.trim().is_empty() {
        d.push_str("\n\n");
        d.push_str(media.plot.trim());
    }
    d
}

fn section(list: &RankedCandidateList) -> EmbedField {
    let value = if list.no_results() {
        NO_RESULTS.to_string()
    } else {
        let joined = list.entries()
            .iter()
            .map(|c| format!("[{}]({})", escape_label(&c.label), c.url))
            .collect::<Vec<_>>()
            .join("\n");
        if joined.chars().count() > FIELD_VALUE_LIMIT {
            format!("Too many links, try searching manually on {}.", list.source())
        } else {
            joined
        }
    };
    EmbedField { name: list.source().to_string(), value, inline: false }
}

/// Square brackets would end the link text early.
fn escape_label(label: &str) -> String {
    label.replace('[', "\\[").replace(']', "\\]")
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(f) => f.to_uppercase().chain(c).collect(),
        None => String::new(),
    }
}

impl fmt::Display for ReplyPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyPayload::Text { content } => write!(f, "{content}"),
            ReplyPayload::Embed(e) => {
                writeln!(f, "{}", e.title)?;
                writeln!(f, "{}", e.description)?;
                if let Some(t) = &e.thumbnail { writeln!(f, "Poster: {t}")?; }
                for field in &e.fields {
                    write!(f, "\n{}\n{}\n", field.name, field.value)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{rank, DEFAULT_CAP};
    use crate::types::{RawCandidate, NOT_AVAILABLE};

    fn inception() -> CanonicalMedia {
        CanonicalMedia {
            title: "Inception".into(),
            year: "2010".into(),
            imdb_rating: "8.8".into(),
            rotten_tomatoes_rating: NOT_AVAILABLE.into(),
            plot: "A thief who steals corporate secrets.".into(),
            poster_url: "https://img.example/inception.jpg".into(),
            imdb_id: Some("tt1375666".into()),
            kind: Some("movie".into()),
        }
    }

    fn embed(p: ReplyPayload) -> Embed {
        match p {
            ReplyPayload::Embed(e) => e,
            other => panic!("expected embed, got {other:?}"),
        }
    }

    #[test]
    fn sections_render_links_or_placeholder() {
        let hits = rank("Alpha", &[RawCandidate::new("Inception", "https://a.example/m/1")], "Inception", "Inception", DEFAULT_CAP);
        let misses = rank("Beta", &[], "Inception", "Inception", DEFAULT_CAP);
        let e = embed(assemble(&inception(), &[hits, misses]));

        assert_eq!(e.title, "Inception");
        assert_eq!(e.color, ACCENT);
        assert_eq!(e.thumbnail.as_deref(), Some("https://img.example/inception.jpg"));
        assert_eq!(e.fields.len(), 2);
        assert_eq!(e.fields[0].name, "Alpha");
        assert_eq!(e.fields[0].value, "[Inception](https://a.example/m/1)");
        assert_eq!(e.fields[1].name, "Beta");
        assert_eq!(e.fields[1].value, NO_RESULTS);
    }

    #[test]
    fn description_shows_na_and_kind() {
        let e = embed(assemble(&inception(), &[]));
        assert!(e.description.contains("**Year:** 2010"));
        assert!(e.description.contains("**IMDb Rating:** 8.8"));
        assert!(e.description.contains("**Rotten Tomatoes:** N/A"));
        assert!(e.description.contains("**Type:** Movie"));
        assert!(e.description.ends_with("A thief who steals corporate secrets."));
    }

    #[test]
    fn oversized_section_is_replaced() {
        let long = "I".repeat(100);
        let cands: Vec<RawCandidate> = (0..5)
            .map(|i| RawCandidate::new(format!("Inception {long}"), format!("https://a.example/m/{i}/{}", "p".repeat(150))))
            .collect();
        let list = rank("Alpha", &cands, "Inception", "Inception", DEFAULT_CAP);
        let e = embed(assemble(&inception(), &[list]));
        assert_eq!(e.fields[0].value, "Too many links, try searching manually on Alpha.");
    }

    #[test]
    fn brackets_in_labels_are_escaped() {
        let list = rank("Alpha", &[RawCandidate::new("Inception [4K] Remux", "https://a.example/m/1")], "Inception", "Inception", DEFAULT_CAP);
        let e = embed(assemble(&inception(), &[list]));
        assert_eq!(e.fields[0].value, r"[Inception \[4K\] Remux](https://a.example/m/1)");
    }

    #[test]
    fn text_payload_serializes_with_tag() {
        let json = serde_json::to_value(ReplyPayload::text(PONG)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "content": "Pong!"}));
    }
}
