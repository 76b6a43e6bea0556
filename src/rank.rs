//! Relevance filter for scraped candidates.
//!
//! A candidate is kept when, case-insensitively, its label contains the
//! query title, or the canonical title contains its label. Plain substring
//! checks only: no tokenizing, no edit distance. Kept candidates stay in page
//! order and are cut to `cap`.
//!
//! An empty query title matches every non-empty label. Labels are never
//! empty here, so the second check cannot match everything.

use tracing::debug;

use crate::extract::is_well_formed;
use crate::types::{RankedCandidateList, RawCandidate};

/// Candidates shown per source.
pub const DEFAULT_CAP: usize = 5;

pub fn rank(
    source: &str,
    candidates: &[RawCandidate],
    query_title: &str,
    canonical_title: &str,
    cap: usize,
) -> RankedCandidateList {
    let query = query_title.to_lowercase();
    let canonical = canonical_title.to_lowercase();

    let kept: Vec<RawCandidate> = candidates
        .iter()
        .filter(|c| !c.label.trim().is_empty() && is_well_formed(&c.url))
        .filter(|c| is_relevant(&c.label.to_lowercase(), &query, &canonical))
        .take(cap)
        .cloned()
        .collect();

    debug!(source, scanned = candidates.len(), kept = kept.len(), "ranked candidates");
    RankedCandidateList::new(source, kept)
}

fn is_relevant(label: &str, query: &str, canonical: &str) -> bool {
    label.contains(query) || canonical.contains(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands(labels: &[&str]) -> Vec<RawCandidate> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| RawCandidate::new(*l, format!("https://a.example/m/{i}")))
            .collect()
    }

    #[test]
    fn never_exceeds_cap() {
        for n in [0usize, 4, 5, 6, 1000] {
            let labels: Vec<String> = (0..n).map(|i| format!("Inception {i}")).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let out = rank("A", &cands(&refs), "Inception", "Inception", DEFAULT_CAP);
            assert_eq!(out.len(), n.min(DEFAULT_CAP), "input of {n}");
        }
    }

    #[test]
    fn output_is_ordered_subsequence() {
        let input = cands(&["Heat", "Inception (2010)", "Up", "inception", "Interstellar", "INCEPTION 4K"]);
        let out = rank("A", &input, "Inception", "Inception", DEFAULT_CAP);
        let labels: Vec<&str> = out.entries().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Inception (2010)", "inception", "INCEPTION 4K"]);

        let mut pos = 0;
        for e in out.entries() {
            let found = input[pos..].iter().position(|c| c == e).expect("entry must come from input");
            pos += found + 1;
        }
    }

    #[test]
    fn exact_matches_are_relevant() {
        let out = rank("A", &cands(&["The Office"]), "The Office", "The Office (US)", DEFAULT_CAP);
        assert_eq!(out.len(), 1);
        let out = rank("A", &cands(&["The Office (US)"]), "office us", "The Office (US)", DEFAULT_CAP);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn partial_label_inside_canonical_is_relevant() {
        let out = rank("A", &cands(&["Star Wars"]), "star wars episode iv", "Star Wars: Episode IV - A New Hope", DEFAULT_CAP);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unrelated_labels_give_no_results() {
        let out = rank("B", &cands(&["Heat", "Up"]), "Inception", "Inception", DEFAULT_CAP);
        assert!(out.no_results());
        assert_eq!(out.source(), "B");
    }

    #[test]
    fn empty_labels_never_match() {
        let out = rank("A", &cands(&["", "  "]), "Inception", "Inception", DEFAULT_CAP);
        assert!(out.no_results());
    }

    #[test]
    fn malformed_urls_are_dropped() {
        let input = vec![
            RawCandidate::new("Heat", "https://a.example/"),
            RawCandidate::new("Heat", "not a url"),
            RawCandidate::new("Heat", "https://a.example/m/heat"),
        ];
        let out = rank("A", &input, "Heat", "Heat", DEFAULT_CAP);
        assert_eq!(out.entries(), &[RawCandidate::new("Heat", "https://a.example/m/heat")]);
    }

    #[test]
    fn empty_query_matches_everything() {
        let out = rank("A", &cands(&["Heat", "Up"]), "", "Inception", DEFAULT_CAP);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn duplicates_are_kept() {
        let input = vec![
            RawCandidate::new("Heat", "https://a.example/m/heat"),
            RawCandidate::new("Heat", "https://a.example/m/heat"),
        ];
        assert_eq!(rank("A", &input, "Heat", "Heat", DEFAULT_CAP).len(), 2);
    }
}
