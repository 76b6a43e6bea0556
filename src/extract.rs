//! Pulls `{label, url}` candidates out of a scraped results page.
//!
//! A [`SourceRule`] describes where the results live: a container selector
//! parameterized by a 1-based position (`{n}`), sub-selectors for the label
//! and link inside it, the base URL that relative hrefs are joined to, and the
//! window of positions to inspect. Positions that do not yield a usable
//! candidate are skipped; page structure is not assumed to be stable.

use std::ops::Range;

use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::normalize::collapse_whitespace;
use crate::types::RawCandidate;

/// Labels longer than this are cut and suffixed with `...`.
pub const MAX_LABEL_CHARS: usize = 100;

/// Placeholder inside [`SourceRule::container`] replaced by the position index.
pub const POSITION: &str = "{n}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRule {
    /// Display name, used as the reply section heading.
    pub name: String,
    pub base_url: String,
    /// e.g. `div.film-list > div.item:nth-child({n})`
    pub container: String,
    pub label: String,
    /// `None` means the label element carries the href.
    pub link: Option<String>,
    /// Positions `[start, end)` to inspect.
    pub window: Range<usize>,
    /// Hrefs containing any of these are not title links.
    pub exclude_href: Vec<String>,
}

impl SourceRule {
    fn container_at(&self, n: usize) -> String {
        self.container.replace(POSITION, &n.to_string())
    }

    /// Check the rule once up front so a bad override fails at startup
    /// instead of on every request.
    pub fn validate(&self) -> Result<()> {
        if !self.container.contains(POSITION) {
            return Err(anyhow!("container selector for {} must contain {}", self.name, POSITION));
        }
        if self.window.is_empty() {
            return Err(anyhow!("empty scan window for {}", self.name));
        }
        Url::parse(&self.base_url).with_context(|| format!("invalid base url for {}", self.name))?;
        selector(&self.container_at(self.window.start))?;
        selector(&self.label)?;
        if let Some(l) = &self.link { selector(l)?; }
        Ok(())
    }
}

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("invalid selector {:?}: {}", s, e))
}

/// Apply `rule` to `markup`. The result keeps page order and may be empty.
/// Only a malformed rule (bad selector, bad base URL) is an error.
pub fn extract(markup: &str, rule: &SourceRule) -> Result<Vec<RawCandidate>> {
    let base = Url::parse(&rule.base_url).with_context(|| format!("invalid base url for {}", rule.name))?;
    let label_sel = selector(&rule.label)?;
    let link_sel = rule.link.as_deref().map(selector).transpose()?;
    let document = Html::parse_document(markup);

    let mut out = Vec::with_capacity(rule.window.len());
    for n in rule.window.clone() {
        let container_sel = selector(&rule.container_at(n))?;
        let Some(container) = document.select(&container_sel).next() else {
            debug!(source = %rule.name, position = n, "no container");
            continue;
        };
        match candidate_from(container, &label_sel, link_sel.as_ref(), &base, rule) {
            Some(c) => out.push(c),
            None => debug!(source = %rule.name, position = n, "no usable candidate"),
        }
    }
    Ok(out)
}

fn candidate_from(
    container: ElementRef<'_>,
    label_sel: &Selector,
    link_sel: Option<&Selector>,
    base: &Url,
    rule: &SourceRule,
) -> Option<RawCandidate> {
    let label_el = container.select(label_sel).next()?;
    let mut label = collapse_whitespace(&label_el.text().collect::<String>());
    if label.is_empty() {
        label = collapse_whitespace(label_el.value().attr("title").unwrap_or_default());
    }
    if label.is_empty() { return None; }

    let link_el = match link_sel {
        Some(sel) => container.select(sel).next()?,
        None => label_el,
    };
    let href = link_el.value().attr("href").unwrap_or_default().trim();
    if href.is_empty() { return None; }
    if rule.exclude_href.iter().any(|x| href.contains(x.as_str())) { return None; }

    let url = join_href(base, href)?;
    Some(RawCandidate { label: truncate(&label, MAX_LABEL_CHARS), url })
}

/// Join a scraped href onto the source base. Results without a path beyond `/`
/// are rejected.
fn join_href(base: &Url, href: &str) -> Option<String> {
    let joined = base.join(href).ok()?;
    has_path(&joined).then(|| joined.to_string())
}

/// An http(s) URL with something after the host.
pub(crate) fn has_path(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && !matches!(url.path(), "" | "/")
}

pub(crate) fn is_well_formed(url: &str) -> bool {
    Url::parse(url).map(|u| has_path(&u)).unwrap_or(false)
}

/// Cut `s` to `max` characters, replacing the tail with `...` when it had to
/// be shortened. For `max <= 3` the result is just that many dots.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.extend("...".chars().take(max - keep));
    out
}
