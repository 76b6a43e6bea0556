//! Scrape sources: where a search page lives and how to read it.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::SourceConfig;
use crate::extract::{extract, SourceRule};
use crate::normalize::{normalize, NormalizeMode};
use crate::types::{Query, RawCandidate};

/// Anything that turns a query into candidate links. Swapped for fakes in tests.
#[async_trait]
pub trait LinkSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_and_extract(&self, query: &Query) -> Result<Vec<RawCandidate>>;
}

/// How the search request for a source is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStyle {
    /// `<base>/search/<hyphenated-title>`
    PathSearch,
    /// `<base>/filter?keyword=<plus-encoded-title>`
    KeywordFilter,
}

impl SearchStyle {
    pub fn search_url(self, base: &str, query: &str) -> Result<Url> {
        let base = base.trim_end_matches('/');
        let raw = match self {
            SearchStyle::PathSearch => {
                let mut url = Url::parse(base).with_context(|| format!("invalid base url {base:?}"))?;
                url.path_segments_mut()
                    .map_err(|_| anyhow!("base url {base:?} cannot take a path"))?
                    .pop_if_empty()
                    .push("search")
                    .push(&normalize(query, NormalizeMode::Hyphen));
                return Ok(url);
            }
            SearchStyle::KeywordFilter => format!("{base}/filter?keyword={}", normalize(query, NormalizeMode::Plus)),
        };
        Url::parse(&raw).with_context(|| format!("invalid search url {raw:?}"))
    }

    /// Selection rule the built-in layout for this style uses.
    pub fn default_rule(self, name: &str, base_url: &str) -> SourceRule {
        match self {
            SearchStyle::PathSearch => SourceRule {
                name: name.to_string(),
                base_url: base_url.to_string(),
                container: "div.film_list-wrap > div.flw-item:nth-child({n})".into(),
                label: "div.film-detail h2.film-name a".into(),
                link: None,
                window: 2..22,
                exclude_href: vec!["genre[]".into()],
            },
            SearchStyle::KeywordFilter => SourceRule {
                name: name.to_string(),
                base_url: base_url.to_string(),
                container: "div.movies > div.item:nth-child({n})".into(),
                label: "div.meta a".into(),
                link: None,
                window: 1..21,
                exclude_href: vec!["genre[]".into()],
            },
        }
    }
}

/// HTTP-backed [`LinkSource`].
pub struct ScrapeSource {
    client: reqwest::Client,
    style: SearchStyle,
    rule: SourceRule,
}

impl ScrapeSource {
    pub fn new(client: reqwest::Client, style: SearchStyle, rule: SourceRule) -> Self {
        Self { client, style, rule }
    }

    /// Build from config, starting at the style's default rule and applying
    /// any selector overrides.
    pub fn from_config(client: reqwest::Client, style: SearchStyle, default_name: &str, cfg: &SourceConfig) -> Result<Self> {
        let name = cfg.name.as_deref().unwrap_or(default_name);
        let base_url = cfg.base_url
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| anyhow!("base_url is not set for source {name:?}"))?;
        let mut rule = style.default_rule(name, base_url);
        if let Some(c) = &cfg.container { rule.container = c.clone(); }
        if let Some(l) = &cfg.label { rule.label = l.clone(); }
        if let Some(l) = &cfg.link { rule.link = Some(l.clone()); }
        rule.validate()?;
        Ok(Self::new(client, style, rule))
    }

    pub fn rule(&self) -> &SourceRule { &self.rule }
}

#[async_trait]
impl LinkSource for ScrapeSource {
    fn name(&self) -> &str { &self.rule.name }

    async fn fetch_and_extract(&self, query: &Query) -> Result<Vec<RawCandidate>> {
        let url = self.style.search_url(&self.rule.base_url, query.as_str())?;
        debug!(source = %self.rule.name, %url, "scraping");
        let markup = self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("{} request failed", self.rule.name))?
            .error_for_status()
            .with_context(|| format!("{} request returned error", self.rule.name))?
            .text()
            .await
            .with_context(|| format!("{} response body unreadable", self.rule.name))?;
        extract(&markup, &self.rule)
    }
}
