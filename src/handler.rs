//! Request handling: validate, look up, scrape, rank, reply.
//!
//! A `watch` request moves through lookup, then all scrapes concurrently,
//! then ranking and reply assembly. A lookup miss replies straight away and
//! never scrapes. Any failed network call aborts the whole request with one
//! generic reply; the cause only goes to the log.

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::BotConfig;
use crate::error::WatchError;
use crate::metadata::{MetadataLookup, OmdbClient};
use crate::rank::{rank, DEFAULT_CAP};
use crate::reply::{self, assemble, ReplyPayload};
use crate::sources::{LinkSource, ScrapeSource, SearchStyle};
use crate::types::Query;

/// An incoming slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Watch { title: Option<String> },
}

pub struct WatchBot {
    lookup: Box<dyn MetadataLookup>,
    sources: Vec<Box<dyn LinkSource>>,
}

impl WatchBot {
    pub fn new(lookup: Box<dyn MetadataLookup>, sources: Vec<Box<dyn LinkSource>>) -> Self {
        Self { lookup, sources }
    }

    /// Wire the OMDb client and both scrape sources from config. One HTTP
    /// client is shared; every call through it is bounded by the timeout.
    pub fn from_config(cfg: &BotConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(cfg.timeout())
            .build()
            .context("failed to build http client")?;
        let lookup = OmdbClient::new(client.clone(), &cfg.omdb_endpoint, cfg.omdb_api_key()?)?;
        let a = ScrapeSource::from_config(client.clone(), SearchStyle::PathSearch, "Source A", &cfg.source_a)?;
        let b = ScrapeSource::from_config(client, SearchStyle::KeywordFilter, "Source B", &cfg.source_b)?;
        let sources: Vec<Box<dyn LinkSource>> = vec![Box::new(a), Box::new(b)];
        Ok(Self::new(Box::new(lookup), sources))
    }

    pub fn source_names(&self) -> Vec<String> { self.sources.iter().map(|s| s.name().to_string()).collect() }

    pub async fn handle(&self, cmd: Command) -> ReplyPayload {
        match cmd {
            Command::Ping => ReplyPayload::text(reply::PONG),
            Command::Watch { title } => self.watch(title.as_deref().unwrap_or_default()).await,
        }
    }

    /// Always produces exactly one reply.
    pub async fn watch(&self, title: &str) -> ReplyPayload {
        let span = info_span!("watch", request_id = %Uuid::new_v4(), title);
        async {
            match self.run(title).await {
                Ok(r) => { info!("replied with results"); r }
                Err(WatchError::Validation) => ReplyPayload::text(reply::MISSING_TITLE),
                Err(WatchError::NotFound(t)) => { info!(title = %t, "media not found"); ReplyPayload::text(reply::MEDIA_NOT_FOUND) }
                Err(WatchError::Network(e)) => { error!("request failed: {:#}", e); ReplyPayload::text(reply::REQUEST_FAILED) }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, title: &str) -> Result<ReplyPayload, WatchError> {
        let query = Query::new(title)?;
        let media = self.lookup
            .lookup(query.as_str())
            .await?
            .ok_or_else(|| WatchError::NotFound(query.as_str().to_string()))?;

        let scraped = try_join_all(self.sources.iter().map(|s| s.fetch_and_extract(&query))).await?;
        let lists: Vec<_> = self.sources
            .iter()
            .zip(&scraped)
            .map(|(s, found)| rank(s.name(), found, query.as_str(), &media.title, DEFAULT_CAP))
            .collect();
        Ok(assemble(&media, &lists))
    }
}
