use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_OMDB_ENDPOINT: &str = "http://www.omdbapi.com/";
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

/// Startup configuration. Read once and handed to the clients that need it.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    /// Chat platform credential; only the transport uses it.
    pub token: Option<String>,
    pub application_id: Option<String>,
    pub omdb_api_key: Option<String>,
    pub omdb_endpoint: String,
    /// Per network call.
    pub timeout_ms: u64,
    pub user_agent: String,
    pub source_a: SourceConfig,
    pub source_b: SourceConfig,
}

/// Where a scrape source lives, plus optional selector overrides for when
/// the site layout shifts.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SourceConfig {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub container: Option<String>,
    pub label: Option<String>,
    pub link: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            application_id: None,
            omdb_api_key: None,
            omdb_endpoint: DEFAULT_OMDB_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: concat!("watchbot/", env!("CARGO_PKG_VERSION")).to_string(),
            source_a: SourceConfig::default(),
            source_b: SourceConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load from `path`, or from `watchbot.toml` in the platform config dir
    /// when no path is given (falling back to defaults if that file is
    /// absent), then apply `WATCHBOT_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => { debug!("no config file, using defaults"); Self::default() }
            },
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub(crate) fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("WATCHBOT_TOKEN") { self.token = Some(v); }
        if let Some(v) = get("WATCHBOT_APPLICATION_ID") { self.application_id = Some(v); }
        if let Some(v) = get("WATCHBOT_OMDB_API_KEY") { self.omdb_api_key = Some(v); }
        if let Some(v) = get("WATCHBOT_TIMEOUT_MS").and_then(|s| s.parse().ok()) { self.timeout_ms = v; }
    }

    pub fn omdb_api_key(&self) -> Result<&str> {
        self.omdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("omdb_api_key is not set (config file or WATCHBOT_OMDB_API_KEY)"))
    }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms.max(1)) }
}

pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "watchbot").map(|d| d.config_dir().join("watchbot.toml"))
}
