use thiserror::Error;

/// Failures a single `watch` request can end in. Each one maps to exactly one
/// user-visible reply; none of them is fatal to the process.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("missing or empty title")]
    Validation,
    #[error("no media found for {0:?}")]
    NotFound(String),
    /// Lookup or scrape failed: connection error, non-2xx, timeout or bad markup.
    #[error("upstream call failed: {0:#}")]
    Network(anyhow::Error),
}

impl From<anyhow::Error> for WatchError {
    fn from(e: anyhow::Error) -> Self { WatchError::Network(e) }
}
