//! Slash-command bot core: look a title up, scrape two streaming search
//! pages for it, keep the relevant links and build the reply.

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod metadata;
pub mod normalize;
pub mod rank;
pub mod reply;
pub mod sources;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders (chat transports, CLIs).
pub mod prelude {
    pub use crate::config::BotConfig;
    pub use crate::error::WatchError;
    pub use crate::handler::{Command, WatchBot};
    pub use crate::metadata::MetadataLookup;
    pub use crate::reply::{Embed, EmbedField, ReplyPayload};
    pub use crate::sources::LinkSource;
    pub use crate::types::{CanonicalMedia, Query, RankedCandidateList, RawCandidate};
}

pub use handler::{Command, WatchBot};
