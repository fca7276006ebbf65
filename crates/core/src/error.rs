//! Error types surfaced by the dialogue core
//!
//! Almost everything that goes wrong inside a turn is absorbed and converted
//! into conversational text. Only structural failures reach the host as
//! `Err`: a corrupted checkpoint must be rejected loudly rather than silently
//! replaced with a fresh profile, since that would drop contradiction history.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The host handed in a conversation state that fails validation
    #[error("invalid conversation state: {0}")]
    InvalidState(String),

    /// Scheme catalog could not be loaded or parsed
    #[error("scheme catalog error: {0}")]
    Catalog(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
