//! Error types for the sync bridge.
//!
//! Store failures from `Dragonfly` and NATS are carried through
//! [`SyncError`]; none of them touch local engine state.

use rinkside_types::{GameCodeError, SyncMode};

/// Errors that can occur while hosting, joining, or replicating a game.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A `Dragonfly`/Redis operation failed.
    #[error("Dragonfly error: {0}")]
    Dragonfly(#[from] fred::error::Error),

    /// A NATS connect, subscribe, or publish failed.
    #[error("NATS error: {0}")]
    Nats(String),

    /// A shared record could not be serialized or parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The code does not name a live shared game.
    #[error("Game not found")]
    NotFound(String),

    /// The code is not a well-formed game code.
    #[error("Invalid game code: {0}")]
    InvalidCode(#[from] GameCodeError),

    /// A host or join was requested while already connected.
    #[error("Already connected as {0:?}; disconnect first")]
    AlreadyConnected(SyncMode),

    /// No remote store is configured.
    #[error("Sync is not configured")]
    NotConfigured,

    /// Every game code drawn was already in use.
    #[error("No free game code after {0} attempts")]
    CodesExhausted(usize),

    /// A configuration value was rejected.
    #[error("Configuration error: {0}")]
    Config(String),
}
