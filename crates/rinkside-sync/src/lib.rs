//! Host-to-viewer replication for the Rinkside hockey scoreboard.
//!
//! A host publishes its engine state under a short game code; viewers join
//! with the code and mirror it read-only. Replication goes through a
//! [`SharedStore`], either the in-process [`MemoryStore`] or the
//! `Dragonfly` + NATS [`RemoteStore`].
//!
//! # Modules
//!
//! - [`bridge`] -- [`SyncBridge`] host/viewer sessions.
//! - [`store`] -- The [`SharedStore`] capability and [`Subscription`].
//! - [`memory`] -- In-process store.
//! - [`remote`] -- `Dragonfly` records with NATS change notification.
//! - [`debounce`] -- Coalescing of host writes.
//! - [`error`] -- [`SyncError`].

pub mod bridge;
pub mod debounce;
pub mod error;
pub mod memory;
pub mod remote;
pub mod store;

pub use bridge::{
    GAME_ENDED_MESSAGE, NoOpRemoteCallback, RemoteApplyCallback, SyncBridge, SyncOptions,
};
pub use error::SyncError;
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use store::{RemoteChange, SharedStore, Subscription};
