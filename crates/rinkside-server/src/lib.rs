//! Scoreboard host server for the Rinkside hockey scoreboard.
//!
//! This crate provides an Axum HTTP server that owns the one authoritative
//! [`GameEngine`] and exposes:
//!
//! - **REST endpoints** for operator commands, voice transcripts,
//!   export/import, the text summary, team presets, and overlay options
//! - **Sync endpoints** to host a game for viewers or join one
//! - **`WebSocket` endpoint** (`/ws/state`) pushing the game view after
//!   every committed change
//!
//! # Architecture
//!
//! Handlers, the clock driver, and the viewer loop all serialize through
//! the engine mutex. Each mutation is followed, under the same lock, by a
//! commit: save to the [`StateStore`], broadcast to `WebSocket` clients,
//! and publish to viewers when hosting.
//!
//! [`GameEngine`]: rinkside_core::GameEngine
//! [`StateStore`]: rinkside_core::StateStore

pub mod callback;
pub mod error;
pub mod handlers;
pub mod overlay;
pub mod router;
pub mod server;
pub mod state;
pub mod sync;
pub mod ws;

pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::{AppState, Committer};
