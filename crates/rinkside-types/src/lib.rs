//! Shared type definitions for the Rinkside hockey scoreboard.
//!
//! This crate is the single source of truth for all types used across the
//! Rinkside workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the browser operator panel and overlay.
//!
//! # Modules
//!
//! - [`ids`] -- Short string wrappers for penalty and event identifiers
//! - [`code`] -- Validated six-character shared game codes
//! - [`enums`] -- Enumeration types (sides, penalty classes, sync roles)
//! - [`structs`] -- Teams, penalties, events, snapshots, and documents

pub mod code;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use code::{GAME_CODE_ALPHABET, GAME_CODE_LEN, GameCode, GameCodeError};
pub use enums::{
    EventType, OverlayPosition, OverlayTheme, PenaltyType, SyncMode, SyncStatus, TeamSide, Theme,
};
pub use ids::{EventId, PenaltyId};
pub use structs::{
    EventDetails, ExportData, GameEvent, GameStateSnapshot, GameView, NewPenalty, OverlayOptions,
    Penalty, PersistedState, SharedGameRecord, SharedGameUpdate, SyncStatusView, Team, TeamUpdate,
};
