//! Game state engine for the Rinkside hockey scoreboard.
//!
//! This crate owns everything about a single game that does not touch the
//! network: the engine and its undo history, the clock and its driver, the
//! command and voice grammars, export/import, local persistence, and the
//! YAML configuration.
//!
//! # Modules
//!
//! - [`engine`] -- [`GameEngine`], the single owner of game state.
//! - [`history`] -- Bounded snapshot history with a cursor.
//! - [`clock`] -- Period, time remaining, and run state.
//! - [`penalty`] -- Active penalties and their countdown.
//! - [`events`] -- Append-only event log.
//! - [`command`] -- Serializable operator commands.
//! - [`voice`] -- Spoken command grammar.
//! - [`export`] -- JSON export/import and the text summary.
//! - [`persist`] -- [`StateStore`] and the JSON file backend.
//! - [`presets`] -- NHL team identities.
//! - [`driver`] -- Once-per-second clock driver.
//! - [`config`] -- Configuration loading from `rinkside-config.yaml`.
//! - [`format`] -- Clock text formatting.
//!
//! [`GameEngine`]: engine::GameEngine
//! [`StateStore`]: persist::StateStore

pub mod clock;
pub mod command;
pub mod config;
pub mod driver;
pub mod engine;
pub mod events;
pub mod export;
pub mod format;
pub mod history;
pub mod penalty;
pub mod persist;
pub mod presets;
pub mod settings;
pub mod voice;

pub use command::{CommandError, GameCommand};
pub use config::{ConfigError, ScoreboardConfig};
pub use driver::SharedEngine;
pub use engine::GameEngine;
pub use export::{ImportData, ImportError};
pub use persist::{JsonFileStore, MemoryStateStore, PersistError, StateStore};
pub use settings::{Settings, SettingsUpdate};
pub use voice::{VoiceAction, parse_voice_command};
