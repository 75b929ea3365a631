//! Core entity structs for the Rinkside scoreboard.
//!
//! Covers the team record, penalties, the event log entry, the undo/redo
//! snapshot, and the three external documents built from them: the
//! persisted local state, the export file, and the shared remote record.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::code::GameCode;
use crate::enums::{
    EventType, OverlayPosition, OverlayTheme, PenaltyType, SyncMode, SyncStatus, TeamSide, Theme,
};
use crate::ids::{EventId, PenaltyId};

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Per-side record: identity plus score, shots, timeouts, and empty net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Display name (e.g. "Maple Leafs").
    pub name: String,
    /// Short scoreboard label (e.g. "TOR").
    pub abbreviation: String,
    /// Primary colour as a CSS hex string.
    pub color: String,
    /// Goals scored.
    pub score: u32,
    /// Shots on goal.
    pub shots: u32,
    /// Timeouts available for the game.
    pub timeouts: u32,
    /// Timeouts already called. Never exceeds `timeouts` through the engine.
    pub timeouts_used: u32,
    /// Whether the goaltender has been pulled.
    pub empty_net: bool,
}

impl Team {
    /// Create a team with zeroed counters and the given timeout allowance.
    pub fn new(name: &str, abbreviation: &str, color: &str, timeouts: u32) -> Self {
        Self {
            name: name.to_owned(),
            abbreviation: abbreviation.to_owned(),
            color: color.to_owned(),
            score: 0,
            shots: 0,
            timeouts,
            timeouts_used: 0,
            empty_net: false,
        }
    }

    /// Default identity for the given side (`Home`/`HOME`/red or
    /// `Away`/`AWAY`/blue).
    pub fn default_for(side: TeamSide, timeouts: u32) -> Self {
        match side {
            TeamSide::Home => Self::new("Home", "HOME", "#ef4444", timeouts),
            TeamSide::Away => Self::new("Away", "AWAY", "#3b82f6", timeouts),
        }
    }

    /// Number of timeouts still available.
    pub const fn timeouts_remaining(&self) -> u32 {
        self.timeouts.saturating_sub(self.timeouts_used)
    }
}

/// Partial team update; only `Some` fields are written.
///
/// Used for operator edits (name, abbreviation, colour), preset
/// application, and imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct TeamUpdate {
    /// New display name.
    #[ts(optional)]
    pub name: Option<String>,
    /// New abbreviation.
    #[ts(optional)]
    pub abbreviation: Option<String>,
    /// New colour.
    #[ts(optional)]
    pub color: Option<String>,
    /// Overwrite the score.
    #[ts(optional)]
    pub score: Option<u32>,
    /// Overwrite the shot count.
    #[ts(optional)]
    pub shots: Option<u32>,
    /// Overwrite the timeout allowance.
    #[ts(optional)]
    pub timeouts: Option<u32>,
    /// Overwrite the timeouts used.
    #[ts(optional)]
    pub timeouts_used: Option<u32>,
    /// Overwrite the empty-net flag.
    #[ts(optional)]
    pub empty_net: Option<bool>,
}

impl TeamUpdate {
    /// Shallow-merge this update into `team`.
    pub fn apply(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name.clone_from(name);
        }
        if let Some(abbreviation) = &self.abbreviation {
            team.abbreviation.clone_from(abbreviation);
        }
        if let Some(color) = &self.color {
            team.color.clone_from(color);
        }
        if let Some(score) = self.score {
            team.score = score;
        }
        if let Some(shots) = self.shots {
            team.shots = shots;
        }
        if let Some(timeouts) = self.timeouts {
            team.timeouts = timeouts;
        }
        if let Some(used) = self.timeouts_used {
            team.timeouts_used = used;
        }
        if let Some(empty_net) = self.empty_net {
            team.empty_net = empty_net;
        }
    }

    /// An update carrying every field of `team`.
    pub fn from_team(team: &Team) -> Self {
        Self {
            name: Some(team.name.clone()),
            abbreviation: Some(team.abbreviation.clone()),
            color: Some(team.color.clone()),
            score: Some(team.score),
            shots: Some(team.shots),
            timeouts: Some(team.timeouts),
            timeouts_used: Some(team.timeouts_used),
            empty_net: Some(team.empty_net),
        }
    }
}

// ---------------------------------------------------------------------------
// Penalty
// ---------------------------------------------------------------------------

/// A penalty currently being served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Penalty {
    /// Unique id assigned at creation.
    pub id: PenaltyId,
    /// Penalized side.
    pub team: TeamSide,
    /// Jersey number as entered (may be empty).
    pub player_number: String,
    /// Full length in seconds.
    pub duration: u32,
    /// Seconds left to serve; `0..=duration`.
    pub time_remaining: u32,
    /// Severity class.
    #[serde(rename = "type")]
    pub penalty_type: PenaltyType,
    /// Optional infraction text (e.g. "Tripping").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
}

/// Operator input for a new penalty (id and countdown are assigned by the
/// engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewPenalty {
    /// Penalized side.
    pub team: TeamSide,
    /// Jersey number as entered.
    #[serde(default)]
    pub player_number: String,
    /// Length in seconds.
    pub duration: u32,
    /// Severity class.
    #[serde(rename = "type")]
    pub penalty_type: PenaltyType,
    /// Optional infraction text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
}

impl NewPenalty {
    /// A penalty of the given class with its standard duration.
    pub fn standard(team: TeamSide, player_number: &str, penalty_type: PenaltyType) -> Self {
        Self {
            team,
            player_number: player_number.to_owned(),
            duration: penalty_type.default_duration_secs(),
            penalty_type,
            description: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Game Event
// ---------------------------------------------------------------------------

/// Extra detail attached to penalty and overtime events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct EventDetails {
    /// Penalized player's number.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub player_number: Option<String>,
    /// Penalty class.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub penalty_type: Option<PenaltyType>,
    /// Penalty length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub duration: Option<u32>,
    /// Free text (e.g. "Overtime").
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
}

/// An entry in the append-only game event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameEvent {
    /// Unique id.
    pub id: EventId,
    /// What happened.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Side the event belongs to (`home` for team-neutral period events).
    pub team: TeamSide,
    /// Wall-clock time, Unix milliseconds.
    pub timestamp: i64,
    /// Period in which the event occurred.
    pub period: u32,
    /// Clock value (seconds remaining) at the time of the event.
    pub game_time: u32,
    /// Optional extra detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<EventDetails>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Deep copy of the undoable part of the game state.
///
/// Restored as a whole by undo/redo; never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameStateSnapshot {
    /// Home team.
    pub home: Team,
    /// Away team.
    pub away: Team,
    /// Current period.
    pub period: u32,
    /// Clock value in seconds.
    pub time_remaining: u32,
    /// Whether the game is in overtime.
    pub is_overtime: bool,
    /// Active penalties.
    pub penalties: Vec<Penalty>,
    /// Event log.
    pub events: Vec<GameEvent>,
}

// ---------------------------------------------------------------------------
// Persisted local state
// ---------------------------------------------------------------------------

/// The document saved to local storage after every committed mutation.
///
/// Mirrors the browser scoreboard's `hockey-scoreboard-storage` entry and
/// must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PersistedState {
    /// Home team.
    pub home: Team,
    /// Away team.
    pub away: Team,
    /// Current period.
    pub period: u32,
    /// Regulation periods.
    pub max_periods: u32,
    /// Regulation period length in seconds.
    pub period_length: u32,
    /// Clock value in seconds.
    pub time_remaining: u32,
    /// Whether the game is in overtime.
    pub is_overtime: bool,
    /// Active penalties.
    pub penalties: Vec<Penalty>,
    /// UI colour scheme.
    pub theme: Theme,
    /// Whether horn/sound effects are on.
    pub sound_enabled: bool,
    /// Whether shot counters are displayed.
    pub show_shots: bool,
    /// Whether the penalty box is displayed.
    pub show_penalties: bool,
    /// Event log.
    pub events: Vec<GameEvent>,
    /// Undo/redo snapshots, oldest first.
    pub history_stack: Vec<GameStateSnapshot>,
    /// History cursor; `-1` when nothing can be undone.
    pub history_index: i64,
}

// ---------------------------------------------------------------------------
// Export file
// ---------------------------------------------------------------------------

/// The JSON export/import file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ExportData {
    /// Home team.
    pub home: Team,
    /// Away team.
    pub away: Team,
    /// Current period.
    pub period: u32,
    /// Clock value in seconds.
    #[serde(default)]
    pub time_remaining: u32,
    /// Whether the game is in overtime.
    #[serde(default)]
    pub is_overtime: bool,
    /// Event log.
    #[serde(default)]
    pub events: Vec<GameEvent>,
    /// When the export was produced.
    #[serde(default)]
    pub exported_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Shared remote record
// ---------------------------------------------------------------------------

/// The record a host publishes under its game code for viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SharedGameRecord {
    /// Home team.
    pub home: Team,
    /// Away team.
    pub away: Team,
    /// Current period.
    pub period: u32,
    /// Clock value in seconds.
    pub time_remaining: u32,
    /// Whether the game is in overtime.
    pub is_overtime: bool,
    /// Whether the host's clock is running.
    pub is_running: bool,
    /// Active penalties.
    pub penalties: Vec<Penalty>,
    /// Event log.
    pub events: Vec<GameEvent>,
    /// Opaque id of the publishing host.
    pub host_id: String,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
    /// Last write time, Unix milliseconds.
    pub updated_at: i64,
    /// Number of registered viewers (filled in by the store on read).
    #[serde(default)]
    pub viewer_count: u32,
}

/// A partial write to a [`SharedGameRecord`].
///
/// Pending updates are coalesced field by field: a newer `Some` replaces an
/// older value, a newer `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct SharedGameUpdate {
    /// Home team.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub home: Option<Team>,
    /// Away team.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub away: Option<Team>,
    /// Current period.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub period: Option<u32>,
    /// Clock value in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub time_remaining: Option<u32>,
    /// Overtime flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_overtime: Option<bool>,
    /// Clock running flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_running: Option<bool>,
    /// Active penalties.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub penalties: Option<Vec<Penalty>>,
    /// Event log.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub events: Option<Vec<GameEvent>>,
    /// Write time, Unix milliseconds (stamped when flushed).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_at: Option<i64>,
}

impl SharedGameUpdate {
    /// Fold a newer update into this one, last write wins per field.
    pub fn merge(&mut self, newer: Self) {
        self.home = newer.home.or_else(|| self.home.take());
        self.away = newer.away.or_else(|| self.away.take());
        self.period = newer.period.or(self.period);
        self.time_remaining = newer.time_remaining.or(self.time_remaining);
        self.is_overtime = newer.is_overtime.or(self.is_overtime);
        self.is_running = newer.is_running.or(self.is_running);
        self.penalties = newer.penalties.or_else(|| self.penalties.take());
        self.events = newer.events.or_else(|| self.events.take());
        self.updated_at = newer.updated_at.or(self.updated_at);
    }

    /// Whether no field is set.
    pub const fn is_empty(&self) -> bool {
        self.home.is_none()
            && self.away.is_none()
            && self.period.is_none()
            && self.time_remaining.is_none()
            && self.is_overtime.is_none()
            && self.is_running.is_none()
            && self.penalties.is_none()
            && self.events.is_none()
            && self.updated_at.is_none()
    }

    /// Write every set field into `record`.
    pub fn apply_to(&self, record: &mut SharedGameRecord) {
        if let Some(home) = &self.home {
            record.home.clone_from(home);
        }
        if let Some(away) = &self.away {
            record.away.clone_from(away);
        }
        if let Some(period) = self.period {
            record.period = period;
        }
        if let Some(time_remaining) = self.time_remaining {
            record.time_remaining = time_remaining;
        }
        if let Some(is_overtime) = self.is_overtime {
            record.is_overtime = is_overtime;
        }
        if let Some(is_running) = self.is_running {
            record.is_running = is_running;
        }
        if let Some(penalties) = &self.penalties {
            record.penalties.clone_from(penalties);
        }
        if let Some(events) = &self.events {
            record.events.clone_from(events);
        }
        if let Some(updated_at) = self.updated_at {
            record.updated_at = updated_at;
        }
    }
}

// ---------------------------------------------------------------------------
// Live views
// ---------------------------------------------------------------------------

/// Read-only projection of the engine pushed to UIs after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameView {
    /// Home team.
    pub home: Team,
    /// Away team.
    pub away: Team,
    /// Current period.
    pub period: u32,
    /// Regulation periods.
    pub max_periods: u32,
    /// Regulation period length in seconds.
    pub period_length: u32,
    /// Clock value in seconds.
    pub time_remaining: u32,
    /// Whether the clock is running.
    pub is_running: bool,
    /// Whether the game is in overtime.
    pub is_overtime: bool,
    /// Active penalties.
    pub penalties: Vec<Penalty>,
    /// Event log.
    pub events: Vec<GameEvent>,
    /// UI colour scheme.
    pub theme: Theme,
    /// Whether sound effects are on.
    pub sound_enabled: bool,
    /// Whether shot counters are displayed.
    pub show_shots: bool,
    /// Whether the penalty box is displayed.
    pub show_penalties: bool,
    /// Whether an undo is available.
    pub can_undo: bool,
    /// Whether a redo is available.
    pub can_redo: bool,
    /// Home team has a man advantage.
    pub home_power_play: bool,
    /// Away team has a man advantage.
    pub away_power_play: bool,
}

/// Snapshot of the sync bridge's connection state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SyncStatusView {
    /// Current role.
    pub mode: SyncMode,
    /// Connection status.
    pub status: SyncStatus,
    /// Code of the shared game, when connected.
    pub game_code: Option<GameCode>,
    /// Viewers currently registered on the shared game.
    pub viewer_count: u32,
    /// Last error, human readable.
    pub error: Option<String>,
    /// Link viewers can open to join.
    pub share_url: Option<String>,
}

/// Display options for the read-only broadcast overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct OverlayOptions {
    /// Layout.
    pub theme: OverlayTheme,
    /// Placement.
    pub position: OverlayPosition,
    /// Whether penalties are shown.
    pub show_penalties: bool,
    /// Whether the background is transparent.
    pub transparent: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            theme: OverlayTheme::Minimal,
            position: OverlayPosition::Top,
            show_penalties: true,
            transparent: true,
        }
    }
}
