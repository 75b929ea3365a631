//! Enumeration types for the Rinkside scoreboard.
//!
//! Wire names match the browser scoreboard's JSON documents exactly
//! (`"home"`, `"double-minor"`, `"goal"`, ...), so persisted state and
//! exported games written by either side deserialize on the other.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TeamSide {
    /// The home team.
    Home,
    /// The visiting team.
    Away,
}

impl TeamSide {
    /// Return the opposing side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// Return the lowercase wire name (`home` / `away`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

impl core::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

/// Severity class of a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum PenaltyType {
    /// Two minutes.
    Minor,
    /// Four minutes (two consecutive minors).
    DoubleMinor,
    /// Five minutes.
    Major,
    /// Ten minutes.
    Misconduct,
}

impl PenaltyType {
    /// Standard duration of this penalty class in seconds.
    pub const fn default_duration_secs(self) -> u32 {
        match self {
            Self::Minor => 120,
            Self::DoubleMinor => 240,
            Self::Major => 300,
            Self::Misconduct => 600,
        }
    }

    /// Return the kebab-case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::DoubleMinor => "double-minor",
            Self::Major => "major",
            Self::Misconduct => "misconduct",
        }
    }
}

impl core::fmt::Display for PenaltyType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Kind of entry in the game event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// A goal was scored.
    Goal,
    /// A penalty was assessed.
    Penalty,
    /// A new period (or overtime) began.
    Period,
    /// A team called its timeout.
    Timeout,
    /// A shot on goal was recorded.
    Shot,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Colour scheme of the operator UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Theme {
    /// Dark background (default).
    #[default]
    Dark,
    /// Light background.
    Light,
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

/// Role of this scoreboard instance with respect to a shared game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SyncMode {
    /// Standalone; nothing is shared.
    #[default]
    Local,
    /// Authoritative writer publishing to viewers.
    Host,
    /// Read-only mirror of a hosted game.
    Viewer,
}

/// Connection status of the sync bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SyncStatus {
    /// Not connected to any shared game.
    #[default]
    Disconnected,
    /// A host or join request is in flight.
    Connecting,
    /// Connected and exchanging updates.
    Connected,
    /// The last host or join attempt failed.
    Error,
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Layout of the broadcast overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum OverlayTheme {
    /// Compact score bug.
    #[default]
    Minimal,
    /// Full scoreboard strip.
    Full,
}

/// Vertical placement of the broadcast overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum OverlayPosition {
    /// Top of the frame.
    #[default]
    Top,
    /// Bottom of the frame.
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_durations_match_rulebook() {
        assert_eq!(PenaltyType::Minor.default_duration_secs(), 120);
        assert_eq!(PenaltyType::DoubleMinor.default_duration_secs(), 240);
        assert_eq!(PenaltyType::Major.default_duration_secs(), 300);
        assert_eq!(PenaltyType::Misconduct.default_duration_secs(), 600);
    }

    #[test]
    fn double_minor_uses_kebab_case() {
        let json = serde_json::to_string(&PenaltyType::DoubleMinor).ok();
        assert_eq!(json.as_deref(), Some("\"double-minor\""));
        let parsed: Result<PenaltyType, _> = serde_json::from_str("\"double-minor\"");
        assert_eq!(parsed.ok(), Some(PenaltyType::DoubleMinor));
    }

    #[test]
    fn opponent_is_symmetric() {
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
        assert_eq!(TeamSide::Away.opponent().opponent(), TeamSide::Away);
    }
}
