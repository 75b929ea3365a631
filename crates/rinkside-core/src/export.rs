//! JSON export/import and the plain-text game summary.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rinkside_types::{EventType, ExportData, GameEvent, PenaltyType, TeamSide, TeamUpdate};
use serde::Deserialize;

use crate::engine::GameEngine;
use crate::format::{format_penalty_time, period_label};

/// Why an import was rejected. The messages are shown to operators as is.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImportError {
    /// Well-formed JSON without `home`/`away` objects or a numeric `period`.
    #[error("Invalid game data format")]
    InvalidFormat,
    /// Not JSON at all.
    #[error("Failed to parse game data")]
    ParseFailed,
}

/// A validated import. Team records are merged field by field, so files
/// written by older versions with fewer team fields still load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportData {
    /// Home team fields.
    pub home: TeamUpdate,
    /// Away team fields.
    pub away: TeamUpdate,
    /// Period to resume in.
    pub period: u32,
    /// Clock value to resume at.
    #[serde(default)]
    pub time_remaining: Option<u32>,
    /// Overtime flag.
    #[serde(default)]
    pub is_overtime: Option<bool>,
    /// Event log to restore.
    #[serde(default)]
    pub events: Option<Vec<GameEvent>>,
}

/// Validate an import document.
pub fn parse_import(json: &str) -> Result<ImportData, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|_err| ImportError::ParseFailed)?;
    let well_formed = value.get("home").is_some_and(serde_json::Value::is_object)
        && value.get("away").is_some_and(serde_json::Value::is_object)
        && value.get("period").is_some_and(serde_json::Value::is_number);
    if !well_formed {
        return Err(ImportError::InvalidFormat);
    }
    serde_json::from_value(value).map_err(|_err| ImportError::InvalidFormat)
}

/// File name offered for a JSON export.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("hockey-game-{}.json", now.timestamp_millis())
}

impl GameEngine {
    /// The export document for the current game.
    pub fn export_data(&self, exported_at: DateTime<Utc>) -> ExportData {
        ExportData {
            home: self.team(TeamSide::Home).clone(),
            away: self.team(TeamSide::Away).clone(),
            period: self.clock().period(),
            time_remaining: self.clock().time_remaining(),
            is_overtime: self.clock().is_overtime(),
            events: self.events().as_slice().to_vec(),
            exported_at,
        }
    }

    /// Load an import over the current game. The previous state is kept as
    /// an undo point.
    pub fn apply_import(&mut self, data: &ImportData) {
        self.checkpoint();
        self.update_team(TeamSide::Home, &data.home);
        self.update_team(TeamSide::Away, &data.away);

        let clock = self.clock_mut();
        clock.set_period(data.period);
        if let Some(time) = data.time_remaining {
            clock.set_time(i64::from(time));
        }
        if let Some(is_overtime) = data.is_overtime {
            let (period, time) = (clock.period(), clock.time_remaining());
            clock.restore(period, time, is_overtime);
        }
        if let Some(events) = &data.events {
            self.events_mut().replace(events.clone());
        }
    }

    /// Plain-text game summary: score line, statistics, and every event
    /// except shots.
    pub fn summary_text(&self, generated_at: DateTime<Utc>) -> String {
        let home = self.team(TeamSide::Home);
        let away = self.team(TeamSide::Away);
        let clock = self.clock();
        let mut out = String::new();

        let _ = writeln!(out, "Game Summary");
        let _ = writeln!(out, "{}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}  VS  {} {}",
            home.abbreviation, home.score, away.score, away.abbreviation
        );
        let _ = writeln!(
            out,
            "{} - {}",
            period_label(clock.period(), clock.is_overtime()),
            format_penalty_time(clock.time_remaining())
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "Game Statistics");
        let rows = [
            ("", home.abbreviation.clone(), away.abbreviation.clone()),
            ("Goals", home.score.to_string(), away.score.to_string()),
            ("Shots", home.shots.to_string(), away.shots.to_string()),
            (
                "Timeouts Used",
                home.timeouts_used.to_string(),
                away.timeouts_used.to_string(),
            ),
        ];
        for (label, h, a) in rows {
            let _ = writeln!(out, "{label:<15}{h:>6}{a:>6}");
        }

        let significant: Vec<&GameEvent> = self.events().significant().collect();
        if !significant.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Game Events");
            for event in significant {
                let _ = writeln!(
                    out,
                    "P{} {:>5}  {}",
                    event.period,
                    format_penalty_time(event.game_time),
                    self.describe_event(event)
                );
            }
        }
        out
    }

    fn describe_event(&self, event: &GameEvent) -> String {
        let team = &self.team(event.team).abbreviation;
        match event.event_type {
            EventType::Goal => format!("GOAL - {team}"),
            EventType::Penalty => {
                let details = event.details.as_ref();
                let player = details
                    .and_then(|d| d.player_number.as_deref())
                    .filter(|n| !n.is_empty())
                    .map(|n| format!("#{n}"))
                    .unwrap_or_default();
                let kind = details
                    .and_then(|d| d.penalty_type)
                    .map_or("minor", PenaltyType::as_str);
                format!("PENALTY - {team} {player} ({kind})")
            }
            EventType::Period => event
                .details
                .as_ref()
                .and_then(|d| d.description.clone())
                .unwrap_or_else(|| format!("Period {} Started", event.period)),
            EventType::Timeout => format!("TIMEOUT - {team}"),
            EventType::Shot => format!("Shot - {team}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rinkside_types::NewPenalty;

    use super::*;

    #[test]
    fn export_then_import_reproduces_the_game() {
        let mut source = GameEngine::default();
        source.update_team(
            TeamSide::Home,
            &TeamUpdate {
                name: Some("Kraken".to_owned()),
                ..TeamUpdate::default()
            },
        );
        source.add_goal(TeamSide::Home);
        source.add_goal(TeamSide::Away);
        source.add_penalty(NewPenalty::standard(TeamSide::Away, "44", PenaltyType::Minor)).unwrap();
        source.next_period();
        source.next_period();
        source.next_period();
        source.set_time(123);

        let export = source.export_data(Utc::now());
        let json = serde_json::to_string_pretty(&export).unwrap();
        let import = parse_import(&json).unwrap();

        let mut target = GameEngine::default();
        target.apply_import(&import);
        let round_trip = target.export_data(export.exported_at);

        assert_eq!(round_trip.home, export.home);
        assert_eq!(round_trip.away, export.away);
        assert_eq!(round_trip.period, 4);
        assert_eq!(round_trip.time_remaining, 123);
        assert!(round_trip.is_overtime);
        assert_eq!(round_trip.events, export.events);
        assert!(target.can_undo());
    }

    #[test]
    fn exported_at_is_iso_8601() {
        let export = GameEngine::default().export_data(Utc::now());
        let json = serde_json::to_value(&export).unwrap();
        let stamp = json["exportedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn import_rejects_missing_fields() {
        assert_eq!(
            parse_import(r#"{"home":{},"away":{}}"#),
            Err(ImportError::InvalidFormat)
        );
        assert_eq!(
            parse_import(r#"{"home":{},"away":{},"period":"2"}"#),
            Err(ImportError::InvalidFormat)
        );
        assert_eq!(
            parse_import(r#"{"home":"TOR","away":{},"period":2}"#),
            Err(ImportError::InvalidFormat)
        );
    }

    #[test]
    fn import_rejects_garbage() {
        let err = parse_import("not json").unwrap_err();
        assert_eq!(err, ImportError::ParseFailed);
        assert_eq!(err.to_string(), "Failed to parse game data");
        assert_eq!(
            ImportError::InvalidFormat.to_string(),
            "Invalid game data format"
        );
    }

    #[test]
    fn import_merges_partial_teams() {
        let data = parse_import(r#"{"home":{"name":"Jets","score":3},"away":{},"period":2}"#)
            .unwrap();
        let mut engine = GameEngine::default();
        engine.set_time(500);
        engine.apply_import(&data);
        let home = engine.team(TeamSide::Home);
        assert_eq!(home.name, "Jets");
        assert_eq!(home.score, 3);
        assert_eq!(home.abbreviation, "HOME");
        assert_eq!(engine.clock().period(), 2);
        assert_eq!(engine.clock().time_remaining(), 500);
    }

    #[test]
    fn summary_lists_significant_events() {
        let mut engine = GameEngine::default();
        engine.set_time(1150);
        engine.add_goal(TeamSide::Home);
        engine.add_shot(TeamSide::Away);
        engine.add_penalty(NewPenalty::standard(TeamSide::Away, "9", PenaltyType::Major)).unwrap();
        engine.use_timeout(TeamSide::Away);

        let text = engine.summary_text(Utc::now());
        assert!(text.contains("HOME 1  VS  0 AWAY"));
        assert!(text.contains("P1 - 19:10"));
        assert!(text.contains("GOAL - HOME"));
        assert!(text.contains("PENALTY - AWAY #9 (major)"));
        assert!(text.contains("TIMEOUT - AWAY"));
        assert!(!text.contains("Shot - AWAY"));
    }

    #[test]
    fn export_file_name_uses_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(export_file_name(now), "hockey-game-1700000000123.json");
    }
}
