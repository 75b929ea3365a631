//! Operator commands.
//!
//! [`GameCommand`] is the serializable form of every engine operation, so
//! the REST API, voice control, and tests can all drive the engine through
//! one entry point. On the wire a command is a JSON object tagged by
//! `action`, e.g. `{"action":"addGoal","team":"home"}`.

use rinkside_types::{NewPenalty, PenaltyId, TeamSide, TeamUpdate, Theme};
use serde::{Deserialize, Serialize};

use crate::engine::GameEngine;
use crate::presets;
use crate::settings::SettingsUpdate;

/// Errors from applying a command.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    /// No preset with this abbreviation.
    #[error("unknown team preset: {0}")]
    UnknownPreset(String),

    /// A penalty must last at least one second.
    #[error("penalty duration must be greater than zero")]
    InvalidPenalty,
}

/// A single engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameCommand {
    /// Goal for a team.
    AddGoal {
        /// Scoring side.
        team: TeamSide,
    },
    /// Take back a goal.
    RemoveGoal {
        /// Side losing the goal.
        team: TeamSide,
    },
    /// Shot on goal.
    AddShot {
        /// Shooting side.
        team: TeamSide,
    },
    /// Take back a shot.
    RemoveShot {
        /// Side losing the shot.
        team: TeamSide,
    },
    /// Start the clock.
    StartTimer,
    /// Stop the clock.
    StopTimer,
    /// Flip the clock.
    ToggleTimer,
    /// Set the clock.
    SetTime {
        /// New time remaining in seconds.
        seconds: i64,
    },
    /// Nudge the clock.
    AdjustTime {
        /// Seconds to add (negative to subtract).
        delta: i64,
    },
    /// Next period or overtime.
    NextPeriod,
    /// Previous period.
    PrevPeriod,
    /// Jump to a period.
    SetPeriod {
        /// Target period.
        period: u32,
    },
    /// Assess a penalty.
    AddPenalty(NewPenalty),
    /// Release a penalty.
    RemovePenalty {
        /// Penalty to release.
        id: PenaltyId,
    },
    /// Release all penalties, or one team's.
    ClearPenalties {
        /// Restrict to this side.
        #[serde(default)]
        team: Option<TeamSide>,
    },
    /// Edit a team record.
    UpdateTeam {
        /// Side to edit.
        team: TeamSide,
        /// Fields to change.
        update: TeamUpdate,
    },
    /// Apply a built-in team identity.
    ApplyPreset {
        /// Side to edit.
        team: TeamSide,
        /// Preset abbreviation (e.g. `TOR`).
        abbreviation: String,
    },
    /// Pull or return the goaltender.
    ToggleEmptyNet {
        /// Side.
        team: TeamSide,
    },
    /// Call a timeout.
    UseTimeout {
        /// Side.
        team: TeamSide,
    },
    /// Start a new game.
    NewGame,
    /// Zero scores, shots, and timeouts.
    ResetScores,
    /// Change the colour scheme.
    SetTheme {
        /// New theme.
        theme: Theme,
    },
    /// Flip sounds.
    ToggleSound,
    /// Change settings.
    SetSettings(SettingsUpdate),
    /// Undo.
    Undo,
    /// Redo.
    Redo,
    /// Drop history and events.
    ClearHistory,
}

impl GameEngine {
    /// Dispatch a command to the matching engine operation.
    ///
    /// No-op conditions (undo with nothing to undo, a third timeout, ...)
    /// succeed silently.
    pub fn apply(&mut self, command: &GameCommand) -> Result<(), CommandError> {
        match command {
            GameCommand::AddGoal { team } => self.add_goal(*team),
            GameCommand::RemoveGoal { team } => {
                self.remove_goal(*team);
            }
            GameCommand::AddShot { team } => self.add_shot(*team),
            GameCommand::RemoveShot { team } => self.remove_shot(*team),
            GameCommand::StartTimer => self.start_timer(),
            GameCommand::StopTimer => self.stop_timer(),
            GameCommand::ToggleTimer => self.toggle_timer(),
            GameCommand::SetTime { seconds } => self.set_time(*seconds),
            GameCommand::AdjustTime { delta } => self.adjust_time(*delta),
            GameCommand::NextPeriod => {
                self.next_period();
            }
            GameCommand::PrevPeriod => self.prev_period(),
            GameCommand::SetPeriod { period } => self.set_period(*period),
            GameCommand::AddPenalty(penalty) => {
                self.add_penalty(penalty.clone())?;
            }
            GameCommand::RemovePenalty { id } => {
                self.remove_penalty(id);
            }
            GameCommand::ClearPenalties { team } => {
                self.clear_penalties(*team);
            }
            GameCommand::UpdateTeam { team, update } => self.update_team(*team, update),
            GameCommand::ApplyPreset { team, abbreviation } => {
                let preset = presets::find_by_abbreviation(abbreviation)
                    .ok_or_else(|| CommandError::UnknownPreset(abbreviation.clone()))?;
                self.update_team(*team, &preset.to_update());
            }
            GameCommand::ToggleEmptyNet { team } => self.toggle_empty_net(*team),
            GameCommand::UseTimeout { team } => {
                self.use_timeout(*team);
            }
            GameCommand::NewGame => self.new_game(),
            GameCommand::ResetScores => self.reset_scores(),
            GameCommand::SetTheme { theme } => self.set_theme(*theme),
            GameCommand::ToggleSound => self.toggle_sound(),
            GameCommand::SetSettings(update) => self.set_settings(update),
            GameCommand::Undo => {
                self.undo();
            }
            GameCommand::Redo => {
                self.redo();
            }
            GameCommand::ClearHistory => self.clear_history(),
        }
        Ok(())
    }
}
