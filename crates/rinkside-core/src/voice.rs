//! Spoken command grammar.
//!
//! Speech recognition happens elsewhere; this module only maps a finished
//! transcript to an action. Each row of the grammar is an anchored regular
//! expression over the trimmed, lowercased transcript; whitespace between
//! words is optional, so "home goal", "Home  Goal", and "homegoal" are the
//! same utterance. Anything not in the grammar yields `None`.
//!
//! | Utterance                                   | Action              |
//! |---------------------------------------------|---------------------|
//! | home/host [team] goal/score/scored          | goal, home          |
//! | away/visitor/visiting [team] goal/score/... | goal, away          |
//! | undo                                        | undo                |
//! | undo home [goal], undo away [goal]          | remove goal         |
//! | remove/subtract [home/away] goal            | remove goal         |
//! | start/go/play/resume [timer/clock/game]     | start clock         |
//! | stop/pause/freeze/hold [timer/clock/game]   | stop clock          |
//! | toggle [timer]                              | toggle clock        |
//! | next/advance period                         | next period         |
//! | previous/back/last period                   | previous period     |
//! | period one/two/three (or 1/2/3)             | set period          |
//! | home/away penalty [number]                  | two-minute minor    |
//! | home/away empty net                         | toggle empty net    |
//! | home/away time out                          | timeout             |
//! | reset/new [game/score/scores]               | new game            |

use std::sync::LazyLock;

use regex::{Captures, Regex};
use rinkside_types::{NewPenalty, PenaltyType, TeamSide};
use serde::Serialize;
use tracing::warn;

use crate::command::GameCommand;

/// A recognized spoken command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum VoiceAction {
    /// Goal for a team.
    Goal {
        /// Scoring side.
        team: TeamSide,
    },
    /// Remove a goal.
    RemoveGoal {
        /// Side losing the goal.
        team: TeamSide,
    },
    /// Undo the last change.
    Undo,
    /// Start the clock.
    StartTimer,
    /// Stop the clock.
    StopTimer,
    /// Flip the clock.
    ToggleTimer,
    /// Next period.
    NextPeriod,
    /// Previous period.
    PrevPeriod,
    /// Jump to a period.
    SetPeriod {
        /// Target period.
        period: u32,
    },
    /// Minor penalty.
    Penalty {
        /// Penalized side.
        team: TeamSide,
        /// Jersey number, possibly empty.
        player_number: String,
    },
    /// Toggle the empty net.
    EmptyNet {
        /// Side.
        team: TeamSide,
    },
    /// Call a timeout.
    Timeout {
        /// Side.
        team: TeamSide,
    },
    /// Start a new game.
    Reset,
}

impl VoiceAction {
    /// The engine command this action triggers. Penalties called by voice
    /// are always two-minute minors.
    pub fn into_command(self) -> GameCommand {
        match self {
            Self::Goal { team } => GameCommand::AddGoal { team },
            Self::RemoveGoal { team } => GameCommand::RemoveGoal { team },
            Self::Undo => GameCommand::Undo,
            Self::StartTimer => GameCommand::StartTimer,
            Self::StopTimer => GameCommand::StopTimer,
            Self::ToggleTimer => GameCommand::ToggleTimer,
            Self::NextPeriod => GameCommand::NextPeriod,
            Self::PrevPeriod => GameCommand::PrevPeriod,
            Self::SetPeriod { period } => GameCommand::SetPeriod { period },
            Self::Penalty {
                team,
                player_number,
            } => GameCommand::AddPenalty(NewPenalty::standard(
                team,
                &player_number,
                PenaltyType::Minor,
            )),
            Self::EmptyNet { team } => GameCommand::ToggleEmptyNet { team },
            Self::Timeout { team } => GameCommand::UseTimeout { team },
            Self::Reset => GameCommand::NewGame,
        }
    }
}

/// How a matched grammar row becomes an action.
#[derive(Debug, Clone, Copy)]
enum Rule {
    Goal(TeamSide),
    UndoOrRemoveGoal,
    RemoveGoal,
    StartTimer,
    StopTimer,
    ToggleTimer,
    NextPeriod,
    PrevPeriod,
    SetPeriod(u32),
    Penalty,
    Reset,
    EmptyNet,
    Timeout,
}

/// The grammar, tried in order against the trimmed, lowercased transcript.
const GRAMMAR: &[(&str, Rule)] = &[
    (
        r"^(home|host)\s*(team\s*)?(goal|score|scored)$",
        Rule::Goal(TeamSide::Home),
    ),
    (
        r"^(away|visitor|visiting)\s*(team\s*)?(goal|score|scored)$",
        Rule::Goal(TeamSide::Away),
    ),
    (
        r"^undo\s*(?P<team>home|host|away|visitor)?\s*(goal)?$",
        Rule::UndoOrRemoveGoal,
    ),
    (
        r"^(remove|subtract)\s*(?P<team>home|away)?\s*goal$",
        Rule::RemoveGoal,
    ),
    (r"^(start|go|play|resume)\s*(timer|clock|game)?$", Rule::StartTimer),
    (r"^(stop|pause|freeze|hold)\s*(timer|clock|game)?$", Rule::StopTimer),
    (r"^toggle\s*(timer)?$", Rule::ToggleTimer),
    (r"^(next|advance)\s*period$", Rule::NextPeriod),
    (r"^(previous|back|last)\s*period$", Rule::PrevPeriod),
    (r"^period\s*(one|1)$", Rule::SetPeriod(1)),
    (r"^period\s*(two|2)$", Rule::SetPeriod(2)),
    (r"^period\s*(three|3)$", Rule::SetPeriod(3)),
    (
        r"^(?P<team>home|away)\s*penalty\s*(?P<number>[0-9]+)?$",
        Rule::Penalty,
    ),
    (r"^(reset|new)\s*(game|scores?)?$", Rule::Reset),
    (r"^(?P<team>home|away)\s*empty\s*net$", Rule::EmptyNet),
    (r"^(?P<team>home|away)\s*time\s*out$", Rule::Timeout),
];

static PATTERNS: LazyLock<Vec<(Regex, Rule)>> = LazyLock::new(|| {
    GRAMMAR
        .iter()
        .filter_map(|&(pattern, rule)| match Regex::new(pattern) {
            Ok(re) => Some((re, rule)),
            Err(e) => {
                warn!(pattern, error = %e, "Voice pattern failed to compile");
                None
            }
        })
        .collect()
});

fn team(captures: &Captures<'_>) -> Option<TeamSide> {
    match captures.name("team")?.as_str() {
        "home" | "host" => Some(TeamSide::Home),
        "away" | "visitor" | "visiting" => Some(TeamSide::Away),
        _ => None,
    }
}

impl Rule {
    fn action(self, captures: &Captures<'_>) -> Option<VoiceAction> {
        let action = match self {
            Self::Goal(team) => VoiceAction::Goal { team },
            Self::UndoOrRemoveGoal => match team(captures) {
                Some(team) => VoiceAction::RemoveGoal { team },
                None => VoiceAction::Undo,
            },
            Self::RemoveGoal => VoiceAction::RemoveGoal {
                team: team(captures).unwrap_or(TeamSide::Home),
            },
            Self::StartTimer => VoiceAction::StartTimer,
            Self::StopTimer => VoiceAction::StopTimer,
            Self::ToggleTimer => VoiceAction::ToggleTimer,
            Self::NextPeriod => VoiceAction::NextPeriod,
            Self::PrevPeriod => VoiceAction::PrevPeriod,
            Self::SetPeriod(period) => VoiceAction::SetPeriod { period },
            Self::Penalty => VoiceAction::Penalty {
                team: team(captures)?,
                player_number: captures
                    .name("number")
                    .map(|m| m.as_str().to_owned())
                    .unwrap_or_default(),
            },
            Self::Reset => VoiceAction::Reset,
            Self::EmptyNet => VoiceAction::EmptyNet {
                team: team(captures)?,
            },
            Self::Timeout => VoiceAction::Timeout {
                team: team(captures)?,
            },
        };
        Some(action)
    }
}

/// Map a transcript to an action.
pub fn parse_voice_command(transcript: &str) -> Option<VoiceAction> {
    let text = transcript.trim().to_lowercase();
    PATTERNS.iter().find_map(|(re, rule)| {
        let captures = re.captures(&text)?;
        rule.action(&captures)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<VoiceAction> {
        parse_voice_command(text)
    }

    #[test]
    fn goals() {
        let home = Some(VoiceAction::Goal {
            team: TeamSide::Home,
        });
        let away = Some(VoiceAction::Goal {
            team: TeamSide::Away,
        });
        assert_eq!(parse("home goal"), home);
        assert_eq!(parse("Host team scored"), home);
        assert_eq!(parse("  HOME  SCORE "), home);
        assert_eq!(parse("homegoal"), home);
        assert_eq!(parse("away team scored"), away);
        assert_eq!(parse("visiting goal"), away);
        assert_eq!(parse("visitor score"), away);
    }

    #[test]
    fn undo_and_remove_goal() {
        assert_eq!(parse("undo"), Some(VoiceAction::Undo));
        assert_eq!(parse("undo goal"), Some(VoiceAction::Undo));
        assert_eq!(
            parse("undo home goal"),
            Some(VoiceAction::RemoveGoal {
                team: TeamSide::Home
            })
        );
        assert_eq!(
            parse("undo away goal"),
            Some(VoiceAction::RemoveGoal {
                team: TeamSide::Away
            })
        );
        assert_eq!(
            parse("remove away goal"),
            Some(VoiceAction::RemoveGoal {
                team: TeamSide::Away
            })
        );
        assert_eq!(
            parse("subtract goal"),
            Some(VoiceAction::RemoveGoal {
                team: TeamSide::Home
            })
        );
    }

    #[test]
    fn clock_control() {
        assert_eq!(parse("start clock"), Some(VoiceAction::StartTimer));
        assert_eq!(parse("go"), Some(VoiceAction::StartTimer));
        assert_eq!(parse("resume game"), Some(VoiceAction::StartTimer));
        assert_eq!(parse("pause"), Some(VoiceAction::StopTimer));
        assert_eq!(parse("hold timer"), Some(VoiceAction::StopTimer));
        assert_eq!(parse("toggle"), Some(VoiceAction::ToggleTimer));
        assert_eq!(parse("toggle timer"), Some(VoiceAction::ToggleTimer));
    }

    #[test]
    fn periods() {
        assert_eq!(parse("next period"), Some(VoiceAction::NextPeriod));
        assert_eq!(parse("advance period"), Some(VoiceAction::NextPeriod));
        assert_eq!(parse("back period"), Some(VoiceAction::PrevPeriod));
        assert_eq!(parse("period two"), Some(VoiceAction::SetPeriod { period: 2 }));
        assert_eq!(parse("period 3"), Some(VoiceAction::SetPeriod { period: 3 }));
        assert_eq!(parse("period four"), None);
    }

    #[test]
    fn penalties_are_minors() {
        let action = parse("away penalty 7");
        assert_eq!(
            action,
            Some(VoiceAction::Penalty {
                team: TeamSide::Away,
                player_number: "7".to_owned()
            })
        );
        let expected = NewPenalty::standard(TeamSide::Away, "7", PenaltyType::Minor);
        assert_eq!(expected.duration, 120);
        assert_eq!(
            action.map(VoiceAction::into_command),
            Some(GameCommand::AddPenalty(expected))
        );

        assert_eq!(
            parse("home penalty"),
            Some(VoiceAction::Penalty {
                team: TeamSide::Home,
                player_number: String::new()
            })
        );
        assert_eq!(parse("home penalty seven"), None);
        assert_eq!(parse("home penalty 1 2"), None);
        assert_eq!(
            parse("home penalty12"),
            Some(VoiceAction::Penalty {
                team: TeamSide::Home,
                player_number: "12".to_owned()
            })
        );
    }

    #[test]
    fn empty_net_timeout_and_reset() {
        assert_eq!(
            parse("home empty net"),
            Some(VoiceAction::EmptyNet {
                team: TeamSide::Home
            })
        );
        assert_eq!(
            parse("away time out"),
            Some(VoiceAction::Timeout {
                team: TeamSide::Away
            })
        );
        assert_eq!(
            parse("away timeout"),
            Some(VoiceAction::Timeout {
                team: TeamSide::Away
            })
        );
        assert_eq!(parse("new game"), Some(VoiceAction::Reset));
        assert_eq!(parse("reset scores"), Some(VoiceAction::Reset));
        assert_eq!(
            parse("reset").map(VoiceAction::into_command),
            Some(GameCommand::NewGame)
        );
    }

    #[test]
    fn unrecognized_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("home goal please"), None);
    }
}
