//! The game state engine.
//!
//! [`GameEngine`] is the single owner of a game's state: both teams, the
//! clock, the penalty box, the event log, settings, and the undo history.
//! Every change goes through a named method. Methods that an operator would
//! want to take back (goals, penalties, imports) record a snapshot of the
//! state *before* the change; clock and display changes do not.
//!
//! The engine is synchronous and has no I/O. Persistence, clock ticking, and
//! replication are layered on top by the host application.

use rinkside_types::{
    EventDetails, EventType, GameStateSnapshot, GameView, NewPenalty, Penalty, PenaltyId,
    PersistedState, SharedGameRecord, SharedGameUpdate, Team, TeamSide, TeamUpdate, Theme,
};
use tracing::debug;

use crate::clock::{ClockTick, GameClock, PeriodTransition};
use crate::command::CommandError;
use crate::config::GameConfig;
use crate::events::EventLog;
use crate::history::History;
use crate::penalty::PenaltyBox;
use crate::settings::{Settings, SettingsUpdate};

/// Authoritative in-memory model of one hockey game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    home: Team,
    away: Team,
    clock: GameClock,
    penalties: PenaltyBox,
    events: EventLog,
    settings: Settings,
    history: History<GameStateSnapshot>,
    timeouts_per_team: u32,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl GameEngine {
    /// Create a fresh game with default teams.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            home: Team::default_for(TeamSide::Home, config.timeouts_per_team),
            away: Team::default_for(TeamSide::Away, config.timeouts_per_team),
            clock: GameClock::new(
                config.period_length_secs,
                config.max_periods,
                config.overtime_length_secs,
            ),
            penalties: PenaltyBox::new(),
            events: EventLog::new(),
            settings: Settings::default(),
            history: History::new(config.history_capacity),
            timeouts_per_team: config.timeouts_per_team,
        }
    }

    /// Rebuild an engine from a saved document. The clock always comes back
    /// stopped.
    pub fn from_persisted(config: &GameConfig, state: PersistedState) -> Self {
        let mut engine = Self::new(config);
        engine.restore_persisted(state);
        engine
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// One side's team record.
    pub const fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    const fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// The game clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Active penalties.
    pub fn penalties(&self) -> &[Penalty] {
        self.penalties.as_slice()
    }

    /// The event log.
    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// Display preferences.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Undo history.
    pub const fn history(&self) -> &History<GameStateSnapshot> {
        &self.history
    }

    pub(crate) const fn clock_mut(&mut self) -> &mut GameClock {
        &mut self.clock
    }

    pub(crate) const fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    /// Whether the scores are level.
    pub const fn is_tied(&self) -> bool {
        self.home.score == self.away.score
    }

    // -----------------------------------------------------------------------
    // Score and shots
    // -----------------------------------------------------------------------

    /// Credit `side` with a goal.
    pub fn add_goal(&mut self, side: TeamSide) {
        self.checkpoint();
        self.log(EventType::Goal, side, None);
        let team = self.team_mut(side);
        team.score = team.score.saturating_add(1);
        debug!(team = %side, score = team.score, "Goal");
    }

    /// Take a goal away from `side`. Does nothing when the score is zero.
    pub fn remove_goal(&mut self, side: TeamSide) -> bool {
        if self.team(side).score == 0 {
            return false;
        }
        self.checkpoint();
        let team = self.team_mut(side);
        team.score = team.score.saturating_sub(1);
        true
    }

    /// Record a shot on goal for `side`.
    pub fn add_shot(&mut self, side: TeamSide) {
        self.log(EventType::Shot, side, None);
        let team = self.team_mut(side);
        team.shots = team.shots.saturating_add(1);
    }

    /// Remove a shot from `side`, not going below zero.
    pub const fn remove_shot(&mut self, side: TeamSide) {
        let team = self.team_mut(side);
        team.shots = team.shots.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------------

    /// Start the clock.
    pub const fn start_timer(&mut self) {
        self.clock.start();
    }

    /// Stop the clock.
    pub const fn stop_timer(&mut self) {
        self.clock.stop();
    }

    /// Flip the clock between running and stopped.
    pub const fn toggle_timer(&mut self) {
        self.clock.toggle();
    }

    /// Set the time remaining (negative values become zero).
    pub fn set_time(&mut self, seconds: i64) {
        self.clock.set_time(seconds);
    }

    /// Count one second off the running clock. See [`GameClock::tick`].
    pub const fn tick_clock(&mut self) -> ClockTick {
        self.clock.tick()
    }

    /// Add or subtract seconds from the clock (floored at zero).
    pub fn adjust_time(&mut self, delta: i64) {
        self.clock.adjust_time(delta);
    }

    /// Advance to the next period, or to overtime when regulation is over
    /// and the game is tied. Records a period event on any transition.
    pub fn next_period(&mut self) -> PeriodTransition {
        let transition = self.clock.next_period(self.is_tied());
        match transition {
            PeriodTransition::Regulation(period) => {
                self.log(EventType::Period, TeamSide::Home, None);
                debug!(period, "Period started");
            }
            PeriodTransition::Overtime(period) => {
                let details = EventDetails {
                    description: Some("Overtime".to_owned()),
                    ..EventDetails::default()
                };
                self.log(EventType::Period, TeamSide::Home, Some(details));
                debug!(period, "Overtime started");
            }
            PeriodTransition::Unchanged => {}
        }
        transition
    }

    /// Go back one period. The clock keeps its current time.
    pub fn prev_period(&mut self) {
        self.clock.prev_period();
    }

    /// Jump to a period (clamped to regulation plus one overtime).
    pub fn set_period(&mut self, period: u32) {
        self.clock.set_period(period);
    }

    // -----------------------------------------------------------------------
    // Penalties
    // -----------------------------------------------------------------------

    /// Assess a penalty and log it.
    ///
    /// A zero-length penalty would expire before it is served, so it is
    /// rejected without touching history or the event log.
    pub fn add_penalty(&mut self, input: NewPenalty) -> Result<Penalty, CommandError> {
        if input.duration == 0 {
            return Err(CommandError::InvalidPenalty);
        }
        self.checkpoint();
        let details = EventDetails {
            player_number: Some(input.player_number.clone()),
            penalty_type: Some(input.penalty_type),
            duration: Some(input.duration),
            description: input.description.clone(),
        };
        let team = input.team;
        self.log(EventType::Penalty, team, Some(details));
        let penalty = self.penalties.add(input);
        debug!(
            team = %team,
            player = %penalty.player_number,
            kind = %penalty.penalty_type,
            duration = penalty.duration,
            "Penalty assessed"
        );
        Ok(penalty)
    }

    /// Release a penalty early. Unknown ids are ignored and leave the
    /// history untouched.
    pub fn remove_penalty(&mut self, id: &PenaltyId) -> bool {
        if !self.penalties.contains(id) {
            return false;
        }
        self.checkpoint();
        self.penalties.remove(id).is_some()
    }

    /// Remove every penalty, or only those of one side.
    pub fn clear_penalties(&mut self, side: Option<TeamSide>) -> usize {
        self.penalties.clear(side)
    }

    /// Count one second off every penalty, releasing those that expire.
    pub fn tick_penalties(&mut self) -> Vec<Penalty> {
        self.penalties.tick()
    }

    /// Number of active penalties on `side`.
    pub fn penalty_count(&self, side: TeamSide) -> usize {
        self.penalties.count(side)
    }

    /// Whether `side` is on the power play.
    pub fn is_power_play(&self, side: TeamSide) -> bool {
        self.penalties.is_power_play(side)
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    /// Merge `update` into a team record.
    pub fn update_team(&mut self, side: TeamSide, update: &TeamUpdate) {
        let team = self.team_mut(side);
        update.apply(team);
        team.timeouts_used = team.timeouts_used.min(team.timeouts);
    }

    /// Pull or return the goaltender.
    pub const fn toggle_empty_net(&mut self, side: TeamSide) {
        let team = self.team_mut(side);
        team.empty_net = !team.empty_net;
    }

    /// Call a timeout for `side`: stops the clock and logs it. Does nothing
    /// when the team has none left.
    pub fn use_timeout(&mut self, side: TeamSide) -> bool {
        let team = self.team(side);
        if team.timeouts_used >= team.timeouts {
            return false;
        }
        self.log(EventType::Timeout, side, None);
        let team = self.team_mut(side);
        team.timeouts_used = team.timeouts_used.saturating_add(1);
        self.clock.stop();
        true
    }

    // -----------------------------------------------------------------------
    // Game lifecycle
    // -----------------------------------------------------------------------

    /// Start over: default teams, first period, empty log and history.
    /// Settings are kept.
    pub fn new_game(&mut self) {
        self.home = Team::default_for(TeamSide::Home, self.timeouts_per_team);
        self.away = Team::default_for(TeamSide::Away, self.timeouts_per_team);
        self.clock.reset();
        self.penalties.clear(None);
        self.events.clear();
        self.history.clear();
    }

    /// Zero the scoring counters on both teams and clear the penalty box,
    /// keeping team identities and the clock.
    pub fn reset_scores(&mut self) {
        for team in [&mut self.home, &mut self.away] {
            team.score = 0;
            team.shots = 0;
            team.timeouts_used = 0;
            team.empty_net = false;
        }
        self.penalties.clear(None);
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Change the UI colour scheme.
    pub const fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
    }

    /// Turn sounds on or off.
    pub const fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
    }

    /// Apply a partial settings change.
    pub fn set_settings(&mut self, update: &SettingsUpdate) {
        if let Some(length) = update.period_length {
            self.clock.set_period_length(length);
        }
        if let Some(periods) = update.max_periods {
            self.clock.set_max_periods(periods);
        }
        if let Some(show) = update.show_shots {
            self.settings.show_shots = show;
        }
        if let Some(show) = update.show_penalties {
            self.settings.show_penalties = show;
        }
        if let Some(theme) = update.theme {
            self.settings.theme = theme;
        }
        if let Some(enabled) = update.sound_enabled {
            self.settings.sound_enabled = enabled;
        }
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Revert the last history-producing change.
    pub fn undo(&mut self) -> bool {
        let mut live = self.snapshot();
        if !self.history.undo(&mut live) {
            return false;
        }
        self.restore_snapshot(live);
        true
    }

    /// Re-apply the last undone change.
    pub fn redo(&mut self) -> bool {
        let mut live = self.snapshot();
        if !self.history.redo(&mut live) {
            return false;
        }
        self.restore_snapshot(live);
        true
    }

    /// Whether an undo is available.
    pub const fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop the undo history together with the event log.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.events.clear();
    }

    /// Record the current state as an undo point.
    pub fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Deep copy of the undoable state.
    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            home: self.home.clone(),
            away: self.away.clone(),
            period: self.clock.period(),
            time_remaining: self.clock.time_remaining(),
            is_overtime: self.clock.is_overtime(),
            penalties: self.penalties.as_slice().to_vec(),
            events: self.events.as_slice().to_vec(),
        }
    }

    fn restore_snapshot(&mut self, snapshot: GameStateSnapshot) {
        self.home = snapshot.home;
        self.away = snapshot.away;
        self.clock
            .restore(snapshot.period, snapshot.time_remaining, snapshot.is_overtime);
        self.penalties.replace(snapshot.penalties);
        self.events.replace(snapshot.events);
    }

    // -----------------------------------------------------------------------
    // External documents
    // -----------------------------------------------------------------------

    /// The document written to local storage.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            home: self.home.clone(),
            away: self.away.clone(),
            period: self.clock.period(),
            max_periods: self.clock.max_periods(),
            period_length: self.clock.period_length(),
            time_remaining: self.clock.time_remaining(),
            is_overtime: self.clock.is_overtime(),
            penalties: self.penalties.as_slice().to_vec(),
            theme: self.settings.theme,
            sound_enabled: self.settings.sound_enabled,
            show_shots: self.settings.show_shots,
            show_penalties: self.settings.show_penalties,
            events: self.events.as_slice().to_vec(),
            history_stack: self.history.to_vec(),
            history_index: self.history.index(),
        }
    }

    /// Load a saved document over the current state.
    pub fn restore_persisted(&mut self, state: PersistedState) {
        self.home = state.home;
        self.away = state.away;
        self.clock.set_max_periods(state.max_periods);
        self.clock.set_period_length(state.period_length);
        self.clock
            .restore(state.period, state.time_remaining, state.is_overtime);
        self.clock.stop();
        self.penalties.replace(state.penalties);
        self.events.replace(state.events);
        self.settings = Settings {
            theme: state.theme,
            sound_enabled: state.sound_enabled,
            show_shots: state.show_shots,
            show_penalties: state.show_penalties,
        };
        self.history.restore(state.history_stack, state.history_index);
    }

    /// Read-only projection for UIs.
    pub fn view(&self) -> GameView {
        GameView {
            home: self.home.clone(),
            away: self.away.clone(),
            period: self.clock.period(),
            max_periods: self.clock.max_periods(),
            period_length: self.clock.period_length(),
            time_remaining: self.clock.time_remaining(),
            is_running: self.clock.is_running(),
            is_overtime: self.clock.is_overtime(),
            penalties: self.penalties.as_slice().to_vec(),
            events: self.events.as_slice().to_vec(),
            theme: self.settings.theme,
            sound_enabled: self.settings.sound_enabled,
            show_shots: self.settings.show_shots,
            show_penalties: self.settings.show_penalties,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            home_power_play: self.is_power_play(TeamSide::Home),
            away_power_play: self.is_power_play(TeamSide::Away),
        }
    }

    /// A full shared record for publishing under a game code.
    pub fn shared_record(&self, host_id: &str, now_ms: i64) -> SharedGameRecord {
        SharedGameRecord {
            home: self.home.clone(),
            away: self.away.clone(),
            period: self.clock.period(),
            time_remaining: self.clock.time_remaining(),
            is_overtime: self.clock.is_overtime(),
            is_running: self.clock.is_running(),
            penalties: self.penalties.as_slice().to_vec(),
            events: self.events.as_slice().to_vec(),
            host_id: host_id.to_owned(),
            created_at: now_ms,
            updated_at: now_ms,
            viewer_count: 0,
        }
    }

    /// Every replicated field, as an update.
    pub fn shared_update(&self) -> SharedGameUpdate {
        SharedGameUpdate {
            home: Some(self.home.clone()),
            away: Some(self.away.clone()),
            period: Some(self.clock.period()),
            time_remaining: Some(self.clock.time_remaining()),
            is_overtime: Some(self.clock.is_overtime()),
            is_running: Some(self.clock.is_running()),
            penalties: Some(self.penalties.as_slice().to_vec()),
            events: Some(self.events.as_slice().to_vec()),
            updated_at: None,
        }
    }

    /// Mirror a host's record: teams, clock, penalties, and events are all
    /// replaced at once. Bypasses history.
    pub fn apply_remote(&mut self, record: &SharedGameRecord) {
        self.home.clone_from(&record.home);
        self.away.clone_from(&record.away);
        self.clock
            .restore(record.period, record.time_remaining, record.is_overtime);
        self.clock.set_running(record.is_running);
        self.penalties.replace(record.penalties.clone());
        self.events.replace(record.events.clone());
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn log(&mut self, event_type: EventType, side: TeamSide, details: Option<EventDetails>) {
        let period = self.clock.period();
        let game_time = self.clock.time_remaining();
        self.events
            .record(event_type, side, period, game_time, details);
    }
}
