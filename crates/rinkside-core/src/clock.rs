//! Game clock: period, time remaining, and run state.
//!
//! The clock is a plain value type mutated by the engine. It never ticks on
//! its own; the [`driver`](crate::driver) decrements it once per second.
//!
//! # Rules
//!
//! - `time_remaining` is clamped at zero by every setter.
//! - Advancing past the last regulation period is only possible when the
//!   score is tied, in which case the clock enters overtime.
//! - Going back a period never restores the time on the clock.

/// Default regulation period length (20 minutes).
pub const DEFAULT_PERIOD_LENGTH_SECS: u32 = 1200;

/// Default number of regulation periods.
pub const DEFAULT_MAX_PERIODS: u32 = 3;

/// Default overtime length (5 minutes).
pub const DEFAULT_OVERTIME_LENGTH_SECS: u32 = 300;

/// Result of [`GameClock::next_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodTransition {
    /// Moved to the given regulation period.
    Regulation(u32),
    /// Moved to the given (overtime) period.
    Overtime(u32),
    /// Regulation is over and the score is not tied.
    Unchanged,
}

/// Outcome of a single one-second decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// The clock was stopped; nothing happened.
    Idle,
    /// One second elapsed and time remains.
    Elapsed,
    /// One second elapsed and the clock reached zero (and stopped).
    Expired,
    /// The clock was already at zero and has been stopped.
    Halted,
}

/// Period and time-remaining state of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    period: u32,
    max_periods: u32,
    period_length: u32,
    overtime_length: u32,
    time_remaining: u32,
    is_running: bool,
    is_overtime: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(
            DEFAULT_PERIOD_LENGTH_SECS,
            DEFAULT_MAX_PERIODS,
            DEFAULT_OVERTIME_LENGTH_SECS,
        )
    }
}

impl GameClock {
    /// Create a stopped clock at the start of period 1.
    ///
    /// Zero lengths or period counts are raised to 1.
    pub fn new(period_length: u32, max_periods: u32, overtime_length: u32) -> Self {
        let period_length = period_length.max(1);
        Self {
            period: 1,
            max_periods: max_periods.max(1),
            period_length,
            overtime_length: overtime_length.max(1),
            time_remaining: period_length,
            is_running: false,
            is_overtime: false,
        }
    }

    /// Current period (1-based; above `max_periods` in overtime).
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Number of regulation periods.
    pub const fn max_periods(&self) -> u32 {
        self.max_periods
    }

    /// Regulation period length in seconds.
    pub const fn period_length(&self) -> u32 {
        self.period_length
    }

    /// Overtime period length in seconds.
    pub const fn overtime_length(&self) -> u32 {
        self.overtime_length
    }

    /// Seconds left in the current period.
    pub const fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Whether the clock is running.
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Whether the game is in overtime.
    pub const fn is_overtime(&self) -> bool {
        self.is_overtime
    }

    /// Start the clock.
    pub const fn start(&mut self) {
        self.is_running = true;
    }

    /// Stop the clock.
    pub const fn stop(&mut self) {
        self.is_running = false;
    }

    /// Flip the run state.
    pub const fn toggle(&mut self) {
        self.is_running = !self.is_running;
    }

    /// Set the run state directly (remote application).
    pub const fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Set the time remaining, clamping negatives to zero.
    pub fn set_time(&mut self, seconds: i64) {
        self.time_remaining = clamp_seconds(seconds);
    }

    /// Add `delta` seconds (may be negative), clamping at zero.
    pub fn adjust_time(&mut self, delta: i64) {
        let adjusted = i64::from(self.time_remaining).saturating_add(delta);
        self.time_remaining = clamp_seconds(adjusted);
    }

    /// Decrement by one second if running.
    ///
    /// Stops the clock when it is already at zero or reaches zero.
    pub const fn tick(&mut self) -> ClockTick {
        if !self.is_running {
            return ClockTick::Idle;
        }
        if self.time_remaining == 0 {
            self.is_running = false;
            return ClockTick::Halted;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.is_running = false;
            ClockTick::Expired
        } else {
            ClockTick::Elapsed
        }
    }

    /// Advance to the next period.
    ///
    /// Within regulation this resets the time to a full period. After the
    /// last regulation period the game goes to overtime only if `tied`.
    /// Any transition stops the clock.
    pub const fn next_period(&mut self, tied: bool) -> PeriodTransition {
        if self.period < self.max_periods {
            self.period = self.period.saturating_add(1);
            self.time_remaining = self.period_length;
            self.is_running = false;
            self.is_overtime = false;
            PeriodTransition::Regulation(self.period)
        } else if tied {
            self.period = self.period.saturating_add(1);
            self.time_remaining = self.overtime_length;
            self.is_running = false;
            self.is_overtime = true;
            PeriodTransition::Overtime(self.period)
        } else {
            PeriodTransition::Unchanged
        }
    }

    /// Go back one period (not below 1) and leave overtime. The time on the
    /// clock is kept as is.
    pub fn prev_period(&mut self) {
        self.period = self.period.saturating_sub(1).max(1);
        self.is_overtime = false;
    }

    /// Jump to `period`, clamped to `1..=max_periods + 1`. Anything past
    /// regulation is overtime.
    pub fn set_period(&mut self, period: u32) {
        self.period = period.clamp(1, self.max_periods.saturating_add(1));
        self.is_overtime = period > self.max_periods;
    }

    /// Change the regulation length and reset the time to it.
    pub fn set_period_length(&mut self, seconds: u32) {
        self.period_length = seconds.max(1);
        self.time_remaining = self.period_length;
    }

    /// Change the number of regulation periods.
    pub fn set_max_periods(&mut self, periods: u32) {
        self.max_periods = periods.max(1);
    }

    /// Back to period 1 with a full, stopped clock.
    pub const fn reset(&mut self) {
        self.period = 1;
        self.time_remaining = self.period_length;
        self.is_running = false;
        self.is_overtime = false;
    }

    /// Overwrite the period state from a snapshot or remote record.
    pub fn restore(&mut self, period: u32, time_remaining: u32, is_overtime: bool) {
        self.period = period.max(1);
        self.time_remaining = time_remaining;
        self.is_overtime = is_overtime;
    }
}

fn clamp_seconds(seconds: i64) -> u32 {
    u32::try_from(seconds.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clock_is_a_stopped_first_period() {
        let clock = GameClock::default();
        assert_eq!(clock.period(), 1);
        assert_eq!(clock.time_remaining(), 1200);
        assert!(!clock.is_running());
        assert!(!clock.is_overtime());
    }

    #[test]
    fn set_and_adjust_time_clamp_at_zero() {
        let mut clock = GameClock::default();
        clock.set_time(-5);
        assert_eq!(clock.time_remaining(), 0);
        clock.set_time(90);
        clock.adjust_time(-30);
        assert_eq!(clock.time_remaining(), 60);
        clock.adjust_time(-600);
        assert_eq!(clock.time_remaining(), 0);
        clock.adjust_time(15);
        assert_eq!(clock.time_remaining(), 15);
    }

    #[test]
    fn tick_stops_at_zero() {
        let mut clock = GameClock::default();
        clock.set_time(2);
        assert_eq!(clock.tick(), ClockTick::Idle);
        clock.start();
        assert_eq!(clock.tick(), ClockTick::Elapsed);
        assert_eq!(clock.tick(), ClockTick::Expired);
        assert!(!clock.is_running());
        assert_eq!(clock.time_remaining(), 0);

        clock.start();
        assert_eq!(clock.tick(), ClockTick::Halted);
        assert!(!clock.is_running());
    }

    #[test]
    fn next_period_in_regulation_resets_time() {
        let mut clock = GameClock::default();
        clock.set_time(42);
        clock.start();
        assert_eq!(clock.next_period(false), PeriodTransition::Regulation(2));
        assert_eq!(clock.time_remaining(), 1200);
        assert!(!clock.is_running());
    }

    #[test]
    fn next_period_after_regulation_depends_on_tie() {
        let mut clock = GameClock::default();
        clock.set_period(3);
        clock.set_time(0);
        assert_eq!(clock.next_period(false), PeriodTransition::Unchanged);
        assert_eq!(clock.period(), 3);
        assert_eq!(clock.time_remaining(), 0);

        assert_eq!(clock.next_period(true), PeriodTransition::Overtime(4));
        assert!(clock.is_overtime());
        assert_eq!(clock.time_remaining(), 300);
    }

    #[test]
    fn prev_period_keeps_time_and_floors_at_one() {
        let mut clock = GameClock::default();
        clock.set_period(4);
        clock.set_time(77);
        clock.prev_period();
        assert_eq!(clock.period(), 3);
        assert!(!clock.is_overtime());
        assert_eq!(clock.time_remaining(), 77);
        clock.set_period(1);
        clock.prev_period();
        assert_eq!(clock.period(), 1);
    }

    #[test]
    fn set_period_clamps_and_flags_overtime() {
        let mut clock = GameClock::default();
        clock.set_period(0);
        assert_eq!(clock.period(), 1);
        assert!(!clock.is_overtime());
        clock.set_period(9);
        assert_eq!(clock.period(), 4);
        assert!(clock.is_overtime());
    }

    #[test]
    fn period_length_change_resets_time() {
        let mut clock = GameClock::default();
        clock.set_time(10);
        clock.set_period_length(900);
        assert_eq!(clock.time_remaining(), 900);
        assert_eq!(clock.period_length(), 900);
    }
}
