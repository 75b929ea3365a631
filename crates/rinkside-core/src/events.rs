//! Append-only game event log.

use rinkside_types::{EventDetails, EventId, EventType, GameEvent, TeamSide};

/// Ordered record of goals, penalties, period changes, timeouts, and shots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a new event stamped with the current wall-clock time.
    pub fn record(
        &mut self,
        event_type: EventType,
        team: TeamSide,
        period: u32,
        game_time: u32,
        details: Option<EventDetails>,
    ) -> EventId {
        let id = EventId::new();
        self.events.push(GameEvent {
            id: id.clone(),
            event_type,
            team,
            timestamp: chrono::Utc::now().timestamp_millis(),
            period,
            game_time,
            details,
        });
        id
    }

    /// All events, oldest first.
    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    /// The last `n` events, newest first (the order the history panel
    /// shows them in).
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().rev().take(n)
    }

    /// Everything except shots, oldest first.
    pub fn significant(&self) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type != EventType::Shot)
    }

    /// Number of events of `event_type` recorded for `team`.
    pub fn count(&self, event_type: EventType, team: TeamSide) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type && e.team == team)
            .count()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Replace the whole log (snapshot, import, or remote application).
    pub fn replace(&mut self, events: Vec<GameEvent>) {
        self.events = events;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_in_order() {
        let mut log = EventLog::new();
        log.record(EventType::Goal, TeamSide::Home, 1, 1100, None);
        log.record(EventType::Shot, TeamSide::Away, 1, 1000, None);
        log.record(EventType::Timeout, TeamSide::Away, 2, 500, None);

        let kinds: Vec<_> = log.as_slice().iter().map(|e| e.event_type).collect();
        assert_eq!(
            kinds,
            vec![EventType::Goal, EventType::Shot, EventType::Timeout]
        );
        assert!(log.as_slice().iter().all(|e| e.timestamp > 0));
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let mut log = EventLog::new();
        for t in 0..5 {
            log.record(EventType::Shot, TeamSide::Home, 1, t, None);
        }
        let times: Vec<_> = log.recent(2).map(|e| e.game_time).collect();
        assert_eq!(times, vec![4, 3]);
    }

    #[test]
    fn significant_skips_shots() {
        let mut log = EventLog::new();
        log.record(EventType::Shot, TeamSide::Home, 1, 10, None);
        log.record(EventType::Goal, TeamSide::Home, 1, 9, None);
        log.record(EventType::Shot, TeamSide::Away, 1, 8, None);
        assert_eq!(log.significant().count(), 1);
        assert_eq!(log.count(EventType::Shot, TeamSide::Home), 1);
    }
}
