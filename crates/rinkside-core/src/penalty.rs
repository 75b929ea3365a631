//! Active penalties and their countdown.

use rinkside_types::{NewPenalty, Penalty, PenaltyId, TeamSide};

/// The set of penalties currently being served, in assessment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyBox {
    penalties: Vec<Penalty>,
}

impl PenaltyBox {
    /// Create an empty penalty box.
    pub const fn new() -> Self {
        Self {
            penalties: Vec::new(),
        }
    }

    /// Assess a penalty. The full duration is put on its countdown.
    pub fn add(&mut self, input: NewPenalty) -> Penalty {
        let penalty = Penalty {
            id: PenaltyId::new(),
            team: input.team,
            player_number: input.player_number,
            duration: input.duration,
            time_remaining: input.duration,
            penalty_type: input.penalty_type,
            description: input.description,
        };
        self.penalties.push(penalty.clone());
        penalty
    }

    /// Remove the penalty with `id`, if present.
    pub fn remove(&mut self, id: &PenaltyId) -> Option<Penalty> {
        let pos = self.penalties.iter().position(|p| &p.id == id)?;
        Some(self.penalties.remove(pos))
    }

    /// Whether a penalty with `id` is active.
    pub fn contains(&self, id: &PenaltyId) -> bool {
        self.penalties.iter().any(|p| &p.id == id)
    }

    /// Remove all penalties, or only those of `side`. Returns how many were
    /// removed.
    pub fn clear(&mut self, side: Option<TeamSide>) -> usize {
        let before = self.penalties.len();
        match side {
            Some(side) => self.penalties.retain(|p| p.team != side),
            None => self.penalties.clear(),
        }
        before.saturating_sub(self.penalties.len())
    }

    /// Count one second off every penalty and release those that reach
    /// zero. Returns the released penalties.
    pub fn tick(&mut self) -> Vec<Penalty> {
        for penalty in &mut self.penalties {
            penalty.time_remaining = penalty.time_remaining.saturating_sub(1);
        }
        let (expired, active): (Vec<_>, Vec<_>) = self
            .penalties
            .drain(..)
            .partition(|p| p.time_remaining == 0);
        self.penalties = active;
        expired
    }

    /// Number of active penalties on `side`.
    pub fn count(&self, side: TeamSide) -> usize {
        self.penalties.iter().filter(|p| p.team == side).count()
    }

    /// `side` has a man advantage: the opponent has more players in the box.
    pub fn is_power_play(&self, side: TeamSide) -> bool {
        self.count(side.opponent()) > self.count(side)
    }

    /// Active penalties in assessment order.
    pub fn as_slice(&self) -> &[Penalty] {
        &self.penalties
    }

    /// Whether the box is empty.
    pub fn is_empty(&self) -> bool {
        self.penalties.is_empty()
    }

    /// Replace the whole set (snapshot or remote application).
    pub fn replace(&mut self, penalties: Vec<Penalty>) {
        self.penalties = penalties;
    }
}

#[cfg(test)]
mod tests {
    use rinkside_types::PenaltyType;

    use super::*;

    fn minor(team: TeamSide, duration: u32) -> NewPenalty {
        NewPenalty {
            team,
            player_number: "12".to_owned(),
            duration,
            penalty_type: PenaltyType::Minor,
            description: Some("Tripping".to_owned()),
        }
    }

    #[test]
    fn add_starts_countdown_at_full_duration() {
        let mut pbox = PenaltyBox::new();
        let penalty = pbox.add(minor(TeamSide::Home, 120));
        assert_eq!(penalty.time_remaining, 120);
        assert_eq!(penalty.duration, 120);
        assert!(pbox.contains(&penalty.id));
    }

    #[test]
    fn tick_releases_exactly_at_zero() {
        let mut pbox = PenaltyBox::new();
        pbox.add(minor(TeamSide::Home, 2));
        pbox.add(minor(TeamSide::Away, 3));

        assert!(pbox.tick().is_empty());
        let released = pbox.tick();
        assert_eq!(released.len(), 1);
        assert_eq!(released.first().map(|p| p.team), Some(TeamSide::Home));
        assert_eq!(pbox.as_slice().len(), 1);
        assert!(pbox.as_slice().iter().all(|p| p.time_remaining > 0));

        pbox.tick();
        assert!(pbox.is_empty());
    }

    #[test]
    fn full_minor_expires_after_120_ticks() {
        let mut pbox = PenaltyBox::new();
        pbox.add(minor(TeamSide::Home, 120));
        for _ in 0..119 {
            pbox.tick();
        }
        assert_eq!(pbox.count(TeamSide::Home), 1);
        pbox.tick();
        assert!(pbox.is_empty());
    }

    #[test]
    fn power_play_goes_to_the_short_handed_teams_opponent() {
        let mut pbox = PenaltyBox::new();
        pbox.add(minor(TeamSide::Home, 120));
        assert!(pbox.is_power_play(TeamSide::Away));
        assert!(!pbox.is_power_play(TeamSide::Home));

        pbox.add(minor(TeamSide::Away, 120));
        assert!(!pbox.is_power_play(TeamSide::Away));
        assert!(!pbox.is_power_play(TeamSide::Home));
    }

    #[test]
    fn clear_by_side_keeps_the_other_team() {
        let mut pbox = PenaltyBox::new();
        pbox.add(minor(TeamSide::Home, 120));
        pbox.add(minor(TeamSide::Home, 120));
        pbox.add(minor(TeamSide::Away, 120));
        assert_eq!(pbox.clear(Some(TeamSide::Home)), 2);
        assert_eq!(pbox.count(TeamSide::Away), 1);
        assert_eq!(pbox.clear(None), 1);
        assert!(pbox.is_empty());
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let mut pbox = PenaltyBox::new();
        pbox.add(minor(TeamSide::Home, 120));
        assert!(pbox.remove(&PenaltyId::from("missing")).is_none());
        assert_eq!(pbox.count(TeamSide::Home), 1);
    }
}
