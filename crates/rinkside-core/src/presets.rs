//! Built-in NHL team presets.
//!
//! Applying a preset sets a team's name, abbreviation, and primary colour.

use rinkside_types::TeamUpdate;
use serde::{Deserialize, Serialize};

/// NHL conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    /// Eastern Conference.
    Eastern,
    /// Western Conference.
    Western,
}

/// NHL division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    /// Metropolitan (Eastern).
    Metropolitan,
    /// Atlantic (Eastern).
    Atlantic,
    /// Central (Western).
    Central,
    /// Pacific (Western).
    Pacific,
}

impl Division {
    /// Conference this division belongs to.
    pub const fn conference(self) -> Conference {
        match self {
            Self::Metropolitan | Self::Atlantic => Conference::Eastern,
            Self::Central | Self::Pacific => Conference::Western,
        }
    }
}

/// A selectable team identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPreset {
    /// Team name without the city (e.g. "Maple Leafs").
    pub name: &'static str,
    /// Three-letter code.
    pub abbreviation: &'static str,
    /// Primary colour.
    pub primary_color: &'static str,
    /// Secondary colour.
    pub secondary_color: &'static str,
    /// Home city or region.
    pub city: &'static str,
    /// Conference.
    pub conference: Conference,
    /// Division.
    pub division: Division,
}

impl TeamPreset {
    /// The team update that applies this preset.
    pub fn to_update(&self) -> TeamUpdate {
        TeamUpdate {
            name: Some(self.name.to_owned()),
            abbreviation: Some(self.abbreviation.to_owned()),
            color: Some(self.primary_color.to_owned()),
            ..TeamUpdate::default()
        }
    }
}

const fn preset(
    name: &'static str,
    abbreviation: &'static str,
    primary_color: &'static str,
    secondary_color: &'static str,
    city: &'static str,
    conference: Conference,
    division: Division,
) -> TeamPreset {
    TeamPreset {
        name,
        abbreviation,
        primary_color,
        secondary_color,
        city,
        conference,
        division,
    }
}

/// All 32 NHL teams, grouped by division.
pub static NHL_TEAMS: [TeamPreset; 32] = [
    preset("Hurricanes", "CAR", "#CC0000", "#000000", "Carolina", Conference::Eastern, Division::Metropolitan),
    preset("Blue Jackets", "CBJ", "#002654", "#CE1126", "Columbus", Conference::Eastern, Division::Metropolitan),
    preset("Devils", "NJD", "#CE1126", "#000000", "New Jersey", Conference::Eastern, Division::Metropolitan),
    preset("Islanders", "NYI", "#00539B", "#F47D30", "New York", Conference::Eastern, Division::Metropolitan),
    preset("Rangers", "NYR", "#0038A8", "#CE1126", "New York", Conference::Eastern, Division::Metropolitan),
    preset("Flyers", "PHI", "#F74902", "#000000", "Philadelphia", Conference::Eastern, Division::Metropolitan),
    preset("Penguins", "PIT", "#000000", "#FCB514", "Pittsburgh", Conference::Eastern, Division::Metropolitan),
    preset("Capitals", "WSH", "#C8102E", "#041E42", "Washington", Conference::Eastern, Division::Metropolitan),
    preset("Bruins", "BOS", "#FFB81C", "#000000", "Boston", Conference::Eastern, Division::Atlantic),
    preset("Sabres", "BUF", "#002654", "#FCB514", "Buffalo", Conference::Eastern, Division::Atlantic),
    preset("Red Wings", "DET", "#CE1126", "#FFFFFF", "Detroit", Conference::Eastern, Division::Atlantic),
    preset("Panthers", "FLA", "#C8102E", "#041E42", "Florida", Conference::Eastern, Division::Atlantic),
    preset("Canadiens", "MTL", "#AF1E2D", "#192168", "Montreal", Conference::Eastern, Division::Atlantic),
    preset("Senators", "OTT", "#C52032", "#C2912C", "Ottawa", Conference::Eastern, Division::Atlantic),
    preset("Lightning", "TBL", "#002868", "#FFFFFF", "Tampa Bay", Conference::Eastern, Division::Atlantic),
    preset("Maple Leafs", "TOR", "#00205B", "#FFFFFF", "Toronto", Conference::Eastern, Division::Atlantic),
    preset("Coyotes", "UTA", "#8C2633", "#E2D6B5", "Utah", Conference::Western, Division::Central),
    preset("Blackhawks", "CHI", "#CF0A2C", "#000000", "Chicago", Conference::Western, Division::Central),
    preset("Avalanche", "COL", "#6F263D", "#236192", "Colorado", Conference::Western, Division::Central),
    preset("Stars", "DAL", "#006847", "#8F8F8C", "Dallas", Conference::Western, Division::Central),
    preset("Wild", "MIN", "#154734", "#A6192E", "Minnesota", Conference::Western, Division::Central),
    preset("Predators", "NSH", "#FFB81C", "#041E42", "Nashville", Conference::Western, Division::Central),
    preset("Blues", "STL", "#002F87", "#FCB514", "St. Louis", Conference::Western, Division::Central),
    preset("Jets", "WPG", "#041E42", "#004C97", "Winnipeg", Conference::Western, Division::Central),
    preset("Ducks", "ANA", "#F47A38", "#B9975B", "Anaheim", Conference::Western, Division::Pacific),
    preset("Flames", "CGY", "#C8102E", "#F1BE48", "Calgary", Conference::Western, Division::Pacific),
    preset("Oilers", "EDM", "#041E42", "#FF4C00", "Edmonton", Conference::Western, Division::Pacific),
    preset("Kings", "LAK", "#111111", "#A2AAAD", "Los Angeles", Conference::Western, Division::Pacific),
    preset("Sharks", "SJS", "#006D75", "#EA7200", "San Jose", Conference::Western, Division::Pacific),
    preset("Kraken", "SEA", "#001628", "#99D9D9", "Seattle", Conference::Western, Division::Pacific),
    preset("Canucks", "VAN", "#00205B", "#00843D", "Vancouver", Conference::Western, Division::Pacific),
    preset("Golden Knights", "VGK", "#B4975A", "#333F42", "Vegas", Conference::Western, Division::Pacific),
];

/// Look up a preset by abbreviation (case-insensitive).
pub fn find_by_abbreviation(abbreviation: &str) -> Option<&'static TeamPreset> {
    NHL_TEAMS
        .iter()
        .find(|t| t.abbreviation.eq_ignore_ascii_case(abbreviation.trim()))
}

/// Presets in one division.
pub fn by_division(division: Division) -> impl Iterator<Item = &'static TeamPreset> {
    NHL_TEAMS.iter().filter(move |t| t.division == division)
}

/// Presets in one conference.
pub fn by_conference(conference: Conference) -> impl Iterator<Item = &'static TeamPreset> {
    NHL_TEAMS.iter().filter(move |t| t.conference == conference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_division_has_eight_teams() {
        for division in [
            Division::Metropolitan,
            Division::Atlantic,
            Division::Central,
            Division::Pacific,
        ] {
            assert_eq!(by_division(division).count(), 8, "{division:?}");
        }
    }

    #[test]
    fn conference_matches_division() {
        assert!(NHL_TEAMS.iter().all(|t| t.division.conference() == t.conference));
        assert_eq!(by_conference(Conference::Eastern).count(), 16);
    }

    #[test]
    fn abbreviations_are_unique() {
        let mut seen: Vec<&str> = NHL_TEAMS.iter().map(|t| t.abbreviation).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 32);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let leafs = find_by_abbreviation("tor");
        assert_eq!(leafs.map(|t| t.name), Some("Maple Leafs"));
        assert!(find_by_abbreviation("XYZ").is_none());
    }

    #[test]
    fn preset_update_sets_identity_only() {
        let update = find_by_abbreviation("BOS").map(TeamPreset::to_update);
        let update = update.unwrap_or_default();
        assert_eq!(update.name.as_deref(), Some("Bruins"));
        assert_eq!(update.color.as_deref(), Some("#FFB81C"));
        assert!(update.score.is_none());
    }
}
