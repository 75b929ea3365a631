//! Display preferences and clock settings.

use rinkside_types::Theme;
use serde::{Deserialize, Serialize};

/// Operator display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// UI colour scheme.
    pub theme: Theme,
    /// Horn and buzzer sounds.
    pub sound_enabled: bool,
    /// Show shot counters.
    pub show_shots: bool,
    /// Show the penalty box.
    pub show_penalties: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sound_enabled: true,
            show_shots: true,
            show_penalties: true,
        }
    }
}

/// Partial settings change. A provided `period_length` also resets the
/// clock to that length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    /// New regulation period length in seconds.
    pub period_length: Option<u32>,
    /// New number of regulation periods.
    pub max_periods: Option<u32>,
    /// Show shot counters.
    pub show_shots: Option<bool>,
    /// Show the penalty box.
    pub show_penalties: Option<bool>,
    /// UI colour scheme.
    pub theme: Option<Theme>,
    /// Horn and buzzer sounds.
    pub sound_enabled: Option<bool>,
}
