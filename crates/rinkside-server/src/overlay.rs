//! Broadcast overlay query parameters.
//!
//! Overlay pages are opened by streaming software with a URL such as
//! `/overlay?theme=full&position=bottom&transparent=false`. Unknown or
//! missing values fall back to the defaults: minimal theme at the top,
//! penalties shown, transparent background.

use axum::Json;
use axum::extract::Query;
use rinkside_types::{OverlayOptions, OverlayPosition, OverlayTheme};
use serde::Deserialize;

/// Raw overlay query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayQuery {
    /// `minimal` or `full`.
    pub theme: Option<String>,
    /// `top` or `bottom`.
    pub position: Option<String>,
    /// Anything but `false` shows penalties.
    pub show_penalties: Option<String>,
    /// Anything but `false` keeps the background transparent.
    pub transparent: Option<String>,
}

impl OverlayQuery {
    /// Resolve the query into display options.
    pub fn options(&self) -> OverlayOptions {
        let theme = match self.theme.as_deref() {
            Some("full") => OverlayTheme::Full,
            _ => OverlayTheme::Minimal,
        };
        let position = match self.position.as_deref() {
            Some("bottom") => OverlayPosition::Bottom,
            _ => OverlayPosition::Top,
        };
        OverlayOptions {
            theme,
            position,
            show_penalties: self.show_penalties.as_deref() != Some("false"),
            transparent: self.transparent.as_deref() != Some("false"),
        }
    }
}

/// Resolve overlay query parameters.
#[allow(clippy::unused_async)]
pub async fn get_overlay(Query(query): Query<OverlayQuery>) -> Json<OverlayOptions> {
    Json(query.options())
}
