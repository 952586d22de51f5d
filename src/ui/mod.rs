// UI module for the Neural Backdrop host window
//
// The host stands in for the page that embeds the two backdrop layers:
// - `app_state`: application state, persistence and the main update loop
// - `backdrop`: mounts/unmounts the layers, forwards host events, paints frames
// - `controls`: floating window with theme choice, layer toggles and stats

pub mod app_state;
pub mod backdrop;
pub mod controls;

use serde::{Deserialize, Serialize};

use crate::engine::Theme;

pub use app_state::AppState;

/// Theme the user asked for. `System` is resolved through egui before the
/// engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemePreference {
    #[default]
    System,
    Dark,
    Light,
}

impl From<ThemePreference> for egui::ThemePreference {
    fn from(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::System => egui::ThemePreference::System,
            ThemePreference::Dark => egui::ThemePreference::Dark,
            ThemePreference::Light => egui::ThemePreference::Light,
        }
    }
}

impl From<egui::Theme> for Theme {
    fn from(theme: egui::Theme) -> Self {
        match theme {
            egui::Theme::Dark => Theme::Dark,
            egui::Theme::Light => Theme::Light,
        }
    }
}
