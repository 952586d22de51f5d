//! # Application State Management
//!
//! This module implements the central `AppState` struct, the host window that
//! embeds the backdrop layers. It implements the `eframe::App` trait.
//!
//! ## Responsibilities
//!
//! - Resolves the theme preference (System/Dark/Light) into a concrete theme
//! - Collects viewport, pointer and theme observations every frame and hands
//!   them to the [`Backdrop`]
//! - Paints the page background and the layers on the background layer
//! - Keeps repainting at display rate while a layer is running
//! - Persists the user's theme and layer choices across sessions

use eframe::egui;
use log::info;
use serde::{Deserialize, Serialize};

use super::ThemePreference;
use super::backdrop::{Backdrop, HostInputs};
use crate::config::BackdropConfig;
use crate::engine::Theme;

const SETTINGS_KEY: &str = "backdrop_settings";

pub struct AppState {
    /// Tuning for both layers, loaded at startup.
    pub config: BackdropConfig,
    pub theme_preference: ThemePreference,
    /// Preference last pushed into egui, to avoid re-applying it every frame.
    applied_preference: Option<ThemePreference>,
    pub neural_enabled: bool,
    pub mesh_enabled: bool,
    /// Whether the controls window shows per-layer counters.
    pub show_stats: bool,
    pub backdrop: Backdrop,
}

/// Settings persisted across application sessions.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    theme_preference: ThemePreference,
    neural_enabled: bool,
    mesh_enabled: bool,
    show_stats: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            theme_preference: ThemePreference::System,
            neural_enabled: true,
            mesh_enabled: true,
            show_stats: false,
        }
    }
}

impl AppState {
    /// Create a new AppState, loading persisted settings if available.
    pub fn new(config: BackdropConfig, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, SETTINGS_KEY)).unwrap_or_default();
        info!(
            "Host settings: theme {:?}, neural field {}, point mesh {}",
            persisted.theme_preference,
            if persisted.neural_enabled { "on" } else { "off" },
            if persisted.mesh_enabled { "on" } else { "off" }
        );

        Self {
            config,
            theme_preference: persisted.theme_preference,
            applied_preference: None,
            neural_enabled: persisted.neural_enabled,
            mesh_enabled: persisted.mesh_enabled,
            show_stats: persisted.show_stats,
            backdrop: Backdrop::new(),
        }
    }

    /// Push the preference into egui when it changed and read back the
    /// concrete theme egui resolved it to.
    fn resolve_theme(&mut self, ctx: &egui::Context) -> Theme {
        if self.applied_preference != Some(self.theme_preference) {
            ctx.set_theme(egui::ThemePreference::from(self.theme_preference));
            self.applied_preference = Some(self.theme_preference);
        }
        Theme::from(ctx.theme())
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            theme_preference: self.theme_preference,
            neural_enabled: self.neural_enabled,
            mesh_enabled: self.mesh_enabled,
            show_stats: self.show_stats,
        };
        eframe::set_value(storage, SETTINGS_KEY, &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let theme = self.resolve_theme(ctx);
        let inputs = HostInputs {
            viewport: ctx.screen_rect(),
            pointer: ctx.input(|i| i.pointer.latest_pos()),
            theme,
        };

        self.backdrop.sync_layers(&self.config, &inputs, self.neural_enabled, self.mesh_enabled);
        self.backdrop.observe(inputs);

        let painter = ctx.layer_painter(egui::LayerId::background());
        painter.rect_filled(inputs.viewport, 0.0, ctx.style().visuals.panel_fill);
        if self.backdrop.paint(&painter) {
            // Next frame at display rate, like a per-refresh callback.
            ctx.request_repaint();
        }

        super::controls::render(ctx, self);
    }
}
