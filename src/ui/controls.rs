//! # Controls Window
//!
//! Small floating window in the top-right corner with:
//! - Theme preference (System / Dark / Light)
//! - Toggles for each backdrop layer (off unmounts, on mounts a fresh instance)
//! - Optional per-layer counters
//!
//! It lives in a `Window` rather than a panel so the backdrop, painted on the
//! background layer, stays visible across the whole viewport.

use eframe::egui;

use super::{AppState, ThemePreference};
use crate::engine::LayerStats;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::Window::new("Backdrop")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .resizable(false)
        .collapsible(true)
        .default_open(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Theme:");
                ui.selectable_value(&mut state.theme_preference, ThemePreference::System, "System");
                ui.selectable_value(&mut state.theme_preference, ThemePreference::Dark, "Dark");
                ui.selectable_value(&mut state.theme_preference, ThemePreference::Light, "Light");
            });
            ui.separator();
            ui.checkbox(&mut state.neural_enabled, "Neural field");
            ui.checkbox(&mut state.mesh_enabled, "Point mesh");
            ui.checkbox(&mut state.show_stats, "Show stats");

            if state.show_stats {
                ui.separator();
                egui::Grid::new("backdrop_stats").num_columns(2).striped(true).show(ui, |ui| {
                    stats_rows(ui, "Neural field", state.backdrop.neural_stats(), true);
                    stats_rows(ui, "Point mesh", state.backdrop.mesh_stats(), false);
                });
            }
        });
}

fn stats_rows(ui: &mut egui::Ui, title: &str, stats: Option<(LayerStats, u64)>, with_edges: bool) {
    ui.label(egui::RichText::new(title).strong());
    match stats {
        Some((_, frames)) => ui.label(format!("{} frames", frames)),
        None => ui.label("not mounted"),
    };
    ui.end_row();

    let Some((stats, _)) = stats else {
        return;
    };
    ui.label("Nodes:");
    ui.label(egui::RichText::new(stats.nodes.to_string()).monospace());
    ui.end_row();
    if with_edges {
        ui.label("Connections:");
        ui.label(egui::RichText::new(stats.edges.to_string()).monospace());
        ui.end_row();
        ui.label("Particles:");
        ui.label(egui::RichText::new(stats.particles.to_string()).monospace());
        ui.end_row();
        ui.label("Firing:");
        ui.label(egui::RichText::new(stats.active_nodes.to_string()).monospace());
        ui.end_row();
    }
}
