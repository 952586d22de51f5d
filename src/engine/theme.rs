//! Dark/light palettes for the backdrop layers.
//!
//! Colors are resolved once per reseed and cached on every entity; a theme
//! change therefore rebuilds the store instead of re-tinting it live.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Resolved visual theme. "System" is resolved by the host before it gets here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Straight (non-premultiplied) RGB triple, combined with an alpha at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color with the given opacity (clamped to 0..=1).
    pub fn alpha(self, alpha: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
    }
}

/// Colors of the neural field layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeuralPalette {
    /// Resting neurons, idle connections and pulse halos.
    pub base: Rgb,
    /// Firing neurons, active connections and data particles.
    pub active: Rgb,
}

impl NeuralPalette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                base: Rgb::new(100, 149, 237),
                active: Rgb::new(120, 200, 255),
            },
            Theme::Light => Self {
                base: Rgb::new(65, 105, 225),
                active: Rgb::new(0, 120, 255),
            },
        }
    }
}

/// Ink of the point mesh layer. Same hue in both themes.
pub fn mesh_ink(theme: Theme) -> Rgb {
    match theme {
        Theme::Dark | Theme::Light => Rgb::new(100, 100, 255),
    }
}
