//! Configuration loading for the backdrop layers.
//!
//! Every tuning constant of the two simulations lives here so a
//! `backdrop.toml` next to the binary can adjust density, speeds and
//! probabilities without a rebuild. Missing keys fall back to the defaults
//! below; a missing file means "all defaults".

use anyhow::Context;
use log::{info, warn};
use rand::Rng;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "NEURAL_BACKDROP_CONFIG";
/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "backdrop.toml";

/// Half-open sampling interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a uniform value from the span. Degenerate spans yield `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min { rng.gen_range(self.min..self.max) } else { self.min }
    }

    fn sanitize(&mut self, name: &str) {
        if !self.min.is_finite() || !self.max.is_finite() {
            warn!("Config span `{}` is not finite, resetting to 0", name);
            *self = Span::new(0.0, 0.0);
        }
        if self.min > self.max {
            warn!("Config span `{}` has min > max ({} > {}), swapping", name, self.min, self.max);
            std::mem::swap(&mut self.min, &mut self.max);
        }
    }
}

/// Tuning for the activation-capable neural field layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NeuralConfig {
    /// Surface area (px²) per neuron.
    pub area_per_neuron: f32,
    /// Upper bound on the neuron count, bounds per-frame fan-out.
    pub max_neurons: usize,
    pub resting_radius: Span,
    /// Added on top of the resting radius to get the pulse maximum.
    pub pulse_reach: Span,
    pub pulse_speed: Span,
    /// Each velocity component is drawn from `[-drift, drift)`.
    pub drift: f32,
    pub min_connections: usize,
    pub max_connections: usize,
    pub connection_width: Span,
    pub particle_size: Span,
    pub particle_speed: Span,
    /// Per-frame chance that one random neuron fires on its own.
    pub spontaneous_probability: f64,
    /// Activation time gained per frame while active.
    pub activation_step: f32,
    /// Extra radius an active neuron shows at the start of its decay.
    pub activation_growth: f32,
    pub proximity_radius: f32,
    /// Per-frame chance that a neuron under the pointer fires.
    pub hover_probability: f64,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            area_per_neuron: 25_000.0,
            max_neurons: 50,
            resting_radius: Span::new(2.0, 5.0),
            pulse_reach: Span::new(5.0, 20.0),
            pulse_speed: Span::new(0.05, 0.15),
            drift: 0.1,
            min_connections: 2,
            max_connections: 4,
            connection_width: Span::new(0.5, 1.5),
            particle_size: Span::new(1.0, 3.0),
            particle_speed: Span::new(0.005, 0.015),
            spontaneous_probability: 0.03,
            activation_step: 0.02,
            activation_growth: 2.0,
            proximity_radius: 150.0,
            hover_probability: 0.05,
        }
    }
}

/// Size-dependent parameters of the point mesh layer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MeshProfile {
    pub area_per_point: f32,
    pub drift: f32,
    pub dot_radius: f32,
    pub link_distance: f32,
    pub proximity_radius: f32,
}

/// Tuning for the plain point mesh layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MeshConfig {
    /// Surfaces narrower than this use the compact profile.
    pub compact_width: f32,
    pub regular: MeshProfile,
    pub compact: MeshProfile,
    /// Fraction of the pointer offset added to velocity each frame.
    pub attraction: f32,
    pub max_speed: f32,
    /// Layer opacity multiplied into every mesh color.
    pub opacity: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            compact_width: 768.0,
            regular: MeshProfile {
                area_per_point: 15_000.0,
                drift: 0.25,
                dot_radius: 2.0,
                link_distance: 150.0,
                proximity_radius: 100.0,
            },
            compact: MeshProfile {
                area_per_point: 30_000.0,
                drift: 0.15,
                dot_radius: 1.5,
                link_distance: 100.0,
                proximity_radius: 80.0,
            },
            attraction: 0.0001,
            max_speed: 2.0,
            opacity: 0.5,
        }
    }
}

impl MeshConfig {
    /// Pick the profile matching a surface width.
    pub fn profile_for(&self, surface_width: f32) -> MeshProfile {
        if surface_width < self.compact_width { self.compact } else { self.regular }
    }
}

/// Root of `backdrop.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BackdropConfig {
    pub neural: NeuralConfig,
    pub mesh: MeshConfig,
}

impl BackdropConfig {
    /// Resolve the config path from the environment, falling back to the working directory.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load and sanitize configuration from a TOML file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Like [`BackdropConfig::load`] but a missing file yields the defaults.
    pub fn load_or_default(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            info!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        let config = Self::load(config_path)?;
        info!("Loaded backdrop config from {}", config_path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.sanitize();
        Ok(config)
    }

    /// Clamp values that would make the simulations misbehave.
    pub fn sanitize(&mut self) {
        let n = &mut self.neural;
        n.area_per_neuron = positive_or(n.area_per_neuron, NeuralConfig::default().area_per_neuron, "neural.area-per-neuron");
        n.spontaneous_probability = probability(n.spontaneous_probability, "neural.spontaneous-probability");
        n.hover_probability = probability(n.hover_probability, "neural.hover-probability");
        n.activation_step = positive_or(n.activation_step, NeuralConfig::default().activation_step, "neural.activation-step");
        n.drift = non_negative_or(n.drift, NeuralConfig::default().drift, "neural.drift");
        n.proximity_radius = non_negative_or(n.proximity_radius, NeuralConfig::default().proximity_radius, "neural.proximity-radius");
        n.activation_growth = non_negative_or(n.activation_growth, NeuralConfig::default().activation_growth, "neural.activation-growth");
        if n.min_connections > n.max_connections {
            warn!("neural.min-connections > neural.max-connections, swapping");
            std::mem::swap(&mut n.min_connections, &mut n.max_connections);
        }
        n.resting_radius.sanitize("neural.resting-radius");
        n.pulse_reach.sanitize("neural.pulse-reach");
        n.pulse_speed.sanitize("neural.pulse-speed");
        n.connection_width.sanitize("neural.connection-width");
        n.particle_size.sanitize("neural.particle-size");
        n.particle_speed.sanitize("neural.particle-speed");
        if n.particle_speed.min <= 0.0 {
            warn!("neural.particle-speed must be positive, particles would never arrive; using defaults");
            n.particle_speed = NeuralConfig::default().particle_speed;
        }

        let m = &mut self.mesh;
        m.opacity = if m.opacity.is_nan() { MeshConfig::default().opacity } else { m.opacity.clamp(0.0, 1.0) };
        m.max_speed = non_negative_or(m.max_speed, MeshConfig::default().max_speed, "mesh.max-speed");
        m.attraction = non_negative_or(m.attraction, MeshConfig::default().attraction, "mesh.attraction");
        for (profile, fallback, name) in [
            (&mut m.regular, MeshConfig::default().regular, "mesh.regular"),
            (&mut m.compact, MeshConfig::default().compact, "mesh.compact"),
        ] {
            profile.area_per_point = positive_or(profile.area_per_point, fallback.area_per_point, name);
            profile.drift = non_negative_or(profile.drift, fallback.drift, name);
            profile.dot_radius = non_negative_or(profile.dot_radius, fallback.dot_radius, name);
            profile.link_distance = non_negative_or(profile.link_distance, fallback.link_distance, name);
            profile.proximity_radius = non_negative_or(profile.proximity_radius, fallback.proximity_radius, name);
        }
    }
}

fn positive_or(value: f32, fallback: f32, name: &str) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("Config value `{}` must be positive (got {}), using {}", name, value, fallback);
        fallback
    }
}

/// Negative values are flipped to their magnitude; NaN and infinities fall back.
fn non_negative_or(value: f32, fallback: f32, name: &str) -> f32 {
    if value.is_finite() {
        value.abs()
    } else {
        warn!("Config value `{}` must be finite (got {}), using {}", name, value, fallback);
        fallback
    }
}

fn probability(value: f64, name: &str) -> f64 {
    if (0.0..=1.0).contains(&value) {
        value
    } else {
        let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        warn!("Config probability `{}` out of range ({}), clamped to {}", name, value, clamped);
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = BackdropConfig::parse("").unwrap();
        assert_eq!(config.neural.max_neurons, 50);
        assert_eq!(config.neural.area_per_neuron, 25_000.0);
        assert_eq!(config.mesh.regular.link_distance, 150.0);
        assert_eq!(config.mesh.compact.proximity_radius, 80.0);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = BackdropConfig::parse(
            r#"
            [neural]
            max-neurons = 12
            resting-radius = { min = 1.0, max = 2.0 }

            [mesh]
            opacity = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(config.neural.max_neurons, 12);
        assert_eq!(config.neural.resting_radius, Span::new(1.0, 2.0));
        assert_eq!(config.neural.hover_probability, 0.05);
        assert_eq!(config.mesh.opacity, 0.8);
        assert_eq!(config.mesh.attraction, 0.0001);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let config = BackdropConfig::parse(
            r#"
            [neural]
            spontaneous-probability = 3.5
            hover-probability = -1.0
            min-connections = 6
            max-connections = 1
            pulse-speed = { min = 0.5, max = 0.1 }
            area-per-neuron = 0.0
            "#,
        )
        .unwrap();
        let n = &config.neural;
        assert_eq!(n.spontaneous_probability, 1.0);
        assert_eq!(n.hover_probability, 0.0);
        assert_eq!((n.min_connections, n.max_connections), (1, 6));
        assert_eq!(n.pulse_speed, Span::new(0.1, 0.5));
        assert_eq!(n.area_per_neuron, 25_000.0);
    }

    #[test]
    fn non_finite_motion_values_fall_back_to_defaults() {
        let mut config = BackdropConfig::default();
        config.neural.drift = f32::NAN;
        config.mesh.max_speed = f32::INFINITY;
        config.mesh.attraction = f32::NAN;
        config.mesh.compact.drift = f32::NEG_INFINITY;
        config.mesh.regular.drift = -0.4;
        config.sanitize();
        assert_eq!(config.neural.drift, 0.1);
        assert_eq!(config.mesh.max_speed, 2.0);
        assert_eq!(config.mesh.attraction, 0.0001);
        assert_eq!(config.mesh.compact.drift, 0.15);
        assert_eq!(config.mesh.regular.drift, 0.4);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(BackdropConfig::parse("[neural\nmax-neurons = ").is_err());
        assert!(BackdropConfig::parse("[neural]\nmax-neurons = \"many\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("neural-backdrop-does-not-exist.toml");
        let config = BackdropConfig::load_or_default(&path).unwrap();
        assert_eq!(config.neural.max_neurons, 50);
    }

    #[test]
    fn profile_switches_below_compact_width() {
        let mesh = MeshConfig::default();
        assert_eq!(mesh.profile_for(767.0), mesh.compact);
        assert_eq!(mesh.profile_for(768.0), mesh.regular);
    }

    #[test]
    fn degenerate_span_samples_min() {
        let mut rng = rand::thread_rng();
        assert_eq!(Span::new(3.0, 3.0).sample(&mut rng), 3.0);
        let v = Span::new(1.0, 2.0).sample(&mut rng);
        assert!((1.0..2.0).contains(&v));
    }
}
