//! Entity records and initialization for the neural field.
//!
//! Neurons and connections live in index-addressed arenas. Connections refer
//! to their endpoints by index into the neuron arena of the same epoch, and
//! every reseed replaces both arenas at once so an index can never outlive
//! the neuron it was created against.

use egui::{Color32, Pos2, Vec2};
use rand::Rng;

use crate::config::NeuralConfig;
use crate::engine::geometry;
use crate::engine::surface::Surface;
use crate::engine::theme::{NeuralPalette, Rgb};

/// Opacity of a resting neuron's body.
pub const NEURON_OPACITY: f32 = 0.8;
/// Opacity of a data particle.
pub const PARTICLE_OPACITY: f32 = 0.8;

/// Transient highlight that decays over a fixed window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Activation {
    pub active: bool,
    /// Progress through the decay window, in `[0, 1)` while active.
    pub time: f32,
}

impl Activation {
    /// Start the decay window. Already active entities are left untouched,
    /// so repeated triggers within a frame (or mid-decay) are no-ops.
    pub fn trigger(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.time = 0.0;
        true
    }

    /// Advance the window by `step`, clearing the activation once it completes.
    pub fn advance(&mut self, step: f32) {
        if !self.active {
            return;
        }
        self.time += step;
        if self.time >= 1.0 {
            self.active = false;
            self.time = 0.0;
        }
    }

    /// `1 - time`, floored at zero.
    pub fn remaining(&self) -> f32 {
        (1.0 - self.time).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct Neuron {
    pub pos: Pos2,
    pub vel: Vec2,
    /// Drawn radius; grows while firing and shrinks back during decay.
    pub radius: f32,
    pub resting_radius: f32,
    /// Triangle-wave halo radius in `[resting_radius, pulse_max]`.
    pub pulse_radius: f32,
    pub pulse_max: f32,
    pub pulse_speed: f32,
    pub pulse_outward: bool,
    pub activation: Activation,
    pub base: Rgb,
    pub glow: Rgb,
}

impl Neuron {
    /// Activate this neuron. Returns `false` if it was already firing.
    pub fn fire(&mut self, growth: f32) -> bool {
        if !self.activation.trigger() {
            return false;
        }
        self.radius = self.resting_radius + growth;
        true
    }

    pub fn body_color(&self) -> Color32 {
        if self.activation.active {
            self.glow.alpha(self.activation.remaining().max(0.5))
        } else {
            self.base.alpha(NEURON_OPACITY)
        }
    }
}

/// A unit of signal travelling along one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Fraction of the connection covered, in `[0, 1)` while alive.
    pub progress: f32,
    pub speed: f32,
    pub size: f32,
    pub color: Color32,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(config: &NeuralConfig, palette: &NeuralPalette, rng: &mut R) -> Self {
        Self {
            progress: 0.0,
            speed: config.particle_speed.sample(rng),
            size: config.particle_size.sample(rng),
            color: palette.active.alpha(PARTICLE_OPACITY),
        }
    }
}

/// Directed link between two neurons of the current epoch.
#[derive(Debug, Clone)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub width: f32,
    pub activation: Activation,
    pub particles: Vec<Particle>,
    pub base: Rgb,
    pub glow: Rgb,
}

/// Neuron and connection arenas for one epoch.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub neurons: Vec<Neuron>,
    pub connections: Vec<Connection>,
    /// Connection indices grouped by source neuron.
    pub outgoing: Vec<Vec<usize>>,
}

impl EntityStore {
    pub fn particle_count(&self) -> usize {
        self.connections.iter().map(|c| c.particles.len()).sum()
    }

    pub fn active_neurons(&self) -> usize {
        self.neurons.iter().filter(|n| n.activation.active).count()
    }
}

/// Neuron count for a surface: area over density, capped at `max_neurons`.
pub fn neuron_count(surface: &Surface, config: &NeuralConfig) -> usize {
    let by_area = (surface.area() / config.area_per_neuron as f64).floor() as usize;
    by_area.min(config.max_neurons)
}

/// Build a fresh neuron/connection graph for `surface`.
///
/// Every neuron makes between `min_connections` and `max_connections`
/// attempts to link to a uniformly random neuron. Attempts that land on the
/// neuron itself are dropped; repeated pairs are kept.
pub fn initialize<R: Rng + ?Sized>(surface: &Surface, palette: &NeuralPalette, config: &NeuralConfig, rng: &mut R) -> EntityStore {
    let count = neuron_count(surface, config);

    let neurons: Vec<Neuron> = (0..count)
        .map(|_| {
            let resting_radius = config.resting_radius.sample(rng);
            let pulse_max = resting_radius + config.pulse_reach.sample(rng);
            Neuron {
                pos: geometry::random_position(rng, surface, resting_radius),
                vel: geometry::random_velocity(rng, config.drift),
                radius: resting_radius,
                resting_radius,
                pulse_radius: resting_radius,
                pulse_max,
                pulse_speed: config.pulse_speed.sample(rng),
                pulse_outward: true,
                activation: Activation::default(),
                base: palette.base,
                glow: palette.active,
            }
        })
        .collect();

    let mut connections = Vec::new();
    let mut outgoing = vec![Vec::new(); count];
    if count > 1 {
        for from in 0..count {
            let attempts = rng.gen_range(config.min_connections..=config.max_connections);
            for _ in 0..attempts {
                let to = rng.gen_range(0..count);
                if to == from {
                    continue;
                }
                outgoing[from].push(connections.len());
                connections.push(Connection {
                    from,
                    to,
                    width: config.connection_width.sample(rng),
                    activation: Activation::default(),
                    particles: Vec::new(),
                    base: palette.base,
                    glow: palette.active,
                });
            }
        }
    }

    EntityStore { neurons, connections, outgoing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::theme::Theme;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build(width: f32, height: f32, seed: u64) -> EntityStore {
        let surface = Surface::from_size(width, height).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        initialize(&surface, &NeuralPalette::for_theme(Theme::Dark), &NeuralConfig::default(), &mut rng)
    }

    #[test]
    fn count_follows_area_and_cap() {
        let config = NeuralConfig::default();
        let s = |w, h| Surface::from_size(w, h).unwrap();
        assert_eq!(neuron_count(&s(800.0, 600.0), &config), 19);
        assert_eq!(neuron_count(&s(100.0, 100.0), &config), 0);
        assert_eq!(neuron_count(&s(3840.0, 2160.0), &config), 50);
        assert_eq!(build(800.0, 600.0, 1).neurons.len(), 19);
    }

    #[test]
    fn neurons_start_at_rest_within_bands() {
        let store = build(1280.0, 800.0, 3);
        for n in &store.neurons {
            assert!((2.0..5.0).contains(&n.resting_radius));
            assert!(n.pulse_max >= n.resting_radius + 5.0 && n.pulse_max < n.resting_radius + 20.0);
            assert!((0.05..0.15).contains(&n.pulse_speed));
            assert_eq!(n.pulse_radius, n.resting_radius);
            assert_eq!(n.radius, n.resting_radius);
            assert!(!n.activation.active);
            assert!(n.vel.x.abs() <= 0.1 && n.vel.y.abs() <= 0.1);
            assert!(n.pos.x >= n.resting_radius && n.pos.x <= 1280.0 - n.resting_radius);
            assert!(n.pos.y >= n.resting_radius && n.pos.y <= 800.0 - n.resting_radius);
        }
    }

    #[test]
    fn connections_are_valid_and_never_self_loops() {
        let store = build(1920.0, 1080.0, 11);
        let count = store.neurons.len();
        assert!(!store.connections.is_empty());
        for (i, c) in store.connections.iter().enumerate() {
            assert!(c.from < count && c.to < count);
            assert_ne!(c.from, c.to);
            assert!((0.5..1.5).contains(&c.width));
            assert!(store.outgoing[c.from].contains(&i));
        }
        for (from, list) in store.outgoing.iter().enumerate() {
            assert!(list.len() <= 4);
            assert!(list.iter().all(|&ci| store.connections[ci].from == from));
        }
    }

    #[test]
    fn repeated_pairs_are_kept() {
        let config = NeuralConfig {
            max_neurons: 3,
            min_connections: 4,
            max_connections: 4,
            ..NeuralConfig::default()
        };
        let surface = Surface::from_size(1280.0, 800.0).unwrap();
        let palette = NeuralPalette::for_theme(Theme::Dark);
        // Four attempts over two possible targets: most seeds repeat a pair.
        let duplicated = (0..20u64).any(|seed| {
            let store = initialize(&surface, &palette, &config, &mut StdRng::seed_from_u64(seed));
            assert_eq!(store.neurons.len(), 3);
            store.outgoing.iter().any(|list| {
                let mut targets: Vec<usize> = list.iter().map(|&ci| store.connections[ci].to).collect();
                let total = targets.len();
                targets.sort_unstable();
                targets.dedup();
                targets.len() < total
            })
        });
        assert!(duplicated);
    }

    #[test]
    fn tiny_surfaces_get_no_connections() {
        let store = build(200.0, 200.0, 5);
        assert_eq!(store.neurons.len(), 1);
        assert!(store.connections.is_empty());
        assert_eq!(store.outgoing.len(), 1);
    }

    #[test]
    fn colors_are_taken_from_the_palette() {
        let surface = Surface::from_size(800.0, 600.0).unwrap();
        let palette = NeuralPalette::for_theme(Theme::Light);
        let store = initialize(&surface, &palette, &NeuralConfig::default(), &mut StdRng::seed_from_u64(2));
        assert!(store.neurons.iter().all(|n| n.base == palette.base && n.glow == palette.active));
        assert!(store.connections.iter().all(|c| c.base == palette.base));
    }

    #[test]
    fn activation_trigger_is_idempotent_and_decay_completes() {
        let mut a = Activation::default();
        assert!(a.trigger());
        a.advance(0.5);
        assert!(!a.trigger());
        assert_eq!(a.time, 0.5);
        a.advance(0.5);
        assert!(!a.active);
        assert_eq!(a.time, 0.0);
        assert!(a.trigger());
    }
}
