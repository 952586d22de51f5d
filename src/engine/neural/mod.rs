//! Activation-capable neural field layer.
//!
//! Neurons drift slowly and breathe with a pulse halo. Now and then one fires,
//! lighting its outgoing connections and sending a data particle down each;
//! a particle that arrives fires the neuron at the other end. The pointer
//! makes nearby neurons fire more often.

pub mod render;
pub mod store;
pub mod update;

use egui::Shape;
use log::debug;
use rand::rngs::StdRng;

use super::pointer::InteractionTracker;
use super::surface::Surface;
use super::theme::{NeuralPalette, Theme};
use super::{LayerStats, Simulation};
use crate::config::NeuralConfig;
use store::EntityStore;
use update::UpdateContext;

pub struct NeuralField {
    config: NeuralConfig,
    palette: NeuralPalette,
    store: EntityStore,
    /// Number of reseeds, for logging.
    epoch: u64,
}

impl NeuralField {
    pub fn new(config: NeuralConfig) -> Self {
        Self {
            config,
            palette: NeuralPalette::for_theme(Theme::default()),
            store: EntityStore::default(),
            epoch: 0,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn palette(&self) -> &NeuralPalette {
        &self.palette
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Simulation for NeuralField {
    fn reseed(&mut self, surface: &Surface, theme: Theme, rng: &mut StdRng) {
        self.palette = NeuralPalette::for_theme(theme);
        self.store = store::initialize(surface, &self.palette, &self.config, rng);
        self.epoch += 1;
        debug!(
            "Neural field epoch {}: {} neurons, {} connections on {}x{} ({:?})",
            self.epoch,
            self.store.neurons.len(),
            self.store.connections.len(),
            surface.width(),
            surface.height(),
            theme
        );
    }

    fn step(&mut self, surface: &Surface, pointer: &InteractionTracker, rng: &mut StdRng) {
        let ctx = UpdateContext {
            config: &self.config,
            palette: &self.palette,
            surface,
            pointer,
        };
        update::step(&mut self.store, &ctx, rng);
    }

    fn render(&self, surface: &Surface, shapes: &mut Vec<Shape>) {
        render::render(&self.store, surface, shapes);
    }

    fn proximity_radius(&self) -> f32 {
        self.config.proximity_radius
    }

    fn stats(&self) -> LayerStats {
        LayerStats {
            nodes: self.store.neurons.len(),
            edges: self.store.connections.len(),
            particles: self.store.particle_count(),
            active_nodes: self.store.active_neurons(),
        }
    }
}
