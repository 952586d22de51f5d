//! Particle network simulation engine.
//!
//! This module provides the two ambient background layers and the machinery
//! that drives them:
//! - `surface`: full-viewport surface rectangle and resize bookkeeping
//! - `pointer`: last observed pointer position and proximity queries
//! - `theme`: dark/light palettes cached into entities at creation
//! - `geometry`: bounded integration and distance helpers
//! - `neural`: activation-capable neural field (neurons, connections, particles)
//! - `mesh`: plain point mesh with distance-based links and pointer attraction
//! - `scheduler`: per-frame Stopped → Running → Stopped loop around one layer
//!
//! ## Frame flow
//!
//! The host calls [`FrameScheduler::on_frame`] once per display refresh. The
//! scheduler applies the latest resize/theme values (rebuilding the store if
//! they changed), runs the layer's update, then its renderer, and hands the
//! resulting draw list back to the host. Nothing else ever mutates a layer.

pub mod geometry;
pub mod mesh;
pub mod neural;
pub mod pointer;
pub mod scheduler;
pub mod surface;
pub mod theme;

use egui::Shape;
use rand::rngs::StdRng;

pub use mesh::PointMesh;
pub use neural::NeuralField;
pub use pointer::InteractionTracker;
pub use scheduler::{FrameScheduler, HostEvent, LoopState};
pub use surface::Surface;
pub use theme::Theme;

/// Entity counts exposed for the host's stats readout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub nodes: usize,
    pub edges: usize,
    pub particles: usize,
    pub active_nodes: usize,
}

/// One background layer driven by a [`FrameScheduler`].
pub trait Simulation {
    /// Discard every entity and rebuild the store for `surface` and `theme`.
    fn reseed(&mut self, surface: &Surface, theme: Theme, rng: &mut StdRng);

    /// Advance the store by one frame.
    fn step(&mut self, surface: &Surface, pointer: &InteractionTracker, rng: &mut StdRng);

    /// Append this frame's draw list, in viewport coordinates.
    fn render(&self, surface: &Surface, shapes: &mut Vec<Shape>);

    /// Pointer distance under which interaction effects apply.
    fn proximity_radius(&self) -> f32;

    fn stats(&self) -> LayerStats;
}
