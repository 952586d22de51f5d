//! # Backdrop Layers
//!
//! Drives the two stacked background layers from the host's update loop:
//! - Mounts a layer when it is enabled and unmounts (stops and drops) it when
//!   disabled, so re-enabling always starts a fresh instance
//! - Forwards viewport, pointer and theme changes as [`HostEvent`]s, only
//!   when the observed value actually changed
//! - Runs one frame per layer and paints the draw lists, neural field below
//!   and point mesh above
//!
//! Painting happens on the background layer without any `Sense`, so the
//! backdrop never captures pointer input and adds nothing to the
//! accessibility tree.

use egui::{Painter, Pos2, Rect, Shape};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::BackdropConfig;
use crate::engine::{FrameScheduler, HostEvent, LayerStats, NeuralField, PointMesh, Simulation, Theme};

/// Host-side view of the latest observed inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostInputs {
    pub viewport: Rect,
    pub pointer: Option<Pos2>,
    pub theme: Theme,
}

#[derive(Default)]
pub struct Backdrop {
    neural: Option<FrameScheduler<NeuralField>>,
    mesh: Option<FrameScheduler<PointMesh>>,
    last: Option<HostInputs>,
    shapes: Vec<Shape>,
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount or unmount layers to match the enable flags.
    pub fn sync_layers(&mut self, config: &BackdropConfig, inputs: &HostInputs, neural_enabled: bool, mesh_enabled: bool) {
        sync_layer(&mut self.neural, neural_enabled, inputs, || {
            ("neural-field", NeuralField::new(config.neural.clone()))
        });
        sync_layer(&mut self.mesh, mesh_enabled, inputs, || ("point-mesh", PointMesh::new(config.mesh.clone())));
    }

    /// Forward whatever changed since the previous call to every mounted layer.
    pub fn observe(&mut self, inputs: HostInputs) {
        let previous = self.last.replace(inputs);
        let mut events = Vec::with_capacity(3);
        if previous.map(|p| p.viewport) != Some(inputs.viewport) {
            events.push(HostEvent::Resized(inputs.viewport));
        }
        if let Some(pointer) = inputs.pointer {
            if previous.and_then(|p| p.pointer) != Some(pointer) {
                events.push(HostEvent::PointerMoved(pointer));
            }
        }
        if previous.map(|p| p.theme) != Some(inputs.theme) {
            events.push(HostEvent::ThemeChanged(inputs.theme));
        }
        for event in events {
            if let Some(layer) = self.neural.as_mut() {
                layer.handle_event(event);
            }
            if let Some(layer) = self.mesh.as_mut() {
                layer.handle_event(event);
            }
        }
    }

    /// Run one frame of every running layer and paint the result.
    /// Returns `true` while at least one layer wants another frame.
    pub fn paint(&mut self, painter: &Painter) -> bool {
        self.shapes.clear();
        let mut wants_frame = false;
        if let Some(layer) = self.neural.as_mut() {
            wants_frame |= layer.on_frame(&mut self.shapes);
        }
        if let Some(layer) = self.mesh.as_mut() {
            wants_frame |= layer.on_frame(&mut self.shapes);
        }
        painter.extend(self.shapes.drain(..));
        wants_frame
    }

    pub fn neural_stats(&self) -> Option<(LayerStats, u64)> {
        self.neural.as_ref().map(|l| (l.stats(), l.frames()))
    }

    pub fn mesh_stats(&self) -> Option<(LayerStats, u64)> {
        self.mesh.as_ref().map(|l| (l.stats(), l.frames()))
    }

    /// Stop and drop every layer.
    pub fn unmount_all(&mut self) {
        unmount(&mut self.neural);
        unmount(&mut self.mesh);
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount_all();
    }
}

fn sync_layer<S: Simulation>(
    slot: &mut Option<FrameScheduler<S>>,
    enabled: bool,
    inputs: &HostInputs,
    create: impl FnOnce() -> (&'static str, S),
) {
    match (enabled, slot.is_some()) {
        (true, false) => {
            let (name, simulation) = create();
            let Some(mut layer) = FrameScheduler::mount(name, simulation, inputs.viewport, inputs.theme, StdRng::from_entropy()) else {
                return;
            };
            layer.start();
            if let Some(pointer) = inputs.pointer {
                layer.handle_event(HostEvent::PointerMoved(pointer));
            }
            *slot = Some(layer);
        }
        (false, true) => unmount(slot),
        _ => {}
    }
}

fn unmount<S: Simulation>(slot: &mut Option<FrameScheduler<S>>) {
    if let Some(mut layer) = slot.take() {
        layer.stop();
        info!("Unmounted backdrop layer after {} frames", layer.frames());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Vec2, pos2};

    fn inputs(w: f32, h: f32) -> HostInputs {
        HostInputs {
            viewport: Rect::from_min_size(Pos2::ZERO, Vec2::new(w, h)),
            pointer: None,
            theme: Theme::Dark,
        }
    }

    #[test]
    fn toggling_mounts_fresh_instances() {
        let config = BackdropConfig::default();
        let mut backdrop = Backdrop::new();
        let i = inputs(1280.0, 800.0);
        backdrop.sync_layers(&config, &i, true, true);
        backdrop.observe(i);
        assert_eq!(backdrop.neural_stats().unwrap().0.nodes, 40);
        assert_eq!(backdrop.mesh_stats().unwrap().0.nodes, 68);

        backdrop.sync_layers(&config, &i, false, true);
        assert!(backdrop.neural_stats().is_none());
        backdrop.sync_layers(&config, &i, true, true);
        assert_eq!(backdrop.neural_stats().unwrap().1, 0);
    }

    #[test]
    fn empty_viewport_mounts_nothing() {
        let config = BackdropConfig::default();
        let mut backdrop = Backdrop::new();
        backdrop.sync_layers(&config, &inputs(0.0, 0.0), true, true);
        assert!(backdrop.neural_stats().is_none());
        assert!(backdrop.mesh_stats().is_none());
    }

    #[test]
    fn pointer_reaches_newly_mounted_layers() {
        let config = BackdropConfig::default();
        let mut backdrop = Backdrop::new();
        let mut i = inputs(1280.0, 800.0);
        i.pointer = Some(pos2(5.0, 6.0));
        backdrop.sync_layers(&config, &i, true, false);
        let layer = backdrop.neural.as_ref().unwrap();
        assert_eq!(layer.pointer().position(), Some(pos2(5.0, 6.0)));
    }
}
