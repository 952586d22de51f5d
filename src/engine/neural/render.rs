//! Draw list for the neural field.
//!
//! Connections first (so neurons sit on top of their lines), then particles,
//! then each neuron's pulse halo and body. Reads the store only.

use egui::{Shape, Stroke};

use super::store::{Connection, EntityStore, Neuron};
use crate::engine::geometry::lerp_along;
use crate::engine::surface::Surface;

/// Opacity of an idle connection line.
pub const IDLE_CONNECTION_OPACITY: f32 = 0.15;
/// Peak opacity of an active connection line.
pub const ACTIVE_CONNECTION_OPACITY: f32 = 0.7;
/// Peak opacity of a pulse halo (at resting radius).
pub const PULSE_OPACITY: f32 = 0.1;

pub fn render(store: &EntityStore, surface: &Surface, shapes: &mut Vec<Shape>) {
    shapes.reserve(store.connections.len() + store.particle_count() + store.neurons.len() * 2);

    for connection in &store.connections {
        draw_connection(store, connection, surface, shapes);
    }
    for neuron in &store.neurons {
        draw_neuron(neuron, surface, shapes);
    }
}

fn draw_connection(store: &EntityStore, connection: &Connection, surface: &Surface, shapes: &mut Vec<Shape>) {
    let from = store.neurons[connection.from].pos;
    let to = store.neurons[connection.to].pos;

    let stroke = if connection.activation.active {
        Stroke::new(
            connection.width + 1.0,
            connection.glow.alpha(connection.activation.remaining() * ACTIVE_CONNECTION_OPACITY),
        )
    } else {
        Stroke::new(connection.width, connection.base.alpha(IDLE_CONNECTION_OPACITY))
    };
    shapes.push(Shape::line_segment([surface.to_viewport(from), surface.to_viewport(to)], stroke));

    for particle in &connection.particles {
        let at = lerp_along(from, to, particle.progress);
        shapes.push(Shape::circle_filled(surface.to_viewport(at), particle.size, particle.color));
    }
}

fn draw_neuron(neuron: &Neuron, surface: &Surface, shapes: &mut Vec<Shape>) {
    let center = surface.to_viewport(neuron.pos);

    let span = neuron.pulse_max - neuron.resting_radius;
    let expansion = if span > 0.0 { (neuron.pulse_radius - neuron.resting_radius) / span } else { 0.0 };
    let halo = neuron.base.alpha(PULSE_OPACITY * (1.0 - expansion));
    shapes.push(Shape::circle_filled(center, neuron.pulse_radius, halo));

    shapes.push(Shape::circle_filled(center, neuron.radius, neuron.body_color()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NeuralConfig;
    use crate::engine::neural::store::{Particle, initialize};
    use crate::engine::neural::update::fire;
    use crate::engine::theme::{NeuralPalette, Theme};
    use egui::{Rect, Vec2, pos2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (EntityStore, Surface, NeuralPalette, StdRng) {
        let surface = Surface::from_size(1024.0, 768.0).unwrap();
        let palette = NeuralPalette::for_theme(Theme::Dark);
        let mut rng = StdRng::seed_from_u64(9);
        let store = initialize(&surface, &palette, &NeuralConfig::default(), &mut rng);
        (store, surface, palette, rng)
    }

    fn line_width(shape: &Shape) -> Option<f32> {
        match shape {
            Shape::LineSegment { stroke, .. } => Some(stroke.width),
            _ => None,
        }
    }

    #[test]
    fn idle_store_draws_one_line_per_connection_and_two_discs_per_neuron() {
        let (store, surface, _, _) = setup();
        let mut shapes = Vec::new();
        render(&store, &surface, &mut shapes);
        let lines = shapes.iter().filter(|s| matches!(s, Shape::LineSegment { .. })).count();
        let discs = shapes.iter().filter(|s| matches!(s, Shape::Circle(_))).count();
        assert_eq!(lines, store.connections.len());
        assert_eq!(discs, store.neurons.len() * 2);
    }

    #[test]
    fn active_connections_are_wider_and_carry_particles() {
        let (mut store, surface, palette, mut rng) = setup();
        let source = (0..store.neurons.len()).find(|&i| !store.outgoing[i].is_empty()).unwrap();
        fire(&mut store, source, &NeuralConfig::default(), &palette, &mut rng);

        let mut shapes = Vec::new();
        render(&store, &surface, &mut shapes);

        let widths: Vec<f32> = shapes.iter().filter_map(line_width).collect();
        for &ci in &store.outgoing[source] {
            assert_eq!(widths[ci], store.connections[ci].width + 1.0);
        }
        let discs = shapes.iter().filter(|s| matches!(s, Shape::Circle(_))).count();
        assert_eq!(discs, store.neurons.len() * 2 + store.outgoing[source].len());
    }

    #[test]
    fn particles_are_drawn_at_interpolated_positions() {
        let (mut store, _, _, _) = setup();
        let surface = Surface::new(Rect::from_min_size(pos2(10.0, 20.0), Vec2::new(1024.0, 768.0))).unwrap();
        let c = &mut store.connections[0];
        let (from, to) = (c.from, c.to);
        c.particles.push(Particle {
            progress: 0.25,
            speed: 0.01,
            size: 2.5,
            color: egui::Color32::RED,
        });
        let expected = surface.to_viewport(lerp_along(store.neurons[from].pos, store.neurons[to].pos, 0.25));

        let mut shapes = Vec::new();
        render(&store, &surface, &mut shapes);
        let particle = shapes
            .iter()
            .find_map(|s| match s {
                Shape::Circle(c) if c.fill == egui::Color32::RED => Some(c),
                _ => None,
            })
            .unwrap();
        assert_eq!(particle.center, expected);
        assert_eq!(particle.radius, 2.5);
    }
}
