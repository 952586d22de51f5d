//! Per-frame update of the neural field.
//!
//! Order matters and is fixed:
//! 1. spontaneous firing of one random neuron
//! 2. particle advance and arrival
//! 3. neuron drift with edge bounce against the current radius
//! 4. pulse halo oscillation
//! 5. activation decay
//! 6. pointer-driven firing

use rand::Rng;

use super::store::{EntityStore, Particle};
use crate::config::NeuralConfig;
use crate::engine::geometry;
use crate::engine::pointer::InteractionTracker;
use crate::engine::surface::Surface;
use crate::engine::theme::NeuralPalette;

/// Everything the update pass reads besides the store itself.
pub struct UpdateContext<'a> {
    pub config: &'a NeuralConfig,
    pub palette: &'a NeuralPalette,
    pub surface: &'a Surface,
    pub pointer: &'a InteractionTracker,
}

/// Run one frame of the update in place.
pub fn step<R: Rng + ?Sized>(store: &mut EntityStore, ctx: &UpdateContext<'_>, rng: &mut R) {
    fire_spontaneously(store, ctx, rng);
    advance_particles(store, ctx.config);
    move_neurons(store, ctx.surface);
    oscillate_pulses(store);
    decay_activations(store, ctx.config);
    fire_near_pointer(store, ctx, rng);
}

/// Fire neuron `index` and, if it was at rest, light up its outgoing
/// connections with one fresh particle each.
pub fn fire<R: Rng + ?Sized>(store: &mut EntityStore, index: usize, config: &NeuralConfig, palette: &NeuralPalette, rng: &mut R) -> bool {
    if !store.neurons[index].fire(config.activation_growth) {
        return false;
    }
    for &ci in &store.outgoing[index] {
        let connection = &mut store.connections[ci];
        connection.activation.trigger();
        connection.particles.push(Particle::spawn(config, palette, rng));
    }
    true
}

fn fire_spontaneously<R: Rng + ?Sized>(store: &mut EntityStore, ctx: &UpdateContext<'_>, rng: &mut R) {
    if store.neurons.is_empty() || !rng.gen_bool(ctx.config.spontaneous_probability) {
        return;
    }
    let index = rng.gen_range(0..store.neurons.len());
    fire(store, index, ctx.config, ctx.palette, rng);
}

/// Particles that reach the end are dropped and fire the destination neuron.
/// The destination's own connections are not lit by an arrival.
fn advance_particles(store: &mut EntityStore, config: &NeuralConfig) {
    for connection in &mut store.connections {
        let before = connection.particles.len();
        connection.particles.retain_mut(|p| {
            p.progress += p.speed;
            p.progress < 1.0
        });
        if connection.particles.len() < before {
            store.neurons[connection.to].fire(config.activation_growth);
        }
    }
}

fn move_neurons(store: &mut EntityStore, surface: &Surface) {
    for neuron in &mut store.neurons {
        geometry::integrate_bounded(&mut neuron.pos, &mut neuron.vel, surface, neuron.radius);
    }
}

fn oscillate_pulses(store: &mut EntityStore) {
    for neuron in &mut store.neurons {
        if neuron.pulse_outward {
            neuron.pulse_radius += neuron.pulse_speed;
            if neuron.pulse_radius >= neuron.pulse_max {
                neuron.pulse_radius = neuron.pulse_max;
                neuron.pulse_outward = false;
            }
        } else {
            neuron.pulse_radius -= neuron.pulse_speed;
            if neuron.pulse_radius <= neuron.resting_radius {
                neuron.pulse_radius = neuron.resting_radius;
                neuron.pulse_outward = true;
            }
        }
    }
}

fn decay_activations(store: &mut EntityStore, config: &NeuralConfig) {
    for neuron in &mut store.neurons {
        if !neuron.activation.active {
            continue;
        }
        neuron.activation.advance(config.activation_step);
        neuron.radius = if neuron.activation.active {
            neuron.resting_radius + config.activation_growth * neuron.activation.remaining()
        } else {
            neuron.resting_radius
        };
    }
    for connection in &mut store.connections {
        connection.activation.advance(config.activation_step);
    }
}

fn fire_near_pointer<R: Rng + ?Sized>(store: &mut EntityStore, ctx: &UpdateContext<'_>, rng: &mut R) {
    if ctx.pointer.position().is_none() {
        return;
    }
    for index in 0..store.neurons.len() {
        let neuron = &store.neurons[index];
        if neuron.activation.active || !ctx.pointer.is_near(neuron.pos) {
            continue;
        }
        if rng.gen_bool(ctx.config.hover_probability) && fire(store, index, ctx.config, ctx.palette, rng) {
            // Firing grows the disc after this frame's bounce.
            let neuron = &mut store.neurons[index];
            geometry::keep_inside(&mut neuron.pos, ctx.surface, neuron.radius);
        }
    }
}
