//! Geometry helpers shared by both layers.
//!
//! Contains:
//! - Axis bounds for a disc of a given radius inside a surface
//! - Uniform placement inside those bounds
//! - Velocity integration with bounce at the bounds
//! - Linear interpolation along a connection

use egui::{Pos2, Vec2, pos2};
use rand::Rng;

use super::surface::Surface;

/// Inclusive `[lo, hi]` range a disc centre may occupy along one axis.
///
/// For surfaces narrower than the disc the range collapses to the centre
/// line instead of inverting.
pub fn axis_bounds(extent: f32, radius: f32) -> (f32, f32) {
    let mid = extent / 2.0;
    (radius.min(mid), (extent - radius).max(mid))
}

/// Uniform random position for a disc of `radius` that keeps it fully inside.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, surface: &Surface, radius: f32) -> Pos2 {
    let (x_lo, x_hi) = axis_bounds(surface.width(), radius);
    let (y_lo, y_hi) = axis_bounds(surface.height(), radius);
    pos2(sample_between(rng, x_lo, x_hi), sample_between(rng, y_lo, y_hi))
}

/// Random velocity with each component drawn from `[-drift, drift)`.
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, drift: f32) -> Vec2 {
    Vec2::new(sample_between(rng, -drift, drift), sample_between(rng, -drift, drift))
}

fn sample_between<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Advance one axis by its velocity, reflecting at `[lo, hi]`.
///
/// The position is clamped onto the bound it crossed and the velocity is
/// pointed back inward, so the centre never leaves the range.
pub fn bounce_axis(pos: &mut f32, vel: &mut f32, lo: f32, hi: f32) {
    *pos += *vel;
    if *pos < lo {
        *pos = lo;
        *vel = vel.abs();
    } else if *pos > hi {
        *pos = hi;
        *vel = -vel.abs();
    }
}

/// Integrate `pos += vel` for a disc of `radius`, bouncing off the surface edges.
pub fn integrate_bounded(pos: &mut Pos2, vel: &mut Vec2, surface: &Surface, radius: f32) {
    let (x_lo, x_hi) = axis_bounds(surface.width(), radius);
    let (y_lo, y_hi) = axis_bounds(surface.height(), radius);
    bounce_axis(&mut pos.x, &mut vel.x, x_lo, x_hi);
    bounce_axis(&mut pos.y, &mut vel.y, y_lo, y_hi);
}

/// Pull a disc centre back inside the bounds for `radius` without touching velocity.
pub fn keep_inside(pos: &mut Pos2, surface: &Surface, radius: f32) {
    let (x_lo, x_hi) = axis_bounds(surface.width(), radius);
    let (y_lo, y_hi) = axis_bounds(surface.height(), radius);
    pos.x = pos.x.clamp(x_lo, x_hi);
    pos.y = pos.y.clamp(y_lo, y_hi);
}

/// Point at fraction `t` of the way from `from` to `to`.
pub fn lerp_along(from: Pos2, to: Pos2, t: f32) -> Pos2 {
    from + (to - from) * t
}
