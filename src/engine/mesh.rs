//! Plain point mesh layer.
//!
//! Points drift and bounce; any two closer than the link distance are joined
//! by a faint line recomputed every frame. Points near the pointer are pulled
//! toward it. There is no activation state in this layer.

use egui::{Color32, Pos2, Shape, Stroke, Vec2};
use log::debug;
use rand::rngs::StdRng;

use super::geometry;
use super::pointer::InteractionTracker;
use super::surface::Surface;
use super::theme::{Theme, mesh_ink};
use super::{LayerStats, Simulation};
use crate::config::{MeshConfig, MeshProfile};

/// Opacity of a point before the layer opacity is applied.
pub const DOT_OPACITY: f32 = 0.6;
/// Opacity of a link before the layer opacity is applied.
pub const LINK_OPACITY: f32 = 0.2;
pub const LINK_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MeshPoint {
    pub pos: Pos2,
    pub vel: Vec2,
}

pub struct PointMesh {
    config: MeshConfig,
    /// Profile resolved for the current surface width.
    profile: MeshProfile,
    points: Vec<MeshPoint>,
    dot_color: Color32,
    link_color: Color32,
}

impl PointMesh {
    pub fn new(config: MeshConfig) -> Self {
        let profile = config.regular;
        Self {
            config,
            profile,
            points: Vec::new(),
            dot_color: Color32::TRANSPARENT,
            link_color: Color32::TRANSPARENT,
        }
    }

    pub fn points(&self) -> &[MeshPoint] {
        &self.points
    }

    pub fn profile(&self) -> &MeshProfile {
        &self.profile
    }

    /// Number of points for a surface under the matching profile.
    pub fn point_count(surface: &Surface, profile: &MeshProfile) -> usize {
        (surface.area() / profile.area_per_point as f64).floor() as usize
    }

    fn attract(&mut self, pointer: &InteractionTracker) {
        let Some(target) = pointer.position() else {
            return;
        };
        let attraction = self.config.attraction;
        let max_speed = self.config.max_speed;
        for point in &mut self.points {
            if !pointer.is_near(point.pos) {
                continue;
            }
            point.vel += (target - point.pos) * attraction;
            let speed = point.vel.length();
            if speed > max_speed {
                point.vel *= max_speed / speed;
            }
        }
    }
}

impl Simulation for PointMesh {
    fn reseed(&mut self, surface: &Surface, theme: Theme, rng: &mut StdRng) {
        self.profile = self.config.profile_for(surface.width());
        let ink = mesh_ink(theme);
        self.dot_color = ink.alpha(DOT_OPACITY * self.config.opacity);
        self.link_color = ink.alpha(LINK_OPACITY * self.config.opacity);

        let count = Self::point_count(surface, &self.profile);
        let radius = self.profile.dot_radius;
        let drift = self.profile.drift;
        self.points = (0..count)
            .map(|_| MeshPoint {
                pos: geometry::random_position(rng, surface, radius),
                vel: geometry::random_velocity(rng, drift),
            })
            .collect();
        debug!("Point mesh reseeded: {} points on {}x{}", count, surface.width(), surface.height());
    }

    fn step(&mut self, surface: &Surface, pointer: &InteractionTracker, _rng: &mut StdRng) {
        let radius = self.profile.dot_radius;
        for point in &mut self.points {
            geometry::integrate_bounded(&mut point.pos, &mut point.vel, surface, radius);
        }
        self.attract(pointer);
    }

    fn render(&self, surface: &Surface, shapes: &mut Vec<Shape>) {
        let max_d2 = self.profile.link_distance * self.profile.link_distance;
        let stroke = Stroke::new(LINK_WIDTH, self.link_color);
        for (i, a) in self.points.iter().enumerate() {
            for b in &self.points[i + 1..] {
                let d2 = a.pos.distance_sq(b.pos);
                // Coincident points give a zero-length segment: skip it.
                if d2 > 0.0 && d2 < max_d2 {
                    shapes.push(Shape::line_segment([surface.to_viewport(a.pos), surface.to_viewport(b.pos)], stroke));
                }
            }
        }
        for point in &self.points {
            shapes.push(Shape::circle_filled(surface.to_viewport(point.pos), self.profile.dot_radius, self.dot_color));
        }
    }

    fn proximity_radius(&self) -> f32 {
        self.profile.proximity_radius
    }

    fn stats(&self) -> LayerStats {
        LayerStats {
            nodes: self.points.len(),
            ..LayerStats::default()
        }
    }
}
