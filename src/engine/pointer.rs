//! Pointer/touch position tracking in surface coordinates.

use egui::Pos2;

/// Last observed pointer position plus the proximity radius of the layer
/// reading it. Overwritten on every movement event, read-only to the update
/// and render passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionTracker {
    position: Option<Pos2>,
    radius: f32,
}

impl InteractionTracker {
    pub fn new(radius: f32) -> Self {
        Self { position: None, radius }
    }

    /// Record a pointer position (surface-local).
    pub fn observe(&mut self, position: Pos2) {
        self.position = Some(position);
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// `None` until the first pointer event arrives.
    pub fn position(&self) -> Option<Pos2> {
        self.position
    }

    /// Whether `point` lies strictly inside the proximity radius.
    pub fn is_near(&self, point: Pos2) -> bool {
        match self.position {
            Some(pointer) => pointer.distance_sq(point) < self.radius * self.radius,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn nothing_is_near_before_first_event() {
        let tracker = InteractionTracker::new(150.0);
        assert!(!tracker.is_near(pos2(0.0, 0.0)));
        assert!(tracker.position().is_none());
    }

    #[test]
    fn proximity_boundary_is_exclusive() {
        let mut tracker = InteractionTracker::new(100.0);
        tracker.observe(pos2(200.0, 200.0));
        assert!(tracker.is_near(pos2(200.0, 200.0)));
        assert!(tracker.is_near(pos2(299.9, 200.0)));
        assert!(!tracker.is_near(pos2(300.0, 200.0)));
        assert!(!tracker.is_near(pos2(200.0, 301.0)));
    }

    #[test]
    fn latest_observation_wins() {
        let mut tracker = InteractionTracker::new(10.0);
        tracker.observe(pos2(0.0, 0.0));
        tracker.observe(pos2(500.0, 500.0));
        assert_eq!(tracker.position(), Some(pos2(500.0, 500.0)));
        assert!(!tracker.is_near(pos2(0.0, 0.0)));
    }
}
