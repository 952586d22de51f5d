//! Full-viewport drawing surface and resize bookkeeping.

use egui::{Pos2, Rect, Vec2};
use log::debug;

/// A non-empty rectangle in viewport pixels that the layers paint into.
///
/// Entity positions are kept in surface-local coordinates (origin at the
/// surface's top-left corner) and translated on the way to the painter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    rect: Rect,
}

impl Surface {
    /// Wrap a viewport rectangle. Returns `None` for empty or non-finite rects,
    /// i.e. when there is nothing to draw on yet.
    pub fn new(rect: Rect) -> Option<Self> {
        let finite = rect.min.x.is_finite() && rect.min.y.is_finite() && rect.max.x.is_finite() && rect.max.y.is_finite();
        if finite && rect.width() > 0.0 && rect.height() > 0.0 { Some(Self { rect }) } else { None }
    }

    /// Surface of the given size anchored at the viewport origin.
    pub fn from_size(width: f32, height: f32) -> Option<Self> {
        Self::new(Rect::from_min_size(Pos2::ZERO, Vec2::new(width, height)))
    }

    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }

    /// Area in px², computed in f64 so density divisions floor exactly.
    pub fn area(&self) -> f64 {
        self.rect.width() as f64 * self.rect.height() as f64
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Viewport → surface-local coordinates.
    pub fn to_local(&self, viewport_pos: Pos2) -> Pos2 {
        (viewport_pos - self.rect.min).to_pos2()
    }

    /// Surface-local → viewport coordinates.
    pub fn to_viewport(&self, local_pos: Pos2) -> Pos2 {
        self.rect.min + local_pos.to_vec2()
    }
}

/// Owns the current surface and records resize notifications until the
/// next frame picks them up.
#[derive(Debug)]
pub struct SurfaceManager {
    current: Surface,
    pending: Option<Surface>,
    resizes: u64,
}

impl SurfaceManager {
    pub fn new(surface: Surface) -> Self {
        Self {
            current: surface,
            pending: None,
            resizes: 0,
        }
    }

    pub fn current(&self) -> &Surface {
        &self.current
    }

    /// Record a new viewport rectangle. Empty rects (e.g. a minimized window)
    /// are ignored and the current surface is kept.
    pub fn notify_resize(&mut self, rect: Rect) {
        match Surface::new(rect) {
            Some(surface) if surface != self.current => self.pending = Some(surface),
            Some(_) => self.pending = None,
            None => debug!("Ignoring resize to empty surface {:?}", rect),
        }
    }

    /// Apply a pending resize, returning the new surface if it changed.
    pub fn take_resize(&mut self) -> Option<Surface> {
        let surface = self.pending.take()?;
        self.current = surface;
        self.resizes += 1;
        Some(surface)
    }

    /// Number of resizes applied so far.
    pub fn resizes(&self) -> u64 {
        self.resizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn empty_or_invalid_rects_are_not_surfaces() {
        assert!(Surface::from_size(0.0, 600.0).is_none());
        assert!(Surface::from_size(800.0, 0.0).is_none());
        assert!(Surface::from_size(f32::NAN, 10.0).is_none());
        assert!(Surface::new(Rect::NOTHING).is_none());
        assert!(Surface::from_size(800.0, 600.0).is_some());
    }

    #[test]
    fn coordinate_translation_round_trips_through_origin() {
        let surface = Surface::new(Rect::from_min_size(pos2(10.0, 20.0), Vec2::new(100.0, 50.0))).unwrap();
        assert_eq!(surface.to_local(pos2(15.0, 25.0)), pos2(5.0, 5.0));
        assert_eq!(surface.to_viewport(pos2(5.0, 5.0)), pos2(15.0, 25.0));
        assert_eq!(surface.area(), 5000.0);
    }

    #[test]
    fn resize_is_applied_only_when_taken() {
        let mut manager = SurfaceManager::new(Surface::from_size(800.0, 600.0).unwrap());
        assert!(manager.take_resize().is_none());

        manager.notify_resize(Rect::from_min_size(Pos2::ZERO, Vec2::new(1024.0, 768.0)));
        assert_eq!(manager.current().width(), 800.0);
        let applied = manager.take_resize().unwrap();
        assert_eq!(applied.width(), 1024.0);
        assert_eq!(manager.current().height(), 768.0);
        assert_eq!(manager.resizes(), 1);
        assert!(manager.take_resize().is_none());
    }

    #[test]
    fn same_size_and_empty_resizes_are_dropped() {
        let mut manager = SurfaceManager::new(Surface::from_size(800.0, 600.0).unwrap());
        manager.notify_resize(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));
        assert!(manager.take_resize().is_none());
        manager.notify_resize(Rect::from_min_size(Pos2::ZERO, Vec2::ZERO));
        assert!(manager.take_resize().is_none());
        assert_eq!(manager.resizes(), 0);
    }
}
