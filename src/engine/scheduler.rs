//! Frame scheduler: the per-refresh loop around one backdrop layer.
//!
//! A scheduler is created when its hosting view mounts and dropped when the
//! view goes away. Its life is a one-way `Stopped → Running → Stopped` trip:
//! once stopped it can not be restarted, the host mounts a fresh instance
//! instead.
//!
//! Host events (resize, pointer, theme) only record the latest observed
//! value. The store is touched exclusively from [`FrameScheduler::on_frame`],
//! which first applies those values, then updates and renders.

use egui::{Pos2, Rect, Shape};
use log::{debug, info, warn};
use rand::rngs::StdRng;

use super::pointer::InteractionTracker;
use super::surface::{Surface, SurfaceManager};
use super::theme::Theme;
use super::{LayerStats, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Notifications from the hosting view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Viewport rectangle changed.
    Resized(Rect),
    /// Pointer or touch moved, in viewport coordinates.
    PointerMoved(Pos2),
    ThemeChanged(Theme),
}

pub struct FrameScheduler<S: Simulation> {
    name: &'static str,
    state: LoopState,
    /// Set by the first `start`; a stopped scheduler with this set is finished.
    started: bool,
    simulation: S,
    surface: SurfaceManager,
    pointer: InteractionTracker,
    /// Last pointer position in viewport coordinates, re-mapped after a resize.
    pointer_viewport: Option<Pos2>,
    theme: Theme,
    pending_theme: Option<Theme>,
    rng: StdRng,
    frames: u64,
}

impl<S: Simulation> FrameScheduler<S> {
    /// Mount a layer on the viewport. Returns `None` (and never starts) when
    /// there is no drawable surface yet.
    pub fn mount(name: &'static str, simulation: S, viewport: Rect, theme: Theme, rng: StdRng) -> Option<Self> {
        let Some(surface) = Surface::new(viewport) else {
            debug!("{}: no drawable surface ({:?}), not mounting", name, viewport);
            return None;
        };
        let pointer = InteractionTracker::new(simulation.proximity_radius());
        Some(Self {
            name,
            state: LoopState::Stopped,
            started: false,
            simulation,
            surface: SurfaceManager::new(surface),
            pointer,
            pointer_viewport: None,
            theme,
            pending_theme: None,
            rng,
            frames: 0,
        })
    }

    /// Seed the store and enter `Running`. Refused after the first run.
    pub fn start(&mut self) -> bool {
        if self.started {
            warn!("{}: start() after the loop already ran; mount a new instance instead", self.name);
            return false;
        }
        self.started = true;
        self.reseed();
        self.state = LoopState::Running;
        info!("{}: running", self.name);
        true
    }

    /// Cancel the loop. Later events and frame callbacks are ignored.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            info!("{}: stopped after {} frames", self.name, self.frames);
        }
        self.state = LoopState::Stopped;
        self.pending_theme = None;
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        if self.state != LoopState::Running {
            return;
        }
        match event {
            HostEvent::Resized(rect) => self.surface.notify_resize(rect),
            HostEvent::PointerMoved(pos) => {
                self.pointer_viewport = Some(pos);
                self.pointer.observe(self.surface.current().to_local(pos));
            }
            HostEvent::ThemeChanged(theme) => {
                self.pending_theme = if theme != self.theme { Some(theme) } else { None };
            }
        }
    }

    /// Run one frame: apply pending resize/theme, update, render.
    ///
    /// Appends the draw list to `shapes` and returns `true` if the host should
    /// schedule another frame; a stopped scheduler does nothing and returns `false`.
    pub fn on_frame(&mut self, shapes: &mut Vec<Shape>) -> bool {
        if self.state != LoopState::Running {
            return false;
        }

        let resized = self.surface.take_resize().is_some();
        let rethemed = match self.pending_theme.take() {
            Some(theme) => {
                self.theme = theme;
                true
            }
            None => false,
        };
        if resized {
            if let Some(pos) = self.pointer_viewport {
                self.pointer.observe(self.surface.current().to_local(pos));
            }
        }
        if resized || rethemed {
            self.reseed();
        }

        let surface = *self.surface.current();
        self.simulation.step(&surface, &self.pointer, &mut self.rng);
        self.simulation.render(&surface, shapes);
        self.frames += 1;
        true
    }

    fn reseed(&mut self) {
        let surface = *self.surface.current();
        self.simulation.reseed(&surface, self.theme, &mut self.rng);
        self.pointer.set_radius(self.simulation.proximity_radius());
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames executed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn surface(&self) -> &Surface {
        self.surface.current()
    }

    pub fn pointer(&self) -> &InteractionTracker {
        &self.pointer
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn stats(&self) -> LayerStats {
        self.simulation.stats()
    }
}
