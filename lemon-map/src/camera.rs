use std::time::{Duration, Instant};

use egui::Vec2;
use walkers::{MapMemory, Position};

use crate::types::{Lemon, MapBounds};

/// Zoom used when focusing a single lemon.
pub const FOCUS_ZOOM: f64 = 15.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 19.0;
/// Space kept between the outermost markers and the map edge.
const FIT_PADDING: f32 = 48.0;
const ANIMATION_DURATION: Duration = Duration::from_millis(500);

/// Camera operations the controller is allowed to trigger.
pub trait CameraHandle {
    /// Frames every lemon; does nothing for an empty slice.
    fn fit_all_markers(&mut self, lemons: &[Lemon]);

    /// Smoothly moves the camera to `position` at `zoom`.
    fn set_center(&mut self, position: Position, zoom: f64);
}

#[derive(Debug, Clone)]
struct CameraAnimation {
    from: Position,
    from_zoom: f64,
    to: Position,
    to_zoom: f64,
    started: Option<Instant>,
}

/// Owns the walkers map memory and animates it between camera targets.
pub struct MapCamera {
    memory: MapMemory,
    home: Position,
    viewport: Vec2,
    animation: Option<CameraAnimation>,
}

impl MapCamera {
    pub fn new(home: Position, zoom: f64) -> Self {
        let mut memory = MapMemory::default();
        let _ = memory.set_zoom(zoom.clamp(MIN_ZOOM, MAX_ZOOM));
        Self {
            memory,
            home,
            viewport: Vec2::ZERO,
            animation: None,
        }
    }

    pub fn memory_mut(&mut self) -> &mut MapMemory {
        &mut self.memory
    }

    /// Position the map shows while it still follows its home position.
    pub fn home(&self) -> Position {
        self.home
    }

    pub fn center(&self) -> Position {
        self.memory.detached().unwrap_or(self.home)
    }

    pub fn zoom(&self) -> f64 {
        self.memory.zoom()
    }

    /// Records the size of the map widget, needed to frame markers.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn animate_to(&mut self, to: Position, to_zoom: f64) {
        self.animation = Some(CameraAnimation {
            from: self.center(),
            from_zoom: self.zoom(),
            to,
            to_zoom: to_zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            started: None,
        });
    }

    /// Applies the running animation for the frame drawn at `now`.
    /// The first tick after a new target marks the animation start.
    pub fn tick(&mut self, now: Instant) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        let started = *animation.started.get_or_insert(now);
        let t = (now.saturating_duration_since(started).as_secs_f64()
            / ANIMATION_DURATION.as_secs_f64())
        .min(1.0);
        let eased = ease_in_out(t);

        let lat = lerp(animation.from.lat(), animation.to.lat(), eased);
        let lon = lerp(animation.from.lon(), animation.to.lon(), eased);
        let zoom = lerp(animation.from_zoom, animation.to_zoom, eased);

        self.memory.center_at(Position::from_lat_lon(lat, lon));
        let _ = self.memory.set_zoom(zoom.clamp(MIN_ZOOM, MAX_ZOOM));

        if t >= 1.0 {
            self.animation = None;
        }
    }
}

impl CameraHandle for MapCamera {
    fn fit_all_markers(&mut self, lemons: &[Lemon]) {
        let Some(bounds) = MapBounds::around(lemons.iter().map(Lemon::position)) else {
            return;
        };
        let (center, zoom) = bounds.fit(self.viewport, FIT_PADDING);
        self.animate_to(center, zoom.unwrap_or(FOCUS_ZOOM));
    }

    fn set_center(&mut self, position: Position, zoom: f64) {
        self.animate_to(position, zoom);
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
