//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;

/// Background grid mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    #[default]
    None,
    Dot,
    Line,
}

/// Viewport manages the view transform for the canvas.
///
/// Panning happens in screen space. Zooming scales about the screen origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space translation applied before scaling.
    pub pan_offset: Vec2,
    /// Zoom factor, 1.0 = 100%.
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 5.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport with the scale limits of `config`.
    pub fn with_limits(config: &EditorConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            ..Self::default()
        }
    }

    /// World to screen transform: translate by the pan offset, then scale.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan_offset) * Affine::scale(self.scale)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.pan_offset.x) / self.scale,
            (screen_point.y - self.pan_offset.y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a raw screen delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    /// Set the scale, clamped to the limits.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    pub fn zoom_by(&mut self, step: f64) {
        self.set_scale(self.scale + step);
    }

    /// Handle a wheel event. With the zoom modifier the vertical delta
    /// zooms, otherwise the delta pans the view.
    pub fn wheel(&mut self, delta: Vec2, zoom_modifier: bool, zoom_factor: f64) {
        if zoom_modifier {
            self.set_scale(self.scale - delta.y * zoom_factor);
        } else {
            self.pan_offset -= delta;
        }
    }

    /// Zoom level as a rounded percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }
}
