//! Preview view transform
//!
//! World coordinates map to screen coordinates as `screen = world * zoom + pan`.
//! The transform is a plain value owned by whoever hosts the preview.

use crate::constants::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use serde::{Deserialize, Serialize};

/// Zoom and pan of a preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }

    pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }

    /// Wheel zoom about the cursor.
    ///
    /// A negative `wheel_delta_y` zooms in, anything else zooms out. The world
    /// point under `(cursor_x, cursor_y)` stays under the cursor.
    pub fn zoom_at(&self, cursor_x: f64, cursor_y: f64, wheel_delta_y: f64) -> Self {
        let factor = if wheel_delta_y < 0.0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        let (wx, wy) = self.to_world(cursor_x, cursor_y);
        Self {
            zoom: self.zoom * factor,
            pan_x: self.pan_x - wx * (factor - 1.0) * self.zoom,
            pan_y: self.pan_y - wy * (factor - 1.0) * self.zoom,
        }
    }

    /// Shift by a screen-space delta
    pub fn panned_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
            ..*self
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let v = ViewTransform::new(2.5, 10.0, -4.0);
        let (sx, sy) = v.to_screen(3.0, 7.0);
        let (wx, wy) = v.to_world(sx, sy);
        assert!((wx - 3.0).abs() < 1e-12 && (wy - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let v = ViewTransform::new(1.5, 20.0, 30.0);
        let cursor = (140.0, 95.0);
        let before = v.to_world(cursor.0, cursor.1);
        let zoomed = v.zoom_at(cursor.0, cursor.1, -120.0);
        assert!((zoomed.zoom - 1.65).abs() < 1e-12);
        let after = zoomed.to_world(cursor.0, cursor.1);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_direction() {
        let v = ViewTransform::default();
        assert!(v.zoom_at(0.0, 0.0, -1.0).zoom > 1.0);
        assert!(v.zoom_at(0.0, 0.0, 1.0).zoom < 1.0);
        assert!(v.zoom_at(0.0, 0.0, 0.0).zoom < 1.0);
    }

    #[test]
    fn test_reset() {
        let mut v = ViewTransform::new(3.0, 1.0, 2.0).panned_by(5.0, 5.0);
        assert_eq!(v.pan_x, 6.0);
        v.reset();
        assert_eq!(v, ViewTransform::default());
    }
}
