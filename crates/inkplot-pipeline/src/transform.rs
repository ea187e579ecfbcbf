//! Pipeline space to machine space.

use inkplot_core::Point;
use serde::{Deserialize, Serialize};

/// Uniform scale followed by an offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    pub scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

impl CoordinateTransform {
    pub fn new(scale: f64, x_offset: f64, y_offset: f64) -> Self {
        Self {
            scale,
            x_offset,
            y_offset,
        }
    }

    /// Same offsets with unit scale, for input that is already scaled
    pub fn offset_only(&self) -> Self {
        Self {
            scale: 1.0,
            ..*self
        }
    }

    /// Machine X/Y for `point`; the weight is not touched
    pub fn apply(&self, point: &Point) -> (f64, f64) {
        (
            point.x * self.scale + self.x_offset,
            point.y * self.scale + self.y_offset,
        )
    }
}
