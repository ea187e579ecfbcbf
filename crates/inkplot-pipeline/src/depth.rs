//! Weight-to-depth calibration.

use inkplot_core::constants::SPAN_EPSILON;
use serde::{Deserialize, Serialize};

/// Linear map from a captured weight to a tool-depth offset.
///
/// The offset is added to the pen-down height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthMapper {
    pub z_min: f64,
    pub z_max: f64,
    pub w_min: f64,
    pub w_max: f64,
}

impl Default for DepthMapper {
    fn default() -> Self {
        Self {
            z_min: -0.4,
            z_max: 0.4,
            w_min: 0.0,
            w_max: 6.0,
        }
    }
}

impl DepthMapper {
    pub fn new(z_min: f64, z_max: f64, w_min: f64, w_max: f64) -> Self {
        Self {
            z_min,
            z_max,
            w_min,
            w_max,
        }
    }

    /// True when the weight domain is too narrow to map
    pub fn is_degenerate(&self) -> bool {
        let span = self.w_max - self.w_min;
        !span.is_finite() || span.abs() < SPAN_EPSILON
    }

    /// Depth offset for weight `w`.
    ///
    /// Weights outside `[w_min, w_max]` extrapolate linearly. A degenerate
    /// weight domain yields `z_min`.
    pub fn depth(&self, w: f64) -> f64 {
        if self.is_degenerate() {
            return self.z_min;
        }
        self.z_min + (self.z_max - self.z_min) * (w - self.w_min) / (self.w_max - self.w_min)
    }
}
