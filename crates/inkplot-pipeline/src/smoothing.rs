//! Moving-average stroke smoothing.

use inkplot_core::{Point, Stroke};
use serde::{Deserialize, Serialize};

/// Where smoothing runs relative to interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingStage {
    /// Denoise the raw capture, then resample it
    #[default]
    BeforeInterpolation,
    /// Resample first, then denoise the dense result
    AfterInterpolation,
}

/// Smoothing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub enabled: bool,
    /// Window size in samples
    pub window: usize,
    #[serde(default)]
    pub stage: SmoothingStage,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            enabled: false,
            window: 5,
            stage: SmoothingStage::BeforeInterpolation,
        }
    }
}

impl SmoothingParams {
    /// Smooth `stroke` if enabled and scheduled for `stage`
    pub fn apply_at(&self, stage: SmoothingStage, stroke: &Stroke) -> Stroke {
        if self.enabled && self.stage == stage {
            smooth(stroke, self.window)
        } else {
            stroke.clone()
        }
    }
}

/// Unweighted moving average over a window of `window_size` samples.
///
/// The window for sample `i` spans `i - window_size/2 ..= i + window_size/2`
/// with indices clamped to the stroke, so samples near either end repeat the
/// end point. Strokes of two points or fewer, and windows of one sample or
/// fewer, are returned unchanged. The output always has the input's length.
pub fn smooth(stroke: &Stroke, window_size: usize) -> Stroke {
    let points = stroke.points();
    if points.len() <= 2 || window_size <= 1 {
        return stroke.clone();
    }

    let half = (window_size / 2) as isize;
    let last = points.len() as isize - 1;
    let count = (2 * half + 1) as f64;

    (0..points.len() as isize)
        .map(|i| {
            let (mut sx, mut sy, mut sw) = (0.0, 0.0, 0.0);
            for j in -half..=half {
                let p = &points[(i + j).clamp(0, last) as usize];
                sx += p.x;
                sy += p.y;
                sw += p.w;
            }
            Point::new(sx / count, sy / count, sw / count)
        })
        .collect()
}
