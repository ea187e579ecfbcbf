//! Stroke resampling
//!
//! Resamples a stroke at a target point density (samples per unit length).
//! Each input segment is sampled independently with `t` running from 0 to 1
//! inclusive, so both ends of every segment are emitted. An interior input
//! point therefore appears twice in the output: once as the end of the segment
//! before it and once as the start of the segment after it.

use inkplot_core::constants::{CATMULL_MIN_STEPS, LINEAR_MIN_STEPS, MAX_SEGMENT_STEPS};
use inkplot_core::{Point, Stroke};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interpolation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Keep the captured samples
    None,
    /// Straight lines between samples
    Linear,
    /// Uniform Catmull-Rom spline through the samples
    #[default]
    Catmull,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Linear => write!(f, "linear"),
            Self::Catmull => write!(f, "catmull"),
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "catmull" | "catmull-rom" => Ok(Self::Catmull),
            other => Err(format!("unknown interpolation method '{}'", other)),
        }
    }
}

/// Interpolation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationParams {
    pub method: InterpolationMethod,
    /// Samples per unit of segment length
    pub density: f64,
}

impl Default for InterpolationParams {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::Catmull,
            density: 2.0,
        }
    }
}

impl InterpolationParams {
    pub fn apply(&self, stroke: &Stroke) -> Stroke {
        interpolate(stroke, self.density, self.method)
    }
}

/// Resample `stroke` at `density` samples per unit length using `method`.
///
/// Strokes with fewer than two points are returned unchanged.
pub fn interpolate(stroke: &Stroke, density: f64, method: InterpolationMethod) -> Stroke {
    if stroke.len() < 2 {
        return stroke.clone();
    }
    match method {
        InterpolationMethod::None => stroke.clone(),
        InterpolationMethod::Linear => linear(stroke.points(), density),
        InterpolationMethod::Catmull => catmull_rom(stroke.points(), density),
    }
}

/// Sample count for a segment of length `distance`.
///
/// Non-finite or negative products fall back to `min_steps`. Counts are
/// capped at [`MAX_SEGMENT_STEPS`].
fn step_count(distance: f64, density: f64, min_steps: usize) -> usize {
    let raw = (distance * density).floor();
    if raw.is_finite() && raw > 0.0 {
        (raw.min(MAX_SEGMENT_STEPS as f64) as usize).max(min_steps)
    } else {
        min_steps
    }
}

fn linear(points: &[Point], density: f64) -> Stroke {
    let mut out = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let steps = step_count(a.distance_to(b), density, LINEAR_MIN_STEPS);
        let last = (steps - 1) as f64;
        out.extend((0..steps).map(|j| {
            if j == steps - 1 {
                *b
            } else {
                a.lerp(b, j as f64 / last)
            }
        }));
    }
    Stroke::new(out)
}

/// Catmull-Rom basis weights at parameter `t`
fn catmull_basis(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

fn catmull_rom(points: &[Point], density: f64) -> Stroke {
    let n = points.len() as isize;
    let get = |i: isize| &points[i.clamp(0, n - 1) as usize];

    let mut out = Vec::new();
    for i in 0..n - 1 {
        let (p0, p1, p2, p3) = (get(i - 1), get(i), get(i + 1), get(i + 2));
        let steps = step_count(p1.distance_to(p2), density, CATMULL_MIN_STEPS);
        let last = (steps - 1) as f64;

        for j in 0..steps {
            // segment ends are emitted exactly rather than through the basis
            if j == 0 {
                out.push(*p1);
                continue;
            }
            if j == steps - 1 {
                out.push(*p2);
                continue;
            }
            let [b0, b1, b2, b3] = catmull_basis(j as f64 / last);
            out.push(Point::new(
                b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
                b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
                b0 * p0.w + b1 * p1.w + b2 * p2.w + b3 * p3.w,
            ));
        }
    }
    Stroke::new(out)
}
