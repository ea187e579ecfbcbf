//! Multi-character page layout
//!
//! Places the characters of a document left to right on a page, wrapping to
//! a new line when the next character would run past the right margin. Each
//! character gets its own Gaussian jitter: a planar offset and a rotation
//! about the center of its bounding box.
//!
//! Output strokes live in one shared page space and are already scaled, so
//! the emitter only has to apply offsets afterwards.

use crate::gaussian::{GaussianParams, GaussianSampler};
use inkplot_core::{Character, Point, Stroke};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Per-character jitter distributions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JitterParams {
    pub offset_x: GaussianParams,
    pub offset_y: GaussianParams,
    /// Rotation in degrees
    pub rotation_deg: GaussianParams,
}

/// Page geometry for document mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Left margin; no character starts left of it
    pub x_min: f64,
    /// Right margin; a character ending past it moves to the next line
    pub x_max: f64,
    /// Baseline of the first line
    pub y_start: f64,
    pub line_spacing: f64,
    pub column_spacing: f64,
    #[serde(default)]
    pub jitter: JitterParams,
    /// Fixed seed for reproducible jitter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 200.0,
            y_start: 0.0,
            line_spacing: 30.0,
            column_spacing: 5.0,
            jitter: JitterParams::default(),
            seed: None,
        }
    }
}

/// Axis-aligned bounding box of a character's scaled points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl LayoutBox {
    /// Box around `points` after scaling, `None` when there are no points
    pub fn from_points<'a, I>(points: I, scale: f64) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter().map(|p| (p.x * scale, p.y * scale));
        let (x, y) = iter.next()?;
        let mut bbox = Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        };
        for (x, y) in iter {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Lay out `characters` without further per-stroke processing
pub fn layout(
    characters: &[Character],
    scale: f64,
    params: &LayoutParams,
    sampler: &mut GaussianSampler,
) -> Vec<Stroke> {
    layout_with(characters, scale, params, sampler, Stroke::clone)
}

/// Lay out `characters`, running `process` on each stroke before placement.
///
/// Bounding boxes come from the unprocessed points so that smoothing or
/// interpolation overshoot does not change spacing.
pub fn layout_with<F>(
    characters: &[Character],
    scale: f64,
    params: &LayoutParams,
    sampler: &mut GaussianSampler,
    mut process: F,
) -> Vec<Stroke>
where
    F: FnMut(&Stroke) -> Stroke,
{
    let mut out = Vec::new();
    let mut cursor_x = params.x_min;
    let mut cursor_y = params.y_start;
    let mut line_has_char = false;
    let mut lines = 1usize;

    for (index, character) in characters.iter().enumerate() {
        let Some(bbox) = LayoutBox::from_points(character.points(), scale) else {
            trace!("Character {} is blank, advancing by column spacing", index);
            cursor_x += params.column_spacing;
            continue;
        };
        let width = bbox.width();

        if cursor_x + width > params.x_max && line_has_char {
            cursor_x = params.x_min;
            cursor_y += params.line_spacing;
            lines += 1;
        }

        let (pivot_x, pivot_y) = bbox.center();
        let dx = sampler.sample_with(&params.jitter.offset_x);
        let dy = sampler.sample_with(&params.jitter.offset_y);
        let theta = sampler.sample_with(&params.jitter.rotation_deg).to_radians();
        let (sin, cos) = theta.sin_cos();
        let shift_x = cursor_x - bbox.min_x;
        let shift_y = cursor_y - bbox.min_y;

        let mut placed: Vec<Stroke> = character
            .strokes()
            .iter()
            .map(|stroke| {
                process(stroke).map_points(|p| {
                    let rx = p.x * scale - pivot_x;
                    let ry = p.y * scale - pivot_y;
                    Point::new(
                        pivot_x + rx * cos - ry * sin + dx + shift_x,
                        pivot_y + rx * sin + ry * cos + dy + shift_y,
                        p.w,
                    )
                })
            })
            .collect();

        let left = placed
            .iter()
            .flat_map(|s| s.iter())
            .map(|p| p.x)
            .fold(f64::INFINITY, f64::min);
        if left < params.x_min {
            let nudge = params.x_min - left;
            placed = placed
                .iter()
                .map(|s| s.map_points(|p| Point::new(p.x + nudge, p.y, p.w)))
                .collect();
        }

        trace!(
            "Character {} placed at ({:.3}, {:.3}), rotation {:.3} rad",
            index,
            cursor_x,
            cursor_y,
            theta
        );
        out.extend(placed);
        cursor_x += width + params.column_spacing;
        line_has_char = true;
    }

    debug!(
        "Laid out {} characters on {} lines ({} strokes)",
        characters.len(),
        lines,
        out.len()
    );
    out
}
