//! Preview scenes
//!
//! A [`PreviewScene`] is what a renderer draws: pen-down polylines plus
//! pen-up travel segments, with their bounds. It can be built from the
//! processed strokes or from the emitted program, and exported as SVG.
//! The Y axis points down, as on the capture canvas.

use crate::program_parser::{parse_program, segments_from_moves, PreviewSegment, SegmentKind};
use crate::viewport::Bounds;
use inkplot_core::{Stroke, ViewTransform};
use inkplot_pipeline::{PipelineOutput, ProgramMove};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;
use tracing::debug;

/// What a preview shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Processed strokes in pipeline space
    #[default]
    Processed,
    /// Moves of the emitted program in machine space
    Program,
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewMode::Processed => write!(f, "processed"),
            PreviewMode::Program => write!(f, "program"),
        }
    }
}

impl FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "processed" | "strokes" => Ok(PreviewMode::Processed),
            "program" | "gcode" => Ok(PreviewMode::Program),
            other => Err(format!("unknown preview mode '{}'", other)),
        }
    }
}

/// Drawable preview content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewScene {
    draw_paths: Vec<Vec<(f64, f64)>>,
    travel: Vec<PreviewSegment>,
    bounds: Bounds,
}

impl PreviewScene {
    /// One polyline per processed stroke
    pub fn from_strokes(strokes: &[Stroke]) -> Self {
        let draw_paths = strokes
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.iter().map(|p| (p.x, p.y)).collect())
            .collect();
        Self::build(draw_paths, Vec::new())
    }

    /// Scene from the typed move list of an emitted program
    pub fn from_moves(moves: &[ProgramMove]) -> Self {
        Self::from_segments(&segments_from_moves(moves))
    }

    /// Scene from program text of unknown origin
    pub fn from_program_text(text: &str) -> Self {
        Self::from_segments(&parse_program(text))
    }

    /// Scene for a pipeline run in the requested mode
    pub fn from_output(output: &PipelineOutput, mode: PreviewMode) -> Self {
        match mode {
            PreviewMode::Processed => Self::from_strokes(&output.strokes),
            PreviewMode::Program => Self::from_moves(output.program.moves()),
        }
    }

    /// Chain consecutive draw segments into polylines, keep travels apart
    fn from_segments(segments: &[PreviewSegment]) -> Self {
        let mut draw_paths: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut travel = Vec::new();
        let mut open = false;

        for segment in segments {
            match segment.kind {
                SegmentKind::Travel => {
                    travel.push(*segment);
                    open = false;
                }
                SegmentKind::Draw => {
                    let tail = if open { draw_paths.last_mut() } else { None };
                    match tail {
                        Some(path) if path.last() == Some(&segment.from) => path.push(segment.to),
                        _ => draw_paths.push(vec![segment.from, segment.to]),
                    }
                    open = true;
                }
            }
        }

        Self::build(draw_paths, travel)
    }

    fn build(draw_paths: Vec<Vec<(f64, f64)>>, travel: Vec<PreviewSegment>) -> Self {
        let mut bounds = Bounds::new();
        for &(x, y) in draw_paths.iter().flatten() {
            bounds.update(x, y);
        }
        for segment in &travel {
            bounds.update(segment.from.0, segment.from.1);
            bounds.update(segment.to.0, segment.to.1);
        }
        debug!(
            "Preview scene: {} draw paths, {} travel segments",
            draw_paths.len(),
            travel.len()
        );
        Self {
            draw_paths,
            travel,
            bounds,
        }
    }

    pub fn draw_paths(&self) -> &[Vec<(f64, f64)>] {
        &self.draw_paths
    }

    pub fn travel_segments(&self) -> &[PreviewSegment] {
        &self.travel
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.draw_paths.is_empty() && self.travel.is_empty()
    }

    /// SVG path data for the pen-down layer
    pub fn draw_path_data(&self) -> String {
        let mut d = String::with_capacity(self.draw_paths.len() * 32);
        for path in &self.draw_paths {
            let mut points = path.iter();
            let Some(&(x, y)) = points.next() else {
                continue;
            };
            let _ = write!(d, "M {:.3} {:.3} ", x, y);
            if path.len() == 1 {
                // a lone point still needs a visible mark
                let _ = write!(d, "L {:.3} {:.3} ", x, y);
            }
            for &(x, y) in points {
                let _ = write!(d, "L {:.3} {:.3} ", x, y);
            }
        }
        d.trim_end().to_string()
    }

    /// SVG path data for the pen-up layer
    pub fn travel_path_data(&self) -> String {
        let mut d = String::with_capacity(self.travel.len() * 32);
        for s in &self.travel {
            let _ = write!(
                d,
                "M {:.3} {:.3} L {:.3} {:.3} ",
                s.from.0, s.from.1, s.to.0, s.to.1
            );
        }
        d.trim_end().to_string()
    }

    /// Standalone SVG document of `width` x `height` pixels seen through `view`
    pub fn to_svg(&self, width: f64, height: f64, view: &ViewTransform) -> String {
        let stroke_width = 1.0 / view.zoom.max(f64::MIN_POSITIVE);
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        ));
        svg.push_str(&format!(
            "  <g transform=\"matrix({:.6} 0 0 {:.6} {:.3} {:.3})\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\">\n",
            view.zoom, view.zoom, view.pan_x, view.pan_y
        ));
        if !self.travel.is_empty() {
            svg.push_str(&format!(
                "    <path class=\"travel\" d=\"{}\" stroke=\"#9ca3af\" stroke-dasharray=\"{:.3}\" stroke-width=\"{:.6}\"/>\n",
                self.travel_path_data(),
                4.0 * stroke_width,
                stroke_width
            ));
        }
        if !self.draw_paths.is_empty() {
            svg.push_str(&format!(
                "    <path class=\"draw\" d=\"{}\" stroke=\"#111827\" stroke-width=\"{:.6}\"/>\n",
                self.draw_path_data(),
                2.0 * stroke_width
            ));
        }
        svg.push_str("  </g>\n</svg>\n");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkplot_core::Point;

    #[test]
    fn test_from_strokes() {
        let strokes = vec![
            Stroke::new(vec![Point::new(0.0, 0.0, 1.0), Point::new(2.0, 3.0, 1.0)]),
            Stroke::default(),
        ];
        let scene = PreviewScene::from_strokes(&strokes);
        assert_eq!(scene.draw_paths().len(), 1);
        assert!(scene.travel_segments().is_empty());
        assert_eq!(scene.draw_path_data(), "M 0.000 0.000 L 2.000 3.000");
        assert_eq!(scene.bounds().max_y, 3.0);
    }

    #[test]
    fn test_from_program_text_chains_draws() {
        let scene = PreviewScene::from_program_text(
            "G0 X0 Y0\nG1 Z-1\nG1 X1 Y0\nG1 X1 Y1\nG0 Z1\nG0 X5 Y5\nG1 X6 Y5\n",
        );
        assert_eq!(scene.draw_paths().len(), 2);
        assert_eq!(scene.draw_paths()[0], vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(scene.travel_segments().len(), 1);
        assert_eq!(scene.travel_path_data(), "M 1.000 1.000 L 5.000 5.000");
    }

    #[test]
    fn test_single_point_path_is_visible() {
        let scene = PreviewScene::from_strokes(&[Stroke::new(vec![Point::new(4.0, 4.0, 1.0)])]);
        assert_eq!(scene.draw_path_data(), "M 4.000 4.000 L 4.000 4.000");
    }

    #[test]
    fn test_to_svg_layers() {
        let scene = PreviewScene::from_program_text("G0 X0 Y0\nG1 X1 Y1\nG0 X3 Y3\n");
        let svg = scene.to_svg(400.0, 300.0, &ViewTransform::new(2.0, 10.0, 20.0));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("matrix(2.000000 0 0 2.000000 10.000 20.000)"));
        assert!(svg.contains("class=\"travel\""));
        assert!(svg.contains("class=\"draw\" d=\"M 0.000 0.000 L 1.000 1.000\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_scene() {
        let scene = PreviewScene::from_program_text("G21\nG90\n");
        assert!(scene.is_empty());
        assert!(!scene.bounds().is_valid());
        assert!(!scene.to_svg(10.0, 10.0, &ViewTransform::default()).contains("<path"));
    }

    #[test]
    fn test_preview_mode_parse() {
        assert_eq!("Program".parse(), Ok(PreviewMode::Program));
        assert_eq!("strokes".parse(), Ok(PreviewMode::Processed));
        assert!("3d".parse::<PreviewMode>().is_err());
    }
}
