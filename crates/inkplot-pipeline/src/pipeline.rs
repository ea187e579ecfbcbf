//! The stroke-to-program pipeline
//!
//! `process_document` is a pure function of its input and parameters: it
//! never mutates the input and always produces fresh output. With a fixed
//! layout seed, identical calls produce identical programs.

use crate::depth::DepthMapper;
use crate::emitter::{CodeEmitter, CommandProgram, MachineParams, ProgramTemplate};
use crate::gaussian::GaussianSampler;
use crate::interpolation::InterpolationParams;
use crate::layout::{layout_with, LayoutParams};
use crate::smoothing::{SmoothingParams, SmoothingStage};
use crate::transform::CoordinateTransform;
use inkplot_core::{Document, Stroke};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every knob of the pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineParams {
    #[serde(default)]
    pub smoothing: SmoothingParams,
    #[serde(default)]
    pub interpolation: InterpolationParams,
    #[serde(default)]
    pub transform: CoordinateTransform,
    #[serde(default)]
    pub depth: DepthMapper,
    #[serde(default)]
    pub machine: MachineParams,
    #[serde(default)]
    pub program: ProgramTemplate,
    #[serde(default)]
    pub layout: LayoutParams,
}

impl PipelineParams {
    /// Sampler for layout jitter: seeded when a seed is configured
    pub fn sampler(&self) -> GaussianSampler {
        match self.layout.seed {
            Some(seed) => GaussianSampler::from_seed(seed),
            None => GaussianSampler::from_entropy(),
        }
    }

    /// Smooth and resample one stroke according to these parameters
    pub fn process_stroke(&self, stroke: &Stroke) -> Stroke {
        let smoothed = self
            .smoothing
            .apply_at(SmoothingStage::BeforeInterpolation, stroke);
        let resampled = self.interpolation.apply(&smoothed);
        self.smoothing
            .apply_at(SmoothingStage::AfterInterpolation, &resampled)
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineOutput {
    /// Processed strokes before the final coordinate transform.
    ///
    /// In document mode these are already laid out and scaled.
    pub strokes: Vec<Stroke>,
    pub program: CommandProgram,
}

impl PipelineOutput {
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
}

/// Run the full pipeline, seeding layout jitter from `params.layout.seed`
pub fn process_document(input: &Document, params: &PipelineParams) -> PipelineOutput {
    let mut sampler = params.sampler();
    process_document_with_sampler(input, params, &mut sampler)
}

/// Run the full pipeline drawing layout jitter from `sampler`
pub fn process_document_with_sampler(
    input: &Document,
    params: &PipelineParams,
    sampler: &mut GaussianSampler,
) -> PipelineOutput {
    let document = input.without_empty_strokes();

    let (strokes, transform) = match &document {
        Document::Strokes(strokes) => (
            strokes
                .iter()
                .map(|s| params.process_stroke(s))
                .collect::<Vec<_>>(),
            params.transform,
        ),
        Document::Characters(characters) => (
            layout_with(
                characters,
                params.transform.scale,
                &params.layout,
                sampler,
                |s| params.process_stroke(s),
            ),
            // layout already applied the scale
            params.transform.offset_only(),
        ),
    };

    let emitter = CodeEmitter::new(
        transform,
        params.depth,
        params.machine,
        params.program.clone(),
    );
    let program = emitter.emit(&strokes);

    debug!(
        "Processed {} document: {} -> {} strokes, {} -> {} points, {} program lines",
        document.mode(),
        input.stroke_count(),
        strokes.len(),
        input.point_count(),
        strokes.iter().map(Stroke::len).sum::<usize>(),
        program.line_count()
    );

    PipelineOutput { strokes, program }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::MoveKind;
    use crate::interpolation::InterpolationMethod;
    use inkplot_core::{Character, Point};

    fn raw_params() -> PipelineParams {
        PipelineParams {
            interpolation: InterpolationParams {
                method: InterpolationMethod::None,
                density: 1.0,
            },
            ..PipelineParams::default()
        }
    }

    #[test]
    fn test_single_mode_counts() {
        let doc = Document::Strokes(vec![
            Stroke::new(vec![Point::new(0.0, 0.0, 1.0); 4]),
            Stroke::default(),
            Stroke::new(vec![Point::new(1.0, 1.0, 1.0)]),
        ]);
        let out = process_document(&doc, &raw_params());
        assert_eq!(out.strokes.len(), 2);
        assert_eq!(out.program.count(MoveKind::Travel), 2);
        assert_eq!(out.program.count(MoveKind::Draw), 3);
        assert!(out.program.text().starts_with("G21\nG90\n"));
        assert!(out.program.text().ends_with("G0 Z0\nG0 X0 Y0\n"));
    }

    #[test]
    fn test_input_not_mutated() {
        let doc = Document::Strokes(vec![Stroke::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(10.0, 0.0, 1.0),
        ])]);
        let before = doc.clone();
        let _ = process_document(&doc, &PipelineParams::default());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_document_mode_does_not_double_scale() {
        let mut params = raw_params();
        params.transform = CoordinateTransform::new(2.0, 100.0, 0.0);
        params.layout.x_min = 0.0;
        let doc = Document::Characters(vec![Character::new(vec![Stroke::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(5.0, 0.0, 1.0),
        ])])]);
        let out = process_document(&doc, &params);
        let last = out.program.moves()[2];
        assert_eq!(last.kind, MoveKind::Draw);
        assert_eq!(last.x, 110.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut params = PipelineParams::default();
        params.layout.seed = Some(99);
        params.layout.jitter.offset_x.variance = 4.0;
        params.layout.jitter.rotation_deg.variance = 9.0;
        let doc = Document::Characters(vec![
            Character::new(vec![Stroke::new(vec![
                Point::new(0.0, 0.0, 1.0),
                Point::new(3.0, 8.0, 2.0),
            ])]);
            3
        ]);
        let a = process_document(&doc, &params);
        let b = process_document(&doc, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_document() {
        let out = process_document(&Document::default(), &PipelineParams::default());
        assert!(out.strokes.is_empty());
        assert!(out.program.has_no_moves());
        assert_eq!(out.point_count(), 0);
    }
}
