//! Property tests for the stroke pipeline stages

use inkplot_core::{Character, Point, Stroke};
use inkplot_pipeline::{
    interpolate, layout, smooth, CodeEmitter, DepthMapper, GaussianSampler, InterpolationMethod,
    JitterParams, LayoutParams, MoveKind,
};
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point> {
    (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..10.0).prop_map(|(x, y, w)| Point::new(x, y, w))
}

fn arb_stroke(min: usize, max: usize) -> impl Strategy<Value = Stroke> {
    prop::collection::vec(arb_point(), min..max).prop_map(Stroke::new)
}

fn arb_method() -> impl Strategy<Value = InterpolationMethod> {
    prop_oneof![
        Just(InterpolationMethod::None),
        Just(InterpolationMethod::Linear),
        Just(InterpolationMethod::Catmull),
    ]
}

proptest! {
    #[test]
    fn interpolation_keeps_stroke_endpoints(
        stroke in arb_stroke(1, 20),
        density in 0.0f64..3.0,
        method in arb_method(),
    ) {
        let out = interpolate(&stroke, density, method);
        let (first, last) = (stroke.first().unwrap(), stroke.last().unwrap());
        let (out_first, out_last) = (out.first().unwrap(), out.last().unwrap());
        prop_assert_eq!((out_first.x, out_first.y), (first.x, first.y));
        prop_assert_eq!((out_last.x, out_last.y), (last.x, last.y));
    }

    #[test]
    fn interpolation_none_is_identity(stroke in arb_stroke(0, 20), density in 0.0f64..5.0) {
        prop_assert_eq!(interpolate(&stroke, density, InterpolationMethod::None), stroke);
    }

    #[test]
    fn linear_output_length_is_sum_of_steps(stroke in arb_stroke(2, 12), density in 0.0f64..2.0) {
        let expected: usize = stroke
            .points()
            .windows(2)
            .map(|p| ((p[0].distance_to(&p[1]) * density).floor() as usize).max(2))
            .sum();
        prop_assert_eq!(interpolate(&stroke, density, InterpolationMethod::Linear).len(), expected);
    }

    #[test]
    fn smoothing_preserves_length(stroke in arb_stroke(0, 40), window in 0usize..12) {
        prop_assert_eq!(smooth(&stroke, window).len(), stroke.len());
    }

    #[test]
    fn depth_is_monotonic(
        z_min in -5.0f64..0.0,
        z_span in 0.01f64..5.0,
        w_span in 0.01f64..10.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let mapper = DepthMapper::new(z_min, z_min + z_span, 0.0, w_span);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(mapper.depth(lo * w_span) <= mapper.depth(hi * w_span));
        let d = mapper.depth(a * w_span);
        prop_assert!(d >= z_min - 1e-9 && d <= z_min + z_span + 1e-9);
    }

    #[test]
    fn emission_counts_per_stroke(strokes in prop::collection::vec(arb_stroke(1, 10), 0..6)) {
        let program = CodeEmitter::default().emit(&strokes);
        let draws: usize = strokes.iter().map(|s| s.len() - 1).sum();
        prop_assert_eq!(program.count(MoveKind::Travel), strokes.len());
        prop_assert_eq!(program.count(MoveKind::Plunge), strokes.len());
        prop_assert_eq!(program.count(MoveKind::Draw), draws);
        prop_assert_eq!(program.count(MoveKind::Retract), strokes.len());
        prop_assert!(program.text().starts_with("G21\nG90\n"));
        prop_assert!(program.text().ends_with("G0 Z0\nG0 X0 Y0\n"));
    }

    #[test]
    fn layout_respects_left_margin(
        widths in prop::collection::vec(1.0f64..80.0, 1..8),
        seed in any::<u64>(),
    ) {
        let characters: Vec<Character> = widths
            .iter()
            .map(|&w| Character::new(vec![Stroke::new(vec![
                Point::new(0.0, 0.0, 1.0),
                Point::new(w, 10.0, 1.0),
            ])]))
            .collect();
        let mut params = LayoutParams {
            x_min: 10.0,
            x_max: 120.0,
            jitter: JitterParams::default(),
            ..LayoutParams::default()
        };
        params.jitter.offset_x.variance = 25.0;
        params.jitter.rotation_deg.variance = 100.0;

        let mut sampler = GaussianSampler::from_seed(seed);
        let out = layout(&characters, 1.0, &params, &mut sampler);
        prop_assert_eq!(out.len(), characters.len());
        for p in out.iter().flat_map(|s| s.iter()) {
            prop_assert!(p.x >= params.x_min - 1e-9);
        }
    }
}

#[test]
fn wrap_decision_matches_widths() {
    let block = |w: f64| {
        Character::new(vec![Stroke::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(w, 5.0, 1.0),
        ])])
    };
    let params = LayoutParams {
        x_min: 0.0,
        x_max: 100.0,
        column_spacing: 0.0,
        line_spacing: 25.0,
        ..LayoutParams::default()
    };

    let mut sampler = GaussianSampler::from_seed(1);
    let wrapped = layout(&[block(60.0), block(60.0)], 1.0, &params, &mut sampler);
    assert_eq!(wrapped[1].first().map(|p| p.y), Some(25.0));

    let unwrapped = layout(&[block(40.0), block(40.0)], 1.0, &params, &mut sampler);
    assert_eq!(unwrapped[1].first().map(|p| p.y), Some(0.0));
}

#[test]
fn gaussian_sampler_moments() {
    let mut sampler = GaussianSampler::from_seed(2024);
    let draws: Vec<f64> = (0..10_000).map(|_| sampler.sample(0.0, 1.0)).collect();
    let mean = draws.iter().sum::<f64>() / draws.len() as f64;
    let variance = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / draws.len() as f64;
    assert!(mean.abs() < 0.05, "mean was {mean}");
    assert!((variance - 1.0).abs() < 0.05, "variance was {variance}");
}
