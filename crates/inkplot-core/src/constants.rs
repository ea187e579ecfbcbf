//! Shared numeric constants.

/// Decimal places used for every numeric word in an emitted program.
pub const PROGRAM_DECIMALS: usize = 3;

/// Spans smaller than this are treated as zero by calibration maps.
pub const SPAN_EPSILON: f64 = 1e-12;

/// Minimum samples per segment for linear interpolation.
pub const LINEAR_MIN_STEPS: usize = 2;

/// Minimum samples per segment for Catmull-Rom interpolation.
pub const CATMULL_MIN_STEPS: usize = 8;

/// Upper bound on samples per interpolated segment.
pub const MAX_SEGMENT_STEPS: usize = 10_000;

/// Wheel zoom factor applied when zooming in.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Wheel zoom factor applied when zooming out.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Padding fraction used when fitting content into a view.
pub const VIEW_PADDING: f64 = 0.05;
