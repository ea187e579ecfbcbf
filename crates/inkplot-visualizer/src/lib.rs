//! # InkPlot Visualizer
//!
//! Preview support for InkPlot: program re-parsing, preview scenes with
//! bounds and SVG export, view fitting, and the pan state machine.

pub mod pan;
pub mod program_parser;
pub mod scene;
pub mod viewport;

pub use inkplot_core::ViewTransform;
pub use pan::{PanController, PanState};
pub use program_parser::{
    parse_moves, parse_program, segments_from_moves, ParsedMove, PreviewSegment, SegmentKind,
};
pub use scene::{PreviewMode, PreviewScene};
pub use viewport::{fit_view, Bounds};
