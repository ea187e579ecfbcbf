//! # InkPlot Pipeline
//!
//! Stroke processing and G-code generation for InkPlot.
//! Smoothing, interpolation, multi-character layout, depth mapping,
//! coordinate transform and program emission, plus the session that
//! re-runs them whenever input or parameters change.

pub mod depth;
pub mod emitter;
pub mod gaussian;
pub mod interpolation;
pub mod layout;
pub mod pipeline;
pub mod session;
pub mod smoothing;
pub mod transform;

pub use depth::DepthMapper;
pub use emitter::{
    format_number, normalize_block, CodeEmitter, CommandProgram, MachineParams, MoveKind,
    ProgramMove, ProgramTemplate,
};
pub use gaussian::{GaussianParams, GaussianSampler};
pub use interpolation::{interpolate, InterpolationMethod, InterpolationParams};
pub use layout::{layout, layout_with, JitterParams, LayoutBox, LayoutParams};
pub use pipeline::{
    process_document, process_document_with_sampler, PipelineOutput, PipelineParams,
};
pub use session::{program_file_name, Session};
pub use smoothing::{smooth, SmoothingParams, SmoothingStage};
pub use transform::CoordinateTransform;
