//! # InkPlot
//!
//! Converts captured handwriting strokes into pen-plotter G-code:
//! - Optional moving-average smoothing and linear or Catmull-Rom interpolation
//! - Multi-character page layout with Gaussian handwriting jitter
//! - Pen pressure mapped to Z depth
//! - Program preview, HTTP submission and a stroke relay
//!
//! ## Architecture
//!
//! InkPlot is organized as a workspace with multiple crates:
//!
//! 1. **inkplot-core** - Data model, errors, input validation, relay payloads
//! 2. **inkplot-pipeline** - Stroke processing, layout, code emission, session
//! 3. **inkplot-visualizer** - Program parsing, preview scenes, view state
//! 4. **inkplot-settings** - JSON/TOML configuration
//! 5. **inkplot-communication** - HTTP submission and the relay hub
//! 6. **inkplot** - Main binary that integrates all crates

pub use inkplot_core::{
    parse_characters, parse_document, parse_strokes, Character, Document, Error, InputError,
    InputMode, Point, RelayError, RelayPayload, Result, Stroke, SubmissionError, ViewTransform,
};

pub use inkplot_pipeline::{
    interpolate, layout, process_document, process_document_with_sampler, smooth, CodeEmitter,
    CommandProgram, CoordinateTransform, DepthMapper, GaussianParams, GaussianSampler,
    InterpolationMethod, InterpolationParams, LayoutParams, MachineParams, MoveKind,
    PipelineOutput, PipelineParams, ProgramMove, ProgramTemplate, Session, SmoothingParams,
    SmoothingStage,
};

pub use inkplot_visualizer::{
    fit_view, parse_program, Bounds, PanController, PanState, PreviewMode, PreviewScene,
    PreviewSegment, SegmentKind,
};

pub use inkplot_settings::{Config, ConfigError, SettingsError};

pub use inkplot_communication::{
    HttpSubmitter, ProgramSubmitter, RelayConsumer, RelayHub, SubmissionReceipt,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Logs go to stderr so program text can be piped from stdout. The level
/// comes from RUST_LOG and defaults to `info`.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::default())
}

/// Initialize logging in the given format
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
