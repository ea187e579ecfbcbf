//! Configuration for InkPlot
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files; the default location is `<config dir>/inkplot/config.toml`.
//!
//! Configuration is organized into sections:
//! - Stroke processing (interpolation, smoothing)
//! - Machine space (transform, depth, machine, program)
//! - Document layout (margins, spacing, jitter)
//! - Submission endpoint and output preferences

use crate::error::{ConfigError, SettingsError, SettingsResult};
use inkplot_core::InputMode;
use inkplot_pipeline::{
    CoordinateTransform, DepthMapper, GaussianParams, InterpolationParams, LayoutParams,
    MachineParams, PipelineParams, ProgramTemplate, SmoothingParams,
};
use inkplot_visualizer::PreviewMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the per-user configuration directory
pub const CONFIG_DIR_NAME: &str = "inkplot";

/// File name of the default configuration
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// HTTP submission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSettings {
    /// Endpoint receiving the program as a `text/plain` POST body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 10_000,
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory where programs are saved
    pub directory: PathBuf,
    /// How captured JSON is interpreted when not stated explicitly
    #[serde(default)]
    pub input_mode: InputMode,
    /// What SVG previews show
    #[serde(default)]
    pub preview_mode: PreviewMode,
    /// Preview canvas width in pixels
    pub preview_width: f64,
    /// Preview canvas height in pixels
    pub preview_height: f64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            input_mode: InputMode::Single,
            preview_mode: PreviewMode::Processed,
            preview_width: 800.0,
            preview_height: 600.0,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub interpolation: InterpolationParams,
    #[serde(default)]
    pub smoothing: SmoothingParams,
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
    #[serde(default)]
    pub submission: SubmissionSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(format!(
            "{} (config file must be .json or .toml)",
            other.unwrap_or("no extension")
        ))),
    }
}

fn check_finite(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be a finite number, got {}", value)))
    }
}

fn check_positive(key: &str, value: f64) -> Result<(), ConfigError> {
    check_finite(key, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be > 0, got {}", value)))
    }
}

fn check_distribution(key: &str, params: &GaussianParams) -> Result<(), ConfigError> {
    check_finite(&format!("{}.mean", key), params.mean)?;
    check_finite(&format!("{}.variance", key), params.variance)?;
    if params.variance < 0.0 {
        return Err(ConfigError::invalid(
            format!("{}.variance", key),
            format!("must be >= 0, got {}", params.variance),
        ));
    }
    Ok(())
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("Could not determine config directory".to_string())
        })?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.exists() => Self::load_from_file(&default),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = format_of(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    ///
    /// Rejects values that cannot produce a program. A zero weight span is
    /// accepted with a warning, since depth mapping then falls back to `z_min`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("interpolation.density", self.interpolation.density)?;
        if self.interpolation.density < 0.0 {
            return Err(ConfigError::invalid(
                "interpolation.density",
                "must be >= 0",
            ));
        }

        check_finite("transform.scale", self.transform.scale)?;
        check_finite("transform.x_offset", self.transform.x_offset)?;
        check_finite("transform.y_offset", self.transform.y_offset)?;

        check_finite("depth.z_min", self.depth.z_min)?;
        check_finite("depth.z_max", self.depth.z_max)?;
        check_finite("depth.w_min", self.depth.w_min)?;
        check_finite("depth.w_max", self.depth.w_max)?;
        if self.depth.is_degenerate() {
            warn!(
                "depth.w_min == depth.w_max ({}), every point will use depth.z_min",
                self.depth.w_min
            );
        }

        check_finite("machine.pen_down_z", self.machine.pen_down_z)?;
        check_finite("machine.pen_up_z", self.machine.pen_up_z)?;
        check_positive("machine.travel_feed", self.machine.travel_feed)?;
        check_positive("machine.plunge_feed", self.machine.plunge_feed)?;
        check_positive("machine.draw_feed", self.machine.draw_feed)?;

        check_finite("layout.x_min", self.layout.x_min)?;
        check_finite("layout.x_max", self.layout.x_max)?;
        check_finite("layout.y_start", self.layout.y_start)?;
        check_finite("layout.line_spacing", self.layout.line_spacing)?;
        check_finite("layout.column_spacing", self.layout.column_spacing)?;
        if self.layout.x_max <= self.layout.x_min {
            return Err(ConfigError::invalid(
                "layout.x_max",
                format!(
                    "must be greater than layout.x_min ({} <= {})",
                    self.layout.x_max, self.layout.x_min
                ),
            ));
        }
        check_distribution("layout.jitter.offset_x", &self.layout.jitter.offset_x)?;
        check_distribution("layout.jitter.offset_y", &self.layout.jitter.offset_y)?;
        check_distribution("layout.jitter.rotation_deg", &self.layout.jitter.rotation_deg)?;
        // TOML integers are signed 64-bit
        if let Some(seed) = self.layout.seed.filter(|&s| s > i64::MAX as u64) {
            return Err(ConfigError::invalid(
                "layout.seed",
                format!("must be <= {}, got {}", i64::MAX, seed),
            ));
        }

        if self.submission.timeout_ms == 0 {
            return Err(ConfigError::invalid("submission.timeout_ms", "must be > 0"));
        }

        check_positive("output.preview_width", self.output.preview_width)?;
        check_positive("output.preview_height", self.output.preview_height)?;

        Ok(())
    }

    /// Parameters for the stroke pipeline
    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams {
            smoothing: self.smoothing,
            interpolation: self.interpolation,
            transform: self.transform,
            depth: self.depth,
            machine: self.machine,
            program: self.program.clone(),
            layout: self.layout.clone(),
        }
    }

    /// Take over the pipeline sections of `params`
    pub fn set_pipeline_params(&mut self, params: PipelineParams) {
        self.smoothing = params.smoothing;
        self.interpolation = params.interpolation;
        self.transform = params.transform;
        self.depth = params.depth;
        self.machine = params.machine;
        self.program = params.program;
        self.layout = params.layout;
    }
}
