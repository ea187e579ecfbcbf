//! InkPlot Settings Crate
//!
//! Handles application configuration: file formats, validation, and
//! conversion to pipeline parameters.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, SubmissionSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use error::{ConfigError, SettingsError, SettingsResult};
