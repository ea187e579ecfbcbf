//! Configuration file round trips

use inkplot_pipeline::{InterpolationMethod, SmoothingStage};
use inkplot_settings::{Config, ConfigError, SettingsError};
use inkplot_visualizer::PreviewMode;
use std::fs;
use tempfile::TempDir;

fn customized() -> Config {
    let mut config = Config::default();
    config.interpolation.method = InterpolationMethod::Linear;
    config.interpolation.density = 0.5;
    config.smoothing.enabled = true;
    config.smoothing.stage = SmoothingStage::AfterInterpolation;
    config.transform.scale = 0.25;
    config.layout.seed = Some(42);
    config.layout.jitter.rotation_deg.variance = 3.0;
    config.submission.endpoint = Some("http://plotter.local:8080/api/gcode".to_string());
    config.output.preview_mode = PreviewMode::Program;
    config
}

#[test]
fn toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = customized();

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = customized();

    config.save_to_file(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"method\": \"linear\""));
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[machine]\npen_down_z = -10.0\npen_up_z = -5.0\ntravel_feed = 2000.0\nplunge_feed = 300.0\ndraw_feed = 900.0\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.machine.draw_feed, 900.0);
    assert_eq!(config.interpolation, Config::default().interpolation);
    assert_eq!(config.submission.endpoint, None);
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[submission]\ntimeout_ms = 0\n").unwrap();

    match Config::load_from_file(&path) {
        Err(SettingsError::Config(ConfigError::InvalidSetting { key, .. })) => {
            assert_eq!(key, "submission.timeout_ms")
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn malformed_toml_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[machine\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn explicit_path_wins_over_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    customized().save_to_file(&path).unwrap();
    let loaded = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(loaded.layout.seed, Some(42));
}

#[test]
fn largest_seed_survives_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::default();
    config.layout.seed = Some(i64::MAX as u64);
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap().layout.seed, config.layout.seed);

    config.layout.seed = Some(u64::MAX);
    assert!(matches!(
        config.save_to_file(&path),
        Err(SettingsError::Config(ConfigError::InvalidSetting { .. }))
    ));
}
