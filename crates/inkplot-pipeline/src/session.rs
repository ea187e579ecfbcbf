//! Pipeline host
//!
//! A [`Session`] owns the parameter set, the last accepted input, the last
//! pipeline output and the preview view. Any change to input or parameters
//! re-runs the whole pipeline synchronously. Rejected input leaves every
//! piece of state as it was.

use crate::pipeline::{process_document, PipelineOutput, PipelineParams};
use inkplot_core::{
    parse_document, Document, Error, InputError, InputMode, RelayError, RelayPayload, Result,
    ViewTransform,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Current state of one conversion session
#[derive(Debug, Clone, Default)]
pub struct Session {
    params: PipelineParams,
    input: Option<Document>,
    output: Option<PipelineOutput>,
    view: ViewTransform,
}

impl Session {
    pub fn new(params: PipelineParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Replace the parameter set and recompute
    pub fn set_params(&mut self, params: PipelineParams) {
        self.params = params;
        self.recompute();
    }

    pub fn input(&self) -> Option<&Document> {
        self.input.as_ref()
    }

    /// Validate JSON text and make it the current input
    pub fn load_json(&mut self, text: &str, mode: InputMode) -> std::result::Result<(), InputError> {
        let document = parse_document(text, mode)?;
        self.load_input(document);
        Ok(())
    }

    /// Make an already validated document the current input
    pub fn load_input(&mut self, input: Document) {
        self.input = Some(input);
        self.recompute();
    }

    /// Decode a relay payload and make it the current input
    pub fn load_relay_payload(&mut self, value: &Value) -> std::result::Result<(), RelayError> {
        let payload = RelayPayload::decode(value)?;
        self.load_input(payload.into_document());
        Ok(())
    }

    pub fn output(&self) -> Option<&PipelineOutput> {
        self.output.as_ref()
    }

    /// Text of the current program, if any input has been loaded
    pub fn program_text(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.program.text())
    }

    /// True when the current program draws something
    pub fn has_preview(&self) -> bool {
        self.output
            .as_ref()
            .is_some_and(|o| !o.program.has_no_moves())
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
    }

    /// Write the current program to `dir/output_<unix millis>.gcode`
    pub fn save_program(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let text = self
            .program_text()
            .ok_or_else(|| Error::other("No program to save: load input first"))?;
        let path = dir.as_ref().join(program_file_name());
        fs::write(&path, text)?;
        info!("Saved program to {}", path.display());
        Ok(path)
    }

    fn recompute(&mut self) {
        let Some(input) = &self.input else {
            return;
        };
        let output = process_document(input, &self.params);
        debug!(
            "Session recomputed: {} strokes, {} moves",
            output.strokes.len(),
            output.program.moves().len()
        );
        self.output = Some(output);
    }
}

/// File name for a program saved now
pub fn program_file_name() -> String {
    format!("output_{}.gcode", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STROKES: &str = "[[[0, 0, 1], [10, 0, 2]]]";

    #[test]
    fn test_load_json_produces_output() {
        let mut session = Session::new(PipelineParams::default());
        assert!(session.output().is_none());
        assert!(!session.has_preview());
        session.load_json(STROKES, InputMode::Single).unwrap();
        assert!(session.has_preview());
        assert!(session.program_text().unwrap().contains("G01 Z"));
    }

    #[test]
    fn test_invalid_input_keeps_previous_state() {
        let mut session = Session::new(PipelineParams::default());
        session.load_json(STROKES, InputMode::Single).unwrap();
        let before = session.program_text().map(str::to_string);

        assert!(session.load_json("[[[0, 0]]]", InputMode::Single).is_err());
        assert!(session.load_json("not json", InputMode::Single).is_err());
        assert_eq!(session.program_text().map(str::to_string), before);
        assert_eq!(session.input().map(Document::point_count), Some(2));
    }

    #[test]
    fn test_set_params_recomputes() {
        let mut session = Session::new(PipelineParams::default());
        session.load_json(STROKES, InputMode::Single).unwrap();
        let mut params = session.params().clone();
        params.machine.pen_up_z = 5.0;
        session.set_params(params);
        assert!(session.program_text().unwrap().contains("G00 Z5.000"));
    }

    #[test]
    fn test_relay_payload_rejected_keeps_state() {
        let mut session = Session::new(PipelineParams::default());
        let err = session
            .load_relay_payload(&serde_json::json!({ "other": 1 }))
            .unwrap_err();
        assert!(matches!(err, RelayError::UnrecognizedPayload { .. }));
        assert!(session.input().is_none());

        session
            .load_relay_payload(&serde_json::json!({ "texts": [[[[0, 0, 1]]]] }))
            .unwrap();
        assert_eq!(session.input().map(Document::mode), Some(InputMode::Document));
    }

    #[test]
    fn test_view_is_owned_value() {
        let mut session = Session::default();
        let view = ViewTransform::new(2.0, 1.0, 1.0);
        session.set_view(view);
        assert_eq!(session.view(), view);
    }

    #[test]
    fn test_save_program() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(PipelineParams::default());
        assert!(session.save_program(dir.path()).is_err());

        session.load_json(STROKES, InputMode::Single).unwrap();
        let path = session.save_program(dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("output_") && name.ends_with(".gcode"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            session.program_text().unwrap()
        );
    }
}
