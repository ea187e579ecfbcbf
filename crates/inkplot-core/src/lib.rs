//! # InkPlot Core
//!
//! Core types and utilities for InkPlot.
//! Provides the stroke data model shared by every stage of the pipeline,
//! the error types, and validation of captured JSON input.

pub mod constants;
pub mod data;
pub mod error;
pub mod input;
pub mod view;

pub use data::{Character, Document, InputMode, Point, Stroke};

pub use error::{Error, InputError, RelayError, Result, SubmissionError};

pub use input::{parse_characters, parse_document, parse_strokes, RelayPayload};

pub use view::ViewTransform;
