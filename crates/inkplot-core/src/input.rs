//! Captured input validation
//!
//! Converts JSON text (or an already-parsed [`serde_json::Value`]) into the
//! stroke data model. Every shape problem is reported as an [`InputError`]
//! naming the offending stroke and point, so a rejected upload never reaches
//! the pipeline.
//!
//! Accepted shapes:
//! - single-character mode: `[[[x, y, w], ...], ...]`
//! - document mode: `[[[[x, y, w], ...], ...], ...]`
//! - relay payloads: `{ "texts": Document }`, `{ "strokes": [Stroke] }` or a
//!   bare document/stroke array

use crate::data::{Character, Document, InputMode, Point, Stroke};
use crate::error::{InputError, RelayError};
use serde_json::Value;
use tracing::{debug, trace};

/// Parse single-character mode JSON text
pub fn parse_strokes(text: &str) -> Result<Vec<Stroke>, InputError> {
    let value = parse_json(text)?;
    strokes_from_value(&value)
}

/// Parse document mode JSON text
pub fn parse_characters(text: &str) -> Result<Vec<Character>, InputError> {
    let value = parse_json(text)?;
    characters_from_value(&value)
}

/// Parse JSON text for the given capture mode
pub fn parse_document(text: &str, mode: InputMode) -> Result<Document, InputError> {
    let document = match mode {
        InputMode::Single => Document::Strokes(parse_strokes(text)?),
        InputMode::Document => Document::Characters(parse_characters(text)?),
    };
    debug!(
        "Parsed {} input: {} strokes, {} points",
        mode,
        document.stroke_count(),
        document.point_count()
    );
    Ok(document)
}

fn parse_json(text: &str) -> Result<Value, InputError> {
    serde_json::from_str(text).map_err(|e| InputError::MalformedJson {
        line: e.line(),
        column: e.column(),
        reason: e.to_string(),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn point_from_value(value: &Value, stroke: usize, point: usize) -> Result<Point, InputError> {
    let invalid = |reason: String| InputError::InvalidPoint {
        stroke,
        point,
        reason,
    };

    let items = value
        .as_array()
        .ok_or_else(|| invalid(format!("expected [x, y, w], found {}", json_type(value))))?;

    if items.len() != 3 {
        return Err(invalid(format!(
            "expected 3 numbers, found {}",
            items.len()
        )));
    }

    let mut coords = [0.0f64; 3];
    for (slot, (item, axis)) in coords.iter_mut().zip(items.iter().zip(["x", "y", "w"])) {
        *slot = item
            .as_f64()
            .ok_or_else(|| invalid(format!("{} is {}, not a number", axis, json_type(item))))?;
    }

    Ok(Point::from(coords))
}

fn stroke_from_value(value: &Value, stroke: usize) -> Result<Stroke, InputError> {
    let items = value.as_array().ok_or_else(|| InputError::InvalidStroke {
        stroke,
        found: json_type(value).to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(point, item)| point_from_value(item, stroke, point))
        .collect()
}

/// Validate a stroke list from a parsed JSON value
pub fn strokes_from_value(value: &Value) -> Result<Vec<Stroke>, InputError> {
    let items = value.as_array().ok_or_else(|| InputError::WrongTopLevel {
        expected: "array of strokes".to_string(),
        found: json_type(value).to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| stroke_from_value(item, index))
        .collect()
}

/// Validate a character list from a parsed JSON value
pub fn characters_from_value(value: &Value) -> Result<Vec<Character>, InputError> {
    let items = value.as_array().ok_or_else(|| InputError::WrongTopLevel {
        expected: "array of characters".to_string(),
        found: json_type(value).to_string(),
    })?;

    let mut characters = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let strokes = item.as_array().ok_or_else(|| InputError::InvalidCharacter {
            character: index,
            found: json_type(item).to_string(),
        })?;
        let strokes = strokes
            .iter()
            .enumerate()
            .map(|(stroke, s)| stroke_from_value(s, stroke))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| InputError::InCharacter {
                character: index,
                source: Box::new(e),
            })?;
        characters.push(Character::new(strokes));
    }
    Ok(characters)
}

/// Maximum array nesting depth of a JSON value (scalars are depth 0)
fn array_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(array_depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Validate a bare array whose mode is decided by its nesting depth
pub fn document_from_value(value: &Value) -> Result<Document, InputError> {
    // strokes nest three arrays deep, characters four
    if array_depth(value) >= 4 {
        Ok(Document::Characters(characters_from_value(value)?))
    } else {
        Ok(Document::Strokes(strokes_from_value(value)?))
    }
}

/// A payload received from the broadcast relay
#[derive(Debug, Clone, PartialEq)]
pub enum RelayPayload {
    /// `{ "texts": Document }`
    Texts(Document),
    /// `{ "strokes": [Stroke] }`
    Strokes(Vec<Stroke>),
    /// A bare document or stroke array
    Bare(Document),
}

impl RelayPayload {
    /// Decode any of the accepted relay shapes
    pub fn decode(value: &Value) -> Result<Self, RelayError> {
        match value {
            Value::Object(map) => {
                if let Some(texts) = map.get("texts") {
                    trace!("Relay payload carries 'texts'");
                    let characters = characters_from_value(texts)?;
                    Ok(RelayPayload::Texts(Document::Characters(characters)))
                } else if let Some(strokes) = map.get("strokes") {
                    trace!("Relay payload carries 'strokes'");
                    Ok(RelayPayload::Strokes(strokes_from_value(strokes)?))
                } else {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    Err(RelayError::UnrecognizedPayload {
                        reason: format!("object without 'texts' or 'strokes' (keys: {:?})", keys),
                    })
                }
            }
            Value::Array(_) => Ok(RelayPayload::Bare(document_from_value(value)?)),
            other => Err(RelayError::UnrecognizedPayload {
                reason: format!("{} payload", json_type(other)),
            }),
        }
    }

    /// Decode relay payload text
    pub fn decode_str(text: &str) -> Result<Self, RelayError> {
        let value = parse_json(text)?;
        Self::decode(&value)
    }

    pub fn into_document(self) -> Document {
        match self {
            RelayPayload::Texts(doc) | RelayPayload::Bare(doc) => doc,
            RelayPayload::Strokes(strokes) => Document::Strokes(strokes),
        }
    }
}
