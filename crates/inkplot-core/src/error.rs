//! Error handling for InkPlot
//!
//! Provides error types for every layer of the application:
//! - Input errors (captured JSON rejected before the pipeline runs)
//! - Relay errors (broadcast payloads that cannot be decoded)
//! - Submission errors (delivering a program to an HTTP endpoint)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Input validation error
///
/// Raised when captured stroke JSON does not have the expected shape.
/// The pipeline never sees input that produced one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// The text is not valid JSON
    #[error("Malformed JSON at line {line}, column {column}: {reason}")]
    MalformedJson {
        /// Line of the syntax error (1-based)
        line: usize,
        /// Column of the syntax error (1-based)
        column: usize,
        /// Parser message
        reason: String,
    },

    /// The top-level value has the wrong shape
    #[error("Expected {expected} at top level, found {found}")]
    WrongTopLevel {
        /// Description of the accepted shape
        expected: String,
        /// JSON type that was found instead
        found: String,
    },

    /// A stroke is not an array of points
    #[error("Stroke {stroke} is not an array of points (found {found})")]
    InvalidStroke {
        /// Index of the offending stroke
        stroke: usize,
        /// JSON type that was found instead
        found: String,
    },

    /// A character is not an array of strokes
    #[error("Character {character} is not an array of strokes (found {found})")]
    InvalidCharacter {
        /// Index of the offending character
        character: usize,
        /// JSON type that was found instead
        found: String,
    },

    /// A point is not a numeric `[x, y, w]` triple
    #[error("Invalid point {point} in stroke {stroke}: {reason}")]
    InvalidPoint {
        /// Index of the stroke within its parent
        stroke: usize,
        /// Index of the point within the stroke
        point: usize,
        /// What is wrong with it
        reason: String,
    },

    /// A stroke or point inside a document character is invalid
    #[error("Character {character}: {source}")]
    InCharacter {
        /// Index of the character holding the bad stroke
        character: usize,
        /// The stroke or point error, indexed within the character
        source: Box<InputError>,
    },
}

/// Relay payload error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    /// Payload is neither `{texts}`, `{strokes}` nor a bare array
    #[error("Unrecognized relay payload: {reason}")]
    UnrecognizedPayload {
        /// What was received
        reason: String,
    },

    /// The payload has a recognized envelope but invalid stroke data
    #[error("Invalid relay payload: {0}")]
    InvalidContent(#[from] InputError),

    /// The receiving side fell behind and messages were discarded
    #[error("Relay receiver lagged, {0} payloads dropped")]
    Lagged(u64),

    /// The relay channel was closed
    #[error("Relay channel closed")]
    Closed,
}

/// Program submission error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    /// No endpoint was configured
    #[error("Submission endpoint not configured")]
    NotConfigured,

    /// The endpoint could not be parsed
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl {
        /// The configured URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The endpoint uses a scheme the client cannot speak
    #[error("Unsupported URL scheme: {scheme}")]
    UnsupportedScheme {
        /// The rejected scheme
        scheme: String,
    },

    /// Network failure (resolve, connect, read or write)
    #[error("Network error: {reason}")]
    Network {
        /// The underlying failure
        reason: String,
    },

    /// The endpoint did not answer in time
    #[error("Submission timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The endpoint answered with a non-success status
    #[error("Endpoint rejected program: HTTP {status} {reason}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Reason phrase from the status line
        reason: String,
    },

    /// The response could not be understood
    #[error("Malformed HTTP response: {reason}")]
    MalformedResponse {
        /// What was wrong with it
        reason: String,
    },
}

/// Main error type for InkPlot
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Relay error
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Submission error
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an input validation error
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Input(_) | Error::Relay(RelayError::InvalidContent(_)))
    }

    /// Check if this is a submission error
    pub fn is_submission_error(&self) -> bool {
        matches!(self, Error::Submission(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Submission(SubmissionError::Timeout { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
