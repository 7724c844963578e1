//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in commands and main.rs.

use thiserror::Error;

/// Errors raised when walking a field path through a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// `resolved` holds the keys that were found before `missing` failed
    #[error("Field '{missing}' not found under '{}'", .resolved.join(", "))]
    Missing {
        resolved: Vec<String>,
        missing: String,
    },

    #[error("Field '{path}' is not {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("Empty field path")]
    EmptyPath,
}

/// Errors that can occur while loading or reading a profile
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Unable to find metric {metric} in JSON profile {file}")]
    MetricNotFound { metric: String, file: String },

    #[error("No data: {0}")]
    EmptyData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors that can occur while truncating a sampling profile
#[derive(Error, Debug)]
pub enum TruncateError {
    #[error("Invalid index range [{start}, {end}]")]
    InvalidRange { start: i64, end: i64, count: usize },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Invalid start time '{value}': {source}")]
    BadTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to plot: {0}")]
    EmptyData(String),

    #[error("Failed to render chart: {0}")]
    RenderFailed(String),

    #[error("Chart style parse error: {0}")]
    StyleParseFailed(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
