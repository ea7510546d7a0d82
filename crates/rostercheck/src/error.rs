//! Error types for the rostercheck library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::SchemaKind;

/// Main error type for rostercheck operations.
///
/// Only structural failures live here. Per-cell and cardinality problems are
/// collected into a [`ValidationReport`](crate::validation::ValidationReport)
/// instead of being returned as errors.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed input at a specific row.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading a spreadsheet workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No records or rows were supplied at all.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A header row is present but there are no data rows to validate.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// One or more required fields are absent from the header row.
    #[error("Missing {kind} headers: {}", missing.join(", "))]
    MissingHeaders {
        kind: SchemaKind,
        missing: Vec<String>,
    },

    /// A column needed by a join or aggregation is absent.
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: &'static str, column: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RosterError {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RosterError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for rostercheck operations.
pub type Result<T> = std::result::Result<T, RosterError>;
