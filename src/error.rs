//! Error types for the Rosterload transformation pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV parsing errors
//! - [`TransformError`] - Format mapping errors
//! - [`DedupError`] - Existing-roster loading errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode file content.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    ParseError(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        CsvError::ParseError(e.to_string())
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors during format mapping.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid format specification.
    #[error("Invalid format spec: {0}")]
    InvalidSpec(String),

    /// Invalid regex pattern in an operation.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Deduplication Errors
// =============================================================================

/// Errors while loading the existing roster.
#[derive(Debug, Error)]
pub enum DedupError {
    /// IO error reading the existing roster.
    #[error("Failed to read existing roster: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed existing roster.
    #[error("Invalid existing roster: {0}")]
    ParseError(String),
}

impl From<csv::Error> for DedupError {
    fn from(e: csv::Error) -> Self {
        DedupError::ParseError(e.to_string())
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::transform_roster`]. It wraps all
/// lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Existing-roster error.
    #[error("Dedup error: {0}")]
    Dedup(#[from] DedupError),

    /// Failed to write an output file.
    #[error("Failed to write output '{path}': {message}")]
    OutputError { path: String, message: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for deduplication operations.
pub type DedupResult<T> = Result<T, DedupError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // DedupError -> PipelineError
        let dedup_err = DedupError::ParseError("bad header row".into());
        let pipeline_err: PipelineError = dedup_err.into();
        assert!(pipeline_err.to_string().contains("bad header row"));
    }

    #[test]
    fn test_output_error_format() {
        let err = PipelineError::OutputError {
            path: "users.csv".into(),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("users.csv"));
        assert!(msg.contains("permission denied"));
    }
}
