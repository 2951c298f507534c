//! # Rosterload - roster CSV transformation and deduplication
//!
//! Rosterload transforms a source roster CSV into up to two fixed-schema
//! import tables (a 26-column user import and an 11-column contact import),
//! deduplicating against a previously-exported roster by surname.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Roster CSV  │────▶│   Parser    │────▶│  Transform  │────▶│ Import CSVs │
//! │ (ISO/UTF8)  │     │ (auto-enc)  │     │ (DSL+dedup) │     │ + skip log  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rosterload::{transform_roster, TransformOptions};
//! use std::path::Path;
//!
//! fn main() {
//!     let mut options = TransformOptions::default();
//!     options.user_import_path = Some("users.csv".into());
//!     options.contact_import_path = Some("contacts.csv".into());
//!
//!     let report = transform_roster(Path::new("roster.csv"), &options).unwrap();
//!     println!("{} names skipped", report.skipped.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Injectable configuration (literals, mapping tables)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - DSL, format specs, and pipeline
//! - [`dedup`] - Existing-surname set and skip log
//! - [`writer`] - Output tables and skip-log file
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Deduplication
pub mod dedup;

// Output
pub mod writer;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, DedupError, PipelineError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{LanguageRule, RosterConfig, DEFAULT_LOG_FILE};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_records,
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes_auto,
    parse_csv_file_auto,
    ParseResult,
};

// =============================================================================
// Re-exports - DSL
// =============================================================================

pub use transform::dsl::{
    contact_import_spec,
    execute,
    operations_description,
    user_import_spec,
    ColumnSpec,
    ContainsRule,
    ExecuteResult,
    FieldTransform,
    FormatSpec,
    Operation,
};

// =============================================================================
// Re-exports - Deduplication
// =============================================================================

pub use dedup::{ExistingNames, SkipLog};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    transform_bytes,
    transform_roster,
    CsvInfo,
    FormatReport,
    PipelineReport,
    TransformOptions,
};

// =============================================================================
// Re-exports - Writer
// =============================================================================

pub use writer::{write_skip_log, write_table};
