//! DSL for roster-to-output field mapping.
//!
//! This module provides:
//! - `spec`: Output format definition (column order + per-column transforms)
//! - `operations`: Available transformation operations
//! - `executor`: Execute format specs on parsed roster rows
//!
//! ## Usage Flow
//!
//! ```text
//! CSV → parser::parse_csv_file_auto → FormatSpec per output → executor::execute → writer
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use rosterload::{execute, user_import_spec, RosterConfig};
//! use std::collections::HashSet;
//!
//! let config = RosterConfig::default();
//! let spec = user_import_spec(&config);
//! let result = execute(&records, &spec, &HashSet::new());
//! println!("{}", result.summary());
//! ```

pub mod executor;
pub mod operations;
pub mod spec;

// Re-exports for convenience
pub use executor::{execute, ExecuteResult};
pub use operations::{operations_description, ContainsRule, Operation};
pub use spec::{contact_import_spec, user_import_spec, ColumnSpec, FieldTransform, FormatSpec};
