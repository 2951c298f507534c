//! Format executor.
//!
//! Runs a [`FormatSpec`] over parsed roster rows to produce output cells.
//! Every row passes the surname gate first: no surname means the row is
//! dropped silently, a surname already present in the existing set means
//! the row is skipped and its name recorded for the skip log.

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

use super::spec::{FieldTransform, FormatSpec};

/// Result of executing a format over a set of rows.
#[derive(Debug)]
pub struct ExecuteResult {
    /// Output rows, one cell vector per surviving source row
    pub rows: Vec<Vec<String>>,
    /// Original-case surnames rejected by deduplication, sorted
    pub skipped: BTreeSet<String>,
    /// Rows dropped for lacking a surname (never logged)
    pub dropped: usize,
}

impl ExecuteResult {
    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Mapped: {} rows, {} skipped, {} dropped",
            self.rows.len(),
            self.skipped.len(),
            self.dropped
        )
    }
}

/// Execute a format spec over parsed roster rows.
///
/// # Arguments
/// * `records` - Roster rows from CSV parsing (each a JSON object)
/// * `spec` - The output format to produce
/// * `existing` - Lowercased surnames from a prior export
pub fn execute(records: &[Value], spec: &FormatSpec, existing: &HashSet<String>) -> ExecuteResult {
    let mut result = ExecuteResult {
        rows: Vec::new(),
        skipped: BTreeSet::new(),
        dropped: 0,
    };

    for record in records {
        let row = match record.as_object() {
            Some(obj) => obj,
            None => {
                result.dropped += 1;
                continue;
            }
        };

        let surname = row
            .get(&spec.key_column)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim();

        if surname.is_empty() {
            result.dropped += 1;
            continue;
        }

        if existing.contains(&surname.to_lowercase()) {
            result.skipped.insert(surname.to_string());
            continue;
        }

        let cells = spec
            .columns
            .iter()
            .map(|col| value_to_cell(apply_transform(row, &col.transform)))
            .collect();
        result.rows.push(cells);
    }

    result
}

/// Apply a field transformation to one row.
fn apply_transform(row: &Map<String, Value>, transform: &FieldTransform) -> Option<Value> {
    // Get initial value from source column(s) or constant. A missing single
    // source degrades to an empty string so the operation chain still runs
    // (classifiers produce their default from empty input).
    let value = if let Some(source) = &transform.source {
        Some(row.get(source).cloned().unwrap_or(Value::String(String::new())))
    } else if let Some(sources) = &transform.sources {
        // Multiple sources - concatenate the non-empty parts
        let parts: Vec<String> = sources
            .iter()
            .filter_map(|s| row.get(s))
            .filter_map(|v| v.as_str())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(Value::String(parts.join(&transform.concat_separator)))
        }
    } else {
        transform.constant.clone()
    };

    // Apply operations in sequence
    if let Some(mut v) = value {
        for op in &transform.operations {
            v = op.apply(&v);
        }

        if !is_empty(&v) {
            return Some(v);
        }
    }

    // Empty result: give the fallback transform a chance
    if let Some(fallback) = &transform.fallback {
        return apply_transform(row, fallback);
    }

    None
}

/// Render a transform result as a CSV cell.
fn value_to_cell(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Check if a value is "empty" (null, blank string, etc.)
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
