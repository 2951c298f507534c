//! Output format specification.
//!
//! A [`FormatSpec`] defines one output table: its column order and how each
//! column is derived from a source row. Both shipped formats are built from
//! [`RosterConfig`], so the mapping tables and literals stay injectable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operations::{ContainsRule, Operation};
use crate::models::RosterConfig;

/// A complete output format: ordered columns plus the surname gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Short name used in logs
    pub name: String,

    /// Source column holding the surname; rows with an empty value here are
    /// dropped, rows whose lowercased value is already known are skipped
    pub key_column: String,

    /// Output columns in emission order
    pub columns: Vec<ColumnSpec>,
}

/// One output column: header text plus the transform producing its cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub transform: FieldTransform,
}

impl ColumnSpec {
    pub fn new(header: &str, transform: FieldTransform) -> Self {
        Self { header: header.to_string(), transform }
    }

    /// A column that is always emitted empty.
    pub fn blank(header: &str) -> Self {
        Self::new(header, FieldTransform::from_constant(Value::String(String::new())))
    }
}

/// Transformation rule for a single output column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTransform {
    /// Source column name (mutually exclusive with sources and constant)
    #[serde(default)]
    pub source: Option<String>,

    /// Multiple source columns to concatenate (mutually exclusive with
    /// source and constant)
    #[serde(default)]
    pub sources: Option<Vec<String>>,

    /// Separator for concatenating multiple sources (default: " ")
    #[serde(default = "default_concat_separator")]
    pub concat_separator: String,

    /// Constant value (mutually exclusive with source/sources)
    #[serde(default)]
    pub constant: Option<Value>,

    /// Ordered list of operations to apply
    #[serde(default)]
    pub operations: Vec<Operation>,

    /// Transform evaluated against the same row when this one produces an
    /// empty value
    #[serde(default)]
    pub fallback: Option<Box<FieldTransform>>,
}

fn default_concat_separator() -> String {
    " ".to_string()
}

impl FormatSpec {
    /// Parse a spec from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Header row in emission order.
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    /// Get all source columns referenced by this spec
    pub fn source_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .columns
            .iter()
            .flat_map(|c| c.transform.get_sources())
            .collect();
        columns.push(self.key_column.clone());

        columns.sort();
        columns.dedup();
        columns
    }

    /// Report source columns missing from the given headers.
    ///
    /// Missing columns are not an error (they degrade to empty cells);
    /// callers use this to warn.
    pub fn validate_headers(&self, headers: &[String]) -> Result<(), Vec<String>> {
        let missing: Vec<String> = self
            .source_columns()
            .into_iter()
            .filter(|col| !headers.iter().any(|h| h == col))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

impl FieldTransform {
    /// Create a transform from a source column
    pub fn from_source(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            sources: None,
            concat_separator: default_concat_separator(),
            constant: None,
            operations: Vec::new(),
            fallback: None,
        }
    }

    /// Create a transform from multiple source columns (concatenated)
    pub fn from_sources(sources: Vec<String>, separator: &str) -> Self {
        Self {
            source: None,
            sources: Some(sources),
            concat_separator: separator.to_string(),
            constant: None,
            operations: Vec::new(),
            fallback: None,
        }
    }

    /// Create a transform with a constant value
    pub fn from_constant(value: Value) -> Self {
        Self {
            source: None,
            sources: None,
            concat_separator: default_concat_separator(),
            constant: Some(value),
            operations: Vec::new(),
            fallback: None,
        }
    }

    /// Add an operation to the chain
    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Set the fallback transform used when this one yields nothing
    pub fn with_fallback(mut self, fallback: FieldTransform) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Get all source columns referenced by this transform
    pub fn get_sources(&self) -> Vec<String> {
        let mut result = Vec::new();
        if let Some(ref s) = self.source {
            result.push(s.clone());
        }
        if let Some(ref ss) = self.sources {
            result.extend(ss.clone());
        }
        if let Some(ref f) = self.fallback {
            result.extend(f.get_sources());
        }
        result
    }
}

// =============================================================================
// Shared column builders
// =============================================================================

/// Email column: source value, or synthesized from the surname when empty.
///
/// Synthesis strips spaces only and lowercases; punctuation is preserved.
fn email_transform(config: &RosterConfig) -> FieldTransform {
    FieldTransform::from_source("email")
        .with_operation(Operation::Trim)
        .with_fallback(
            FieldTransform::from_source("lastname")
                .with_operation(Operation::Trim)
                .with_operation(Operation::Replace {
                    pattern: " ".to_string(),
                    value: String::new(),
                })
                .with_operation(Operation::Lowercase)
                .with_operation(Operation::EnsureSuffix {
                    value: config.email_domain.clone(),
                }),
        )
}

/// Company column: trimmed, long-form names shortened via the mapping table.
fn company_transform(config: &RosterConfig) -> FieldTransform {
    FieldTransform::from_source("company_name")
        .with_operation(Operation::Trim)
        .with_operation(Operation::Map {
            mapping: config.company_map.clone(),
            passthrough_unmapped: true,
        })
}

/// Which half of a language rule a column wants.
enum LanguagePart {
    Code,
    Group,
}

fn language_transform(config: &RosterConfig, part: LanguagePart) -> FieldTransform {
    let (rules, default) = match part {
        LanguagePart::Code => (
            config
                .language_rules
                .iter()
                .map(|r| ContainsRule { needles: r.needles.clone(), value: r.code.clone() })
                .collect(),
            config.default_language_code.clone(),
        ),
        LanguagePart::Group => (
            config
                .language_rules
                .iter()
                .map(|r| ContainsRule { needles: r.needles.clone(), value: r.group.clone() })
                .collect(),
            config.default_language_group.clone(),
        ),
    };

    FieldTransform::from_source("language")
        .with_operation(Operation::Trim)
        .with_operation(Operation::MapContains { rules, default })
}

fn passthrough(source: &str) -> FieldTransform {
    FieldTransform::from_source(source).with_operation(Operation::Trim)
}

// =============================================================================
// Shipped formats
// =============================================================================

/// The 26-column user-import format.
///
/// Username and Email both carry the (possibly synthesized) email address;
/// the normalized company name is written to both "Companies" and
/// "Locations"; the mobile number lands in "Phone".
pub fn user_import_spec(config: &RosterConfig) -> FormatSpec {
    let columns = vec![
        ColumnSpec::new("First Name", passthrough("name")),
        ColumnSpec::new("Last Name", passthrough("lastname")),
        ColumnSpec::new("Username", email_transform(config)),
        ColumnSpec::new("Email", email_transform(config)),
        ColumnSpec::new(
            "Password (If empty the user will receive an email to set their password)",
            FieldTransform::from_constant(Value::String(config.password.clone())),
        ),
        ColumnSpec::new(
            "Force password reset at login (yes/no)",
            FieldTransform::from_constant(Value::String("no".to_string())),
        ),
        ColumnSpec::new(
            "Country",
            FieldTransform::from_constant(Value::String(config.country.clone())),
        ),
        ColumnSpec::new("Language (en/es/pt/fr)", language_transform(config, LanguagePart::Code)),
        ColumnSpec::new(
            "Groups (Separated with slashes)",
            language_transform(config, LanguagePart::Group),
        ),
        ColumnSpec::new("Companies (Separated with slashes)", company_transform(config)),
        ColumnSpec::new("Address", passthrough("address")),
        ColumnSpec::new("Phone", passthrough("mobile")),
        ColumnSpec::blank("Mobile"),
        ColumnSpec::blank("Email Alternative"),
        ColumnSpec::blank("Fax"),
        ColumnSpec::blank("Office Phone"),
        ColumnSpec::blank("Other Phone"),
        ColumnSpec::blank("City"),
        ColumnSpec::blank("Localization"),
        ColumnSpec::blank("Manager (Username|ID)"),
        ColumnSpec::blank("Department"),
        ColumnSpec::blank("Position"),
        ColumnSpec::blank("Employee Number"),
        ColumnSpec::blank("Document"),
        ColumnSpec::blank("Birthday"),
        ColumnSpec::new("Locations (Separated with slashes)", company_transform(config)),
    ];

    FormatSpec {
        name: "user-import".to_string(),
        key_column: "lastname".to_string(),
        columns,
    }
}

/// The 11-column contact-import format.
///
/// The mobile number lands in "Phone" while the "Mobile" column is always
/// emitted empty; the downstream system expects it that way.
pub fn contact_import_spec(config: &RosterConfig) -> FormatSpec {
    let columns = vec![
        ColumnSpec::new(
            "Full Name*",
            FieldTransform::from_sources(
                vec!["name".to_string(), "lastname".to_string()],
                " ",
            ),
        ),
        ColumnSpec::new("Email*", email_transform(config)),
        ColumnSpec::new("Phone", passthrough("mobile")),
        ColumnSpec::blank("Mobile"),
        ColumnSpec::new("Address", passthrough("address")),
        ColumnSpec::new("Date of Birth", passthrough("birthday")),
        ColumnSpec::new("Position", passthrough("position")),
        ColumnSpec::new("Employee ID", passthrough("employee_number")),
        ColumnSpec::new("Company", company_transform(config)),
        ColumnSpec::new("Department", passthrough("department")),
        ColumnSpec::new("Manager", passthrough("manager_id")),
    ];

    FormatSpec {
        name: "contact-import".to_string(),
        key_column: "lastname".to_string(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_import_shape() {
        let spec = user_import_spec(&RosterConfig::default());
        assert_eq!(spec.columns.len(), 26);
        assert_eq!(spec.columns[0].header, "First Name");
        assert_eq!(spec.columns[11].header, "Phone");
        assert_eq!(spec.columns[25].header, "Locations (Separated with slashes)");
        assert_eq!(spec.key_column, "lastname");
    }

    #[test]
    fn test_contact_import_shape() {
        let spec = contact_import_spec(&RosterConfig::default());
        assert_eq!(spec.columns.len(), 11);
        assert_eq!(spec.columns[0].header, "Full Name*");
        assert_eq!(spec.columns[3].header, "Mobile");
        assert_eq!(spec.columns[10].header, "Manager");
    }

    #[test]
    fn test_spec_serialization_roundtrip() {
        let spec = user_import_spec(&RosterConfig::default());
        let json = spec.to_json().unwrap();
        let parsed = FormatSpec::from_json(&json).unwrap();
        assert_eq!(parsed.name, spec.name);
        assert_eq!(parsed.columns.len(), spec.columns.len());
    }

    #[test]
    fn test_source_columns_include_fallbacks() {
        let spec = contact_import_spec(&RosterConfig::default());
        let sources = spec.source_columns();
        // email fallback reaches into lastname
        assert!(sources.contains(&"email".to_string()));
        assert!(sources.contains(&"lastname".to_string()));
        assert!(sources.contains(&"manager_id".to_string()));
    }

    #[test]
    fn test_validate_headers_reports_missing() {
        let spec = contact_import_spec(&RosterConfig::default());
        let headers: Vec<String> = ["name", "lastname", "email"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let missing = spec.validate_headers(&headers).unwrap_err();
        assert!(missing.contains(&"mobile".to_string()));
        assert!(!missing.contains(&"lastname".to_string()));
    }
}
