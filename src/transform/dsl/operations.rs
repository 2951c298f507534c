//! DSL operations for field transformation.
//!
//! Available operations that can be applied to transform roster values
//! into output-format cells.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// All available transformation operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Remove leading and trailing whitespace
    Trim,

    /// Convert to uppercase
    Uppercase,

    /// Convert to lowercase
    Lowercase,

    /// Replace using regex pattern
    Replace {
        pattern: String,
        #[serde(default)]
        value: String,
    },

    /// Ensure string ends with given suffix
    EnsureSuffix {
        value: String,
    },

    /// Map values using a lookup table
    Map {
        mapping: HashMap<String, String>,
        /// When no mapping match is found, keep the input value instead of
        /// dropping the field
        #[serde(default)]
        passthrough_unmapped: bool,
    },

    /// Classify by case-insensitive substring match, first rule wins
    MapContains {
        rules: Vec<ContainsRule>,
        default: String,
    },
}

/// One rule of a [`Operation::MapContains`] classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainsRule {
    /// Substrings that trigger this rule (matched case-insensitively)
    pub needles: Vec<String>,
    /// Value produced when any needle matches
    pub value: String,
}

impl Operation {
    /// Apply this operation to a value
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Operation::Trim => self.apply_trim(value),
            Operation::Uppercase => self.apply_uppercase(value),
            Operation::Lowercase => self.apply_lowercase(value),
            Operation::Replace { pattern, value: replacement } => {
                self.apply_replace(value, pattern, replacement)
            }
            Operation::EnsureSuffix { value: suffix } => self.apply_ensure_suffix(value, suffix),
            Operation::Map { mapping, passthrough_unmapped } => {
                self.apply_map(value, mapping, *passthrough_unmapped)
            }
            Operation::MapContains { rules, default } => {
                self.apply_map_contains(value, rules, default)
            }
        }
    }

    fn as_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn apply_trim(&self, value: &Value) -> Value {
        Self::as_string(value)
            .map(|s| Value::String(s.trim().to_string()))
            .unwrap_or(value.clone())
    }

    fn apply_uppercase(&self, value: &Value) -> Value {
        Self::as_string(value)
            .map(|s| Value::String(s.to_uppercase()))
            .unwrap_or(value.clone())
    }

    fn apply_lowercase(&self, value: &Value) -> Value {
        Self::as_string(value)
            .map(|s| Value::String(s.to_lowercase()))
            .unwrap_or(value.clone())
    }

    fn apply_replace(&self, value: &Value, pattern: &str, replacement: &str) -> Value {
        Self::as_string(value)
            .and_then(|s| {
                regex::Regex::new(pattern)
                    .ok()
                    .map(|re| Value::String(re.replace_all(&s, replacement).to_string()))
            })
            .unwrap_or(value.clone())
    }

    fn apply_ensure_suffix(&self, value: &Value, suffix: &str) -> Value {
        Self::as_string(value)
            .map(|s| {
                if s.ends_with(suffix) {
                    Value::String(s)
                } else {
                    Value::String(format!("{}{}", s, suffix))
                }
            })
            .unwrap_or(value.clone())
    }

    fn apply_map(&self, value: &Value, mapping: &HashMap<String, String>, passthrough: bool) -> Value {
        Self::as_string(value)
            .map(|s| match mapping.get(&s) {
                Some(v) => Value::String(v.clone()),
                None if passthrough => Value::String(s),
                // Empty = field will be dropped
                None => Value::String(String::new()),
            })
            .unwrap_or(value.clone())
    }

    fn apply_map_contains(&self, value: &Value, rules: &[ContainsRule], default: &str) -> Value {
        let haystack = Self::as_string(value).unwrap_or_default().to_lowercase();

        for rule in rules {
            if rule.needles.iter().any(|n| haystack.contains(&n.to_lowercase())) {
                return Value::String(rule.value.clone());
            }
        }

        Value::String(default.to_string())
    }
}

/// Get a description of all available operations
pub fn operations_description() -> String {
    r#"Available transformation operations:

| Operation | Description | Parameters |
|-----------|-------------|------------|
| trim | Remove leading/trailing whitespace | - |
| uppercase | Convert to uppercase | - |
| lowercase | Convert to lowercase | - |
| replace | Regex pattern replacement | pattern: regex, value: replacement |
| ensure_suffix | Add suffix if not present | value: suffix string |
| map | Map values using lookup table | mapping: {source: target}, passthrough_unmapped: bool |
| map_contains | Classify by substring match | rules: [{needles, value}], default: fallback value |

Example operations in JSON:
[
  {"type": "trim"},
  {"type": "replace", "pattern": " ", "value": ""},
  {"type": "map", "mapping": {"Acme Corporation": "Acme"}, "passthrough_unmapped": true},
  {"type": "map_contains", "rules": [{"needles": ["spanish"], "value": "es"}], "default": "en"},
  {"type": "ensure_suffix", "value": "@unknown.com"}
]"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        let op = Operation::Trim;
        assert_eq!(op.apply(&Value::String("  hello  ".to_string())), Value::String("hello".to_string()));
    }

    #[test]
    fn test_replace_strips_spaces_only() {
        let op = Operation::Replace { pattern: " ".to_string(), value: String::new() };
        assert_eq!(
            op.apply(&Value::String("De La Cruz".to_string())),
            Value::String("DeLaCruz".to_string())
        );
        // Punctuation survives
        assert_eq!(
            op.apply(&Value::String("O'Brien".to_string())),
            Value::String("O'Brien".to_string())
        );
    }

    #[test]
    fn test_map_passthrough() {
        let mut mapping = HashMap::new();
        mapping.insert("Acme Corporation".to_string(), "Acme".to_string());

        let op = Operation::Map { mapping: mapping.clone(), passthrough_unmapped: true };
        assert_eq!(op.apply(&Value::String("Acme Corporation".to_string())), Value::String("Acme".to_string()));
        // Unmapped value passes through unchanged
        assert_eq!(op.apply(&Value::String("Globex".to_string())), Value::String("Globex".to_string()));
        // Empty stays empty
        assert_eq!(op.apply(&Value::String(String::new())), Value::String(String::new()));

        // Without passthrough, no match drops the field
        let op_drop = Operation::Map { mapping, passthrough_unmapped: false };
        assert_eq!(op_drop.apply(&Value::String("Globex".to_string())), Value::String(String::new()));
    }

    #[test]
    fn test_map_idempotent_on_mapped_output() {
        let mut mapping = HashMap::new();
        mapping.insert("Acme Corporation".to_string(), "Acme".to_string());
        let op = Operation::Map { mapping, passthrough_unmapped: true };

        let once = op.apply(&Value::String("Acme Corporation".to_string()));
        let twice = op.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_map_contains_case_insensitive() {
        let op = Operation::MapContains {
            rules: vec![ContainsRule {
                needles: vec!["espanol".to_string(), "spanish".to_string()],
                value: "es".to_string(),
            }],
            default: "en".to_string(),
        };

        assert_eq!(op.apply(&Value::String("Espanol".to_string())), Value::String("es".to_string()));
        assert_eq!(op.apply(&Value::String("SPANISH (LATAM)".to_string())), Value::String("es".to_string()));
        assert_eq!(op.apply(&Value::String("prefers spanish please".to_string())), Value::String("es".to_string()));
        assert_eq!(op.apply(&Value::String("English".to_string())), Value::String("en".to_string()));
        assert_eq!(op.apply(&Value::String(String::new())), Value::String("en".to_string()));
    }

    #[test]
    fn test_ensure_suffix() {
        let op = Operation::EnsureSuffix { value: "@unknown.com".to_string() };
        assert_eq!(
            op.apply(&Value::String("garcia".to_string())),
            Value::String("garcia@unknown.com".to_string())
        );
        assert_eq!(
            op.apply(&Value::String("garcia@unknown.com".to_string())),
            Value::String("garcia@unknown.com".to_string())
        );
    }
}
