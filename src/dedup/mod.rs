//! Surname-based deduplication.
//!
//! [`ExistingNames`] holds the surnames from a previously-exported roster;
//! rows whose surname is already present are skipped rather than emitted
//! again. [`SkipLog`] collects the rejected names for operator review.
//!
//! The existing roster is optional in every way: a missing path, a
//! nonexistent file, or a file without any recognized surname column all
//! yield an empty set, never an error.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::error::DedupResult;
use crate::parser::{decode_content, detect_delimiter, detect_encoding};

/// Recognized surname columns in a prior export, in priority order.
/// "Full Name*" is a fallback; the surname is its final whitespace token.
const SURNAME_COLUMNS: [&str; 4] = ["Last names", "Last Name", "lastname", "Full Name*"];

// =============================================================================
// Existing-Surname Set
// =============================================================================

/// Lowercased surnames from a previously-exported roster.
///
/// Built once before processing; read-only during output generation.
#[derive(Debug, Default)]
pub struct ExistingNames {
    names: HashSet<String>,
}

impl ExistingNames {
    /// An empty set (no prior export).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load surnames from an optional prior export.
    ///
    /// `None`, a nonexistent path, or a file without a recognized surname
    /// column all produce an empty set. Read failures on an existing file
    /// propagate.
    pub fn load(path: Option<&Path>) -> DedupResult<Self> {
        let path = match path {
            Some(p) if p.is_file() => p,
            _ => return Ok(Self::empty()),
        };

        let bytes = std::fs::read(path)?;
        let encoding = detect_encoding(&bytes);
        let content = decode_content(&bytes, &encoding)
            .map_err(|e| crate::error::DedupError::ParseError(e.to_string()))?;
        let delimiter = detect_delimiter(&content);

        Self::from_csv(&content, delimiter)
    }

    /// Parse surnames out of decoded CSV content.
    pub fn from_csv(content: &str, delimiter: char) -> DedupResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let Some((column, is_full_name)) = select_column(&headers) else {
            return Ok(Self::empty());
        };

        let mut names = HashSet::new();
        for record in reader.records() {
            let record = record?;
            let raw = record.get(column).unwrap_or("").trim();
            if raw.is_empty() {
                continue;
            }

            let surname = if is_full_name {
                // Last word of the full name
                raw.split_whitespace().last().unwrap_or(raw)
            } else {
                raw
            };

            names.insert(surname.trim().to_lowercase());
        }

        Ok(Self { names })
    }

    /// Check a surname against the set, case-insensitively.
    pub fn contains(&self, surname: &str) -> bool {
        self.names.contains(&surname.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The underlying lowercased set, for the executor gate.
    pub fn as_set(&self) -> &HashSet<String> {
        &self.names
    }
}

/// Pick the surname column from a header record, by priority.
fn select_column(headers: &csv::StringRecord) -> Option<(usize, bool)> {
    for candidate in SURNAME_COLUMNS {
        if let Some(idx) = headers.iter().position(|h| h.trim() == candidate) {
            return Some((idx, candidate == "Full Name*"));
        }
    }
    None
}

// =============================================================================
// Skip Log
// =============================================================================

/// Banner line written at the top of the skip log file.
const SKIP_LOG_BANNER: &str = "Skipped lastnames (already exist in existing CSV):";

/// Original-case surnames rejected by deduplication.
///
/// Backed by an ordered set, so entries are unique and iterate in
/// case-sensitive lexicographic order.
#[derive(Debug, Default)]
pub struct SkipLog {
    names: BTreeSet<String>,
}

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge skip entries from one format pass.
    pub fn extend(&mut self, names: BTreeSet<String>) {
        self.names.extend(names);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Skipped surnames in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.names.iter()
    }

    /// Render the log file content: banner plus one surname per line.
    pub fn render(&self) -> String {
        let mut out = String::from(SKIP_LOG_BANNER);
        out.push('\n');
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_empty_set() {
        let set = ExistingNames::load(Some(Path::new("/nonexistent/export.csv"))).unwrap();
        assert!(set.is_empty());

        let set = ExistingNames::load(None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "First Name,Last Name\nAna,Garcia\nLuis,Reyes\n").unwrap();

        let set = ExistingNames::load(Some(file.path())).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("garcia"));
        assert!(set.contains("Garcia"));
        assert!(set.contains("REYES"));
    }

    #[test]
    fn test_column_priority() {
        // "Last Name" wins over "lastname"
        let csv = "lastname,Last Name\nwrong,Garcia\n";
        let set = ExistingNames::from_csv(csv, ',').unwrap();
        assert!(set.contains("garcia"));
        assert!(!set.contains("wrong"));

        // "Last names" wins over everything
        let csv = "Last Name,Last names\nwrong,Reyes\n";
        let set = ExistingNames::from_csv(csv, ',').unwrap();
        assert!(set.contains("reyes"));
        assert!(!set.contains("wrong"));
    }

    #[test]
    fn test_full_name_takes_last_token() {
        let csv = "Full Name*,Email*\nAna Maria Garcia,a@example.org\nReyes,r@example.org\n";
        let set = ExistingNames::from_csv(csv, ',').unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("garcia"));
        assert!(set.contains("reyes"));
        assert!(!set.contains("ana"));
    }

    #[test]
    fn test_unrecognized_headers_yield_empty_set() {
        let csv = "id,full\n1,Ana Garcia\n";
        let set = ExistingNames::from_csv(csv, ',').unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_values_lowercased_and_trimmed() {
        let csv = "Last Name\n  GARCIA  \n";
        let set = ExistingNames::from_csv(csv, ',').unwrap();
        assert!(set.as_set().contains("garcia"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let csv = "Last Name\nGarcia\n\n   \n";
        let set = ExistingNames::from_csv(csv, ',').unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_skip_log_sorted_and_unique() {
        let mut log = SkipLog::new();
        log.extend(["Zamora".to_string(), "Alvarez".to_string()].into_iter().collect());
        log.extend(["Alvarez".to_string(), "Garcia".to_string()].into_iter().collect());

        assert_eq!(log.len(), 3);
        let rendered = log.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], SKIP_LOG_BANNER);
        assert_eq!(&lines[1..], &["Alvarez", "Garcia", "Zamora"]);
    }
}
