//! High-level pipeline API for roster transformation.
//!
//! This module combines all steps: parsing, deduplication loading, format
//! mapping, output writing, and the skip log.
//!
//! # Example
//!
//! ```rust,ignore
//! use rosterload::{transform_roster, TransformOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut options = TransformOptions::default();
//!     options.user_import_path = Some("users.csv".into());
//!
//!     let report = transform_roster(Path::new("roster.csv"), &options)?;
//!     println!("{} names skipped", report.skipped.len());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::dedup::{ExistingNames, SkipLog};
use crate::error::PipelineResult;
use crate::logs::{log_info, log_success, log_warning};
use crate::models::{RosterConfig, DEFAULT_LOG_FILE};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};
use crate::transform::dsl::{contact_import_spec, execute, user_import_spec, FormatSpec};
use crate::writer::{write_skip_log, write_table};

/// Options for the transformation pipeline
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Where to write the user-import table; `None` skips it
    pub user_import_path: Option<PathBuf>,

    /// Where to write the contact-import table; `None` skips it
    pub contact_import_path: Option<PathBuf>,

    /// Previously-exported roster used for surname deduplication
    pub existing_path: Option<PathBuf>,

    /// Where to write the skip log when any surname was rejected
    pub log_file: PathBuf,

    /// Literals and mapping tables injected into the format specs
    pub config: RosterConfig,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            user_import_path: None,
            contact_import_path: None,
            existing_path: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            config: RosterConfig::default(),
        }
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// One entry per format that was written
    pub formats: Vec<FormatReport>,

    /// Surnames rejected by deduplication, sorted, merged across formats
    pub skipped: Vec<String>,

    /// Skip-log path, when one was written
    pub log_file: Option<String>,

    /// Source parsing metadata
    pub csv_info: CsvInfo,
}

/// Outcome of one format pass
#[derive(Debug, Clone, Serialize)]
pub struct FormatReport {
    pub name: String,
    pub path: String,
    /// Rows written to the output table
    pub written: usize,
    /// Rows dropped for lacking a surname
    pub dropped: usize,
}

/// Source CSV information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Transform a roster file into the requested output tables.
///
/// This is the main entry point for the pipeline. It:
/// 1. Parses the source CSV with auto-detection
/// 2. Loads the existing-surname set (if a prior export was given)
/// 3. Runs each requested format in its own pass over the rows
/// 4. Merges skip entries and writes the skip log when non-empty
pub fn transform_roster(path: &Path, options: &TransformOptions) -> PipelineResult<PipelineReport> {
    log_info(format!("📖 Reading roster: {}", path.display()));
    let parse_result = parse_csv_file_auto(path)?;
    run(parse_result, options)
}

/// Transform roster bytes instead of a file path.
pub fn transform_bytes(bytes: &[u8], options: &TransformOptions) -> PipelineResult<PipelineReport> {
    let parse_result = parse_bytes_auto(bytes)?;
    run(parse_result, options)
}

/// Internal: run the pipeline over parsed rows
fn run(parse_result: ParseResult, options: &TransformOptions) -> PipelineResult<PipelineReport> {
    log_success(format!("Detected encoding: {}", parse_result.encoding));
    log_success(format!(
        "Detected delimiter: '{}'",
        format_delimiter(parse_result.delimiter)
    ));
    log_success(format!("Read {} rows", parse_result.records.len()));

    let csv_info = CsvInfo {
        encoding: parse_result.encoding.clone(),
        delimiter: parse_result.delimiter,
        headers: parse_result.headers.clone(),
        row_count: parse_result.records.len(),
    };

    let existing = ExistingNames::load(options.existing_path.as_deref())?;
    if !existing.is_empty() {
        log_info(format!("Loaded {} existing surnames", existing.len()));
    }

    let mut requested: Vec<(FormatSpec, &Path)> = Vec::new();
    if let Some(ref path) = options.user_import_path {
        requested.push((user_import_spec(&options.config), path.as_path()));
    }
    if let Some(ref path) = options.contact_import_path {
        requested.push((contact_import_spec(&options.config), path.as_path()));
    }

    let mut skip_log = SkipLog::new();
    let mut formats = Vec::new();

    // Each format gets a fresh pass over the shared in-memory rows.
    for (spec, path) in requested {
        log_info(format!("⚙️  Mapping {}...", spec.name));

        if let Err(missing) = spec.validate_headers(&parse_result.headers) {
            log_warning(format!(
                "Source is missing columns: {} (cells degrade to empty)",
                missing.join(", ")
            ));
        }

        let result = execute(&parse_result.records, &spec, existing.as_set());
        if result.dropped > 0 {
            log_warning(format!("{} rows dropped (no surname)", result.dropped));
        }
        if !result.skipped.is_empty() {
            log_warning(format!("{} surnames skipped (already exported)", result.skipped.len()));
        }

        write_table(path, &spec.headers(), &result.rows)?;
        log_success(format!("{} rows written to {}", result.rows.len(), path.display()));

        formats.push(FormatReport {
            name: spec.name.clone(),
            path: path.display().to_string(),
            written: result.rows.len(),
            dropped: result.dropped,
        });
        skip_log.extend(result.skipped);
    }

    let log_file = if skip_log.is_empty() {
        None
    } else {
        write_skip_log(&options.log_file, &skip_log)?;
        Some(options.log_file.display().to_string())
    };

    Ok(PipelineReport {
        formats,
        skipped: skip_log.names().cloned().collect(),
        log_file,
        csv_info,
    })
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SOURCE: &str = "\
name,lastname,email,mobile,address,company_name,language,birthday,position,employee_number,department,manager_id
Ana,Garcia,,555-1234,,Catholic Charities of Northeast Kansas,Espanol,,,,,
Luis,Alvarez,luis@example.org,,,,,1990-02-01,Teacher,E-77,Education,M-3
Eva,Zamora,,,,,,,,,,
,NoFirst,,,,,,,,,,
OnlyFirst,,,,,,,,,,,
";

    const EXISTING: &str = "\
Last Name
Alvarez
Zamora
";

    fn options_in(dir: &Path) -> TransformOptions {
        TransformOptions {
            user_import_path: Some(dir.join("users.csv")),
            contact_import_path: Some(dir.join("contacts.csv")),
            existing_path: None,
            log_file: dir.join("skipped_lastnames.log"),
            config: RosterConfig::default(),
        }
    }

    #[test]
    fn test_both_formats_written() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("roster.csv");
        fs::write(&source, SOURCE).unwrap();

        let options = options_in(dir.path());
        let report = transform_roster(&source, &options).unwrap();

        assert_eq!(report.formats.len(), 2);
        // 5 source rows: one lacks a surname entirely
        assert_eq!(report.formats[0].written, 4);
        assert_eq!(report.formats[0].dropped, 1);
        assert!(report.skipped.is_empty());
        assert!(report.log_file.is_none());
        assert!(!options.log_file.exists());

        let users = fs::read_to_string(dir.path().join("users.csv")).unwrap();
        let lines: Vec<&str> = users.lines().collect();
        assert_eq!(lines.len(), 5); // header + 4 rows
        assert!(lines[0].starts_with("First Name,Last Name,Username,Email,"));
        assert!(lines[1].contains("garcia@unknown.com"));
        assert!(lines[1].contains(",es,SpanishSpeakers,Catholic Charities,"));

        let contacts = fs::read_to_string(dir.path().join("contacts.csv")).unwrap();
        let lines: Vec<&str> = contacts.lines().collect();
        assert_eq!(
            lines[0],
            "Full Name*,Email*,Phone,Mobile,Address,Date of Birth,Position,Employee ID,Company,Department,Manager"
        );
        assert_eq!(lines[1], "Ana Garcia,garcia@unknown.com,555-1234,,,,,,Catholic Charities,,");
        assert_eq!(
            lines[2],
            "Luis Alvarez,luis@example.org,,,,1990-02-01,Teacher,E-77,,Education,M-3"
        );
        // Surname-only row still maps
        assert_eq!(lines[4], "NoFirst,nofirst@unknown.com,,,,,,,,,");
    }

    #[test]
    fn test_dedup_and_skip_log() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("roster.csv");
        let existing = dir.path().join("existing.csv");
        fs::write(&source, SOURCE).unwrap();
        fs::write(&existing, EXISTING).unwrap();

        let mut options = options_in(dir.path());
        options.existing_path = Some(existing);
        let report = transform_roster(&source, &options).unwrap();

        // Alvarez and Zamora rejected from both formats, Garcia survives
        assert_eq!(report.formats[0].written, 2);
        assert_eq!(report.formats[1].written, 2);
        assert_eq!(report.skipped, vec!["Alvarez".to_string(), "Zamora".to_string()]);

        let log = fs::read_to_string(&options.log_file).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Alvarez");
        assert_eq!(lines[2], "Zamora");
    }

    #[test]
    fn test_single_format_requested() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("roster.csv");
        fs::write(&source, SOURCE).unwrap();

        let mut options = options_in(dir.path());
        options.user_import_path = None;
        let report = transform_roster(&source, &options).unwrap();

        assert_eq!(report.formats.len(), 1);
        assert_eq!(report.formats[0].name, "contact-import");
        assert!(!dir.path().join("users.csv").exists());
        assert!(dir.path().join("contacts.csv").exists());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let options = TransformOptions::default();
        let result = transform_roster(Path::new("/nonexistent/roster.csv"), &options);
        assert!(result.is_err());
    }

    #[test]
    fn test_transform_bytes_with_bom_and_semicolons() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        options.user_import_path = None;

        let source = "\u{feff}name;lastname;email\nAna;Garcia;ana@example.org\n";
        let report = transform_bytes(source.as_bytes(), &options).unwrap();

        assert_eq!(report.csv_info.delimiter, ';');
        assert_eq!(report.formats[0].written, 1);

        let contacts = fs::read_to_string(dir.path().join("contacts.csv")).unwrap();
        assert!(contacts.lines().nth(1).unwrap().starts_with("Ana Garcia,ana@example.org"));
    }

    #[test]
    fn test_header_only_source_writes_header_only_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("roster.csv");
        fs::write(&source, "name,lastname\n").unwrap();

        let options = options_in(dir.path());
        let report = transform_roster(&source, &options).unwrap();

        assert_eq!(report.csv_info.row_count, 0);
        let users = fs::read_to_string(dir.path().join("users.csv")).unwrap();
        assert_eq!(users.lines().count(), 1);
    }
}
