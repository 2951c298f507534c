//! Output file writing.
//!
//! Emits the fixed-header delimited tables and the plain-text skip log.
//! Quoting is minimal: cells are quoted only when they contain the
//! delimiter, a quote, or a line break.

use std::path::Path;

use crate::dedup::SkipLog;
use crate::error::{PipelineError, PipelineResult};

/// Write one output table: header row then data rows.
pub fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> PipelineResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .map_err(|e| output_error(path, e))?;

    writer.write_record(headers).map_err(|e| output_error(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| output_error(path, e))?;
    }
    writer.flush().map_err(|e| output_error(path, e))?;

    Ok(())
}

/// Write the skip log: banner line plus one surname per line.
pub fn write_skip_log(path: &Path, log: &SkipLog) -> PipelineResult<()> {
    std::fs::write(path, log.render()).map_err(|e| output_error(path, e))
}

fn output_error(path: &Path, e: impl std::fmt::Display) -> PipelineError {
    PipelineError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_write_table_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let headers = vec!["Full Name*".to_string(), "Address".to_string()];
        let rows = vec![
            vec!["Ana Garcia".to_string(), "12 Oak St, Topeka".to_string()],
            vec!["Luis Reyes".to_string(), String::new()],
        ];
        write_table(&path, &headers, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Full Name*,Address");
        // Embedded delimiter forces quoting; plain cells stay bare
        assert_eq!(lines[1], "Ana Garcia,\"12 Oak St, Topeka\"");
        assert_eq!(lines[2], "Luis Reyes,");
    }

    #[test]
    fn test_write_skip_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipped.log");

        let mut log = SkipLog::new();
        let names: BTreeSet<String> =
            ["Zamora".to_string(), "Alvarez".to_string()].into_iter().collect();
        log.extend(names);
        write_skip_log(&path, &log).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Alvarez");
        assert_eq!(lines[2], "Zamora");
    }

    #[test]
    fn test_write_table_unwritable_path_errors() {
        let path = Path::new("/nonexistent-dir/out.csv");
        let result = write_table(path, &["A".to_string()], &[]);
        assert!(matches!(result, Err(PipelineError::OutputError { .. })));
    }
}
