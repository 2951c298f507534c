//! CSV to JSON parser with encoding and delimiter auto-detection.
//!
//! Converts roster rows into JSON objects keyed by column header. No
//! format-specific logic here; the mappers decide what the columns mean.

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows as JSON objects
    pub records: Vec<Value>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A leading UTF-8 BOM is stripped so exports from spreadsheet tools
/// parse the same as plain files.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            String::from_utf8_lossy(bytes).to_string()
        }
    };

    Ok(decoded.strip_prefix('\u{feff}').unwrap_or(&decoded).to_string())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

/// Parse CSV content into JSON objects with explicit delimiter.
///
/// Each row becomes a JSON object where keys are column headers. Rows
/// shorter than the header degrade to empty strings; extra cells are
/// ignored; fully blank rows are skipped.
///
/// # Example
/// ```ignore
/// use rosterload::csv_to_records;
///
/// let csv = "name,lastname\nAna,Garcia\nLuis,Reyes";
/// let rows = csv_to_records(csv, ',').unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0]["name"], "Ana");
/// assert_eq!(rows[0]["lastname"], "Garcia");
/// ```
pub fn csv_to_records(content: &str, delimiter: char) -> CsvResult<Vec<Value>> {
    Ok(parse_content(content, delimiter, "utf-8".to_string())?.records)
}

/// Parse CSV content with explicit delimiter and return metadata.
pub fn parse_content(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut raw_rows = reader.records();

    let header_record = match raw_rows.next() {
        Some(record) => record?,
        None => return Err(CsvError::EmptyFile),
    };

    let headers: Vec<String> = header_record.iter().map(normalize_header).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();

    for record in raw_rows {
        let record = record?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let raw_value = record.get(i).map(normalize_cell).unwrap_or_default();
            obj.insert(header.clone(), json!(raw_value));
        }

        records.push(Value::Object(obj));
    }

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("/path/to/roster.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.records.len());
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    parse_content(&content, delimiter, encoding)
}
