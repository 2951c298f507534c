//! Rosterload CLI - Transform a roster CSV into import tables
//!
//! ```bash
//! rosterload roster.csv users.csv contacts.csv existing.csv
//! rosterload roster.csv users.csv ''                # user import only
//! rosterload roster.csv '' contacts.csv existing.csv --log-file skips.log
//! ```
//!
//! Pass an empty string for an output you do not want to generate. The
//! skip log is only written when at least one surname was rejected.

use clap::Parser;
use rosterload::{transform_roster, TransformOptions, DEFAULT_LOG_FILE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rosterload")]
#[command(about = "Transform a roster CSV into user and contact import tables", long_about = None)]
struct Cli {
    /// Source roster CSV
    source: PathBuf,

    /// User-import output path; pass '' to skip this format
    user_import: String,

    /// Contact-import output path; pass '' to skip this format
    contact_import: String,

    /// Previously-exported roster used for surname deduplication
    existing: Option<PathBuf>,

    /// Skip-log output path
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let options = TransformOptions {
        user_import_path: non_empty(&cli.user_import),
        contact_import_path: non_empty(&cli.contact_import),
        existing_path: cli.existing,
        log_file: cli.log_file,
        config: Default::default(),
    };

    match transform_roster(&cli.source, &options) {
        Ok(report) => {
            if let Some(ref log_file) = report.log_file {
                println!(
                    "{} names skipped. See log file: {}",
                    report.skipped.len(),
                    log_file
                );
            }
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Treat an empty output path as "do not generate this format".
fn non_empty(path: &str) -> Option<PathBuf> {
    if path.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
