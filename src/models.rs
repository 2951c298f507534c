//! Domain configuration for the Rosterload transformation pipeline.
//!
//! This module contains the deployment-specific settings that drive the
//! format builders:
//!
//! - [`RosterConfig`] - Literals and mapping tables injected into both formats
//! - [`LanguageRule`] - One substring-match rule of the language classifier
//!
//! The defaults reproduce the values the roster exports were originally
//! generated with; callers can replace any of them without code changes.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default password written into every user-import row.
const DEFAULT_PASSWORD: &str = "2v4nddvG@!6sdlk8$3223cyfg$skldit";

/// Default country written into every user-import row.
const DEFAULT_COUNTRY: &str = "United States";

/// Domain used when synthesizing an email from a surname.
const DEFAULT_EMAIL_DOMAIN: &str = "@unknown.com";

/// Default skip-log filename, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "skipped_lastnames.log";

/// Known long-form company names and their short codes.
static DEFAULT_COMPANY_MAP: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(
        "Catholic Charities of Northeast Kansas".to_string(),
        "Catholic Charities".to_string(),
    );
    map.insert(
        "Latinx Education Collaborative (EducaTec)".to_string(),
        "LEC".to_string(),
    );
    map
});

// =============================================================================
// Language Rules
// =============================================================================

/// One rule of the language classifier.
///
/// A source value containing any of `needles` (case-insensitive) classifies
/// as `code` / `group`. Rules are checked in order; no match falls back to
/// the classifier defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRule {
    /// Substrings that trigger this rule.
    pub needles: Vec<String>,
    /// Language code written to the "Language" column.
    pub code: String,
    /// Group label written to the "Groups" column.
    pub group: String,
}

fn default_language_rules() -> Vec<LanguageRule> {
    vec![LanguageRule {
        needles: vec!["espanol".to_string(), "spanish".to_string()],
        code: "es".to_string(),
        group: "SpanishSpeakers".to_string(),
    }]
}

// =============================================================================
// Roster Configuration
// =============================================================================

/// Deployment-specific configuration injected into the format builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Password emitted in every user-import row.
    pub password: String,

    /// Country emitted in every user-import row.
    pub country: String,

    /// Domain appended when synthesizing an email from a surname.
    pub email_domain: String,

    /// Long-form company name to short code mapping. Unmapped names pass
    /// through trimmed.
    pub company_map: HashMap<String, String>,

    /// Substring rules for language classification.
    pub language_rules: Vec<LanguageRule>,

    /// Fallback language code when no rule matches.
    pub default_language_code: String,

    /// Fallback group label when no rule matches.
    pub default_language_group: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            company_map: DEFAULT_COMPANY_MAP.clone(),
            language_rules: default_language_rules(),
            default_language_code: "en".to_string(),
            default_language_group: "EnglishSpeakers".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
