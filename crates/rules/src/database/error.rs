//! Error types and load bookkeeping for the rule database.

use std::path::PathBuf;

/// Errors that can occur while loading rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Rule file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rule source is not valid JSON, or a record has the wrong shape.
    #[error("JSON parse error in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Rule source parsed, but the top-level value is not a list.
    #[error("Format error in {origin}: expected a list of rule records, found {found}")]
    Format { origin: String, found: &'static str },

    /// Rating label does not name any known rating.
    #[error("Unknown rating label: '{0}'")]
    UnknownRating(String),

    /// Source looked like a glob pattern but failed to compile.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A glob match could not be read.
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Result alias for rule loading.
pub type Result<T> = std::result::Result<T, RuleError>;

/// A rule file that was loaded into the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Number of records it contributed.
    pub records: usize,
}
