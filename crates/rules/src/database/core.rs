//! [`RuleDatabase`] and its loading-phase [`RuleDatabaseBuilder`].

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use serde_json::Value;
use tracing::{debug, info};

use crate::rating::Rating;
use crate::schema::RuleRecord;
use crate::tagmap::TagMap;

use super::error::{LoadedFile, Result, RuleError};

/// Immutable rule index built by [`RuleDatabase::load`] or a
/// [`RuleDatabaseBuilder`].
///
/// Maps each exact tag mapping that appeared in a rule record to the set of
/// ratings assigned to it, and remembers every tag name any record used.
#[derive(Debug, Default)]
pub struct RuleDatabase {
    /// Exact tag mapping → ratings of all records with that mapping.
    index: HashMap<TagMap, BTreeSet<Rating>>,
    /// Every tag name seen in any record.
    vocabulary: BTreeSet<String>,
    record_count: usize,
    files: Vec<LoadedFile>,
}

impl RuleDatabase {
    /// Load rules from file paths and glob patterns, in order.
    ///
    /// Fails on the first unreadable file, malformed source or unknown rating
    /// label. No partial database is returned.
    pub fn load<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = RuleDatabaseBuilder::new();
        for source in sources {
            builder.add_source(source.as_ref())?;
        }
        let database = builder.build();
        info!(
            files = database.files.len(),
            records = database.record_count,
            keys = database.index.len(),
            vocabulary = ?database.vocabulary,
            "loaded quality rating rules"
        );
        Ok(database)
    }

    /// Database with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ratings attached to exactly this tag mapping.
    pub fn ratings(&self, tags: &TagMap) -> Option<&BTreeSet<Rating>> {
        self.index.get(tags)
    }

    /// Every indexed tag mapping with its ratings, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&TagMap, &BTreeSet<Rating>)> {
        self.index.iter()
    }

    /// Tag names referenced by any rule.
    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    /// Number of distinct tag mappings in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of records ingested, duplicates included.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Files loaded, in load order.
    pub fn files(&self) -> &[LoadedFile] {
        &self.files
    }
}

/// Parsed records of one source, not yet inserted.
type Entries = Vec<(TagMap, Rating)>;

/// Accumulates rule records before freezing them into a [`RuleDatabase`].
///
/// Each `add_*` call is all-or-nothing for its own input: a file, a glob
/// pattern or a JSON text with one bad record contributes nothing.
#[derive(Debug, Default)]
pub struct RuleDatabaseBuilder {
    database: RuleDatabase,
}

impl RuleDatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file path or a glob pattern.
    ///
    /// Patterns expand to zero or more files (`**` recurses). A wildcard never
    /// matches a leading dot, so hidden files need the dot spelled out.
    /// Directories matched by a pattern are skipped.
    pub fn add_source(&mut self, source: &str) -> Result<&mut Self> {
        if !has_magic(source) {
            return self.add_file(Path::new(source));
        }

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut pending = Vec::new();
        for entry in glob::glob_with(source, options)? {
            let path = entry?;
            if path.is_dir() {
                debug!(pattern = %source, path = %path.display(), "skipping directory match");
                continue;
            }
            debug!(pattern = %source, path = %path.display(), "expanded rule source");
            let entries = read_file(&path)?;
            pending.push((path, entries));
        }

        for (path, entries) in pending {
            self.commit_file(path, entries);
        }
        Ok(self)
    }

    /// Read and add one rule file.
    pub fn add_file(&mut self, path: &Path) -> Result<&mut Self> {
        let entries = read_file(path)?;
        self.commit_file(path.to_path_buf(), entries);
        Ok(self)
    }

    /// Add rules from JSON text. `origin` names the source in errors.
    pub fn add_json(&mut self, origin: &str, text: &str) -> Result<&mut Self> {
        for (tags, rating) in parse_json(origin, text)? {
            self.insert(tags, rating);
        }
        Ok(self)
    }

    /// Add one record.
    pub fn add_record(&mut self, record: RuleRecord) -> Result<&mut Self> {
        let rating = record.rating()?;
        self.insert(record.tag_map(), rating);
        Ok(self)
    }

    /// Freeze the accumulated rules.
    pub fn build(self) -> RuleDatabase {
        self.database
    }

    fn commit_file(&mut self, path: PathBuf, entries: Entries) {
        let records = entries.len();
        for (tags, rating) in entries {
            self.insert(tags, rating);
        }
        info!(path = %path.display(), records, "loaded rule file");
        self.database.files.push(LoadedFile { path, records });
    }

    fn insert(&mut self, tags: TagMap, rating: Rating) {
        let database = &mut self.database;
        database
            .vocabulary
            .extend(tags.keys().map(str::to_string));
        database.index.entry(tags).or_default().insert(rating);
        database.record_count += 1;
    }
}

fn read_file(path: &Path) -> Result<Entries> {
    let contents = fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&path.display().to_string(), &contents)
}

/// Parse and validate every record of a source.
fn parse_json(origin: &str, text: &str) -> Result<Entries> {
    let value: Value = serde_json::from_str(text).map_err(|source| RuleError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(RuleError::Format {
                origin: origin.to_string(),
                found: json_kind(&other),
            })
        }
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        let record: RuleRecord = serde_json::from_value(entry).map_err(|source| RuleError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        parsed.push((record.tag_map(), record.rating()?));
    }
    Ok(parsed)
}

/// True when the source contains glob metacharacters.
fn has_magic(source: &str) -> bool {
    source.contains(['*', '?', '['])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
