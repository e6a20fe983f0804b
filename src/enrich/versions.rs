//! Minimum supported Python version lookup.
//!
//! The table is built from the same kind of JSONL dump as the graph: each
//! record's `requires_python` constraint is searched for a `>=MAJOR.MINOR`
//! bound. Records without such a bound contribute nothing.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::parser::{PackageRecord, ParseResult, RecordReader};

/// Version assumed for packages with no usable constraint.
pub const DEFAULT_MIN_VERSION: f64 = 3.0;

fn lower_bound_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r">=(\d+\.\d+)").ok())
        .as_ref()
}

/// Extracts the first `>=MAJOR.MINOR` bound of a constraint as a float.
///
/// `"3.10"` parses as `3.1`, matching the way the values are plotted.
///
/// ```rust
/// use depmap::enrich::parse_min_version;
///
/// assert_eq!(parse_min_version(">=3.8"), Some(3.8));
/// assert_eq!(parse_min_version(">=2.7, !=3.0.*"), Some(2.7));
/// assert_eq!(parse_min_version("~=3.9"), None);
/// ```
pub fn parse_min_version(constraint: &str) -> Option<f64> {
    lower_bound_pattern()?
        .captures(constraint)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Package name to minimum supported Python version.
///
/// Keys are package names exactly as published; lookups are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    versions: HashMap<String, f64>,
}

impl VersionTable {
    /// Creates an empty table. Every lookup yields the default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the minimum version for `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, version: f64) {
        self.versions.insert(name.into(), version);
    }

    /// Adds the record's bound if it has a name and a `>=` constraint.
    ///
    /// Returns true if an entry was written.
    pub fn add_record(&mut self, record: &PackageRecord) -> bool {
        let (Some(name), Some(constraint)) = (&record.name, &record.requires_python) else {
            return false;
        };
        match parse_min_version(constraint) {
            Some(version) => {
                self.insert(name.clone(), version);
                true
            }
            None => false,
        }
    }

    /// Builds a table from a JSONL source.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line or read error.
    pub fn from_reader<R: BufRead>(reader: R) -> ParseResult<Self> {
        let mut table = Self::new();
        for record in RecordReader::new(reader) {
            table.add_record(&record?);
        }
        debug!(entries = table.len(), "version table loaded");
        Ok(table)
    }

    /// Exact lookup.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.versions.get(label).copied()
    }

    /// Lookup falling back to [`DEFAULT_MIN_VERSION`].
    pub fn min_version(&self, label: &str) -> f64 {
        self.get(label).unwrap_or(DEFAULT_MIN_VERSION)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl FromIterator<PackageRecord> for VersionTable {
    fn from_iter<I: IntoIterator<Item = PackageRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.add_record(&record);
        }
        table
    }
}
