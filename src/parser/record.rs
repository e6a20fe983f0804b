//! Reader for the newline-delimited package metadata dump.
//!
//! Every line holds one JSON object describing a package:
//!
//! ```json
//! {"name": "pandas", "requires_dist": ["numpy (>=1.16.0)"], "requires_python": ">=3.8"}
//! ```
//!
//! Missing or `null` fields are tolerated and left for the graph builder to
//! judge. A line that is not valid JSON aborts the whole read.

use std::io::{BufRead, Lines};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Errors that can occur while reading package records.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read from the underlying source.
    #[error("Failed to read records: {0}")]
    IoError(#[from] std::io::Error),

    /// A line could not be parsed as a package record.
    #[error("Failed to parse JSON on line {line}: {source}")]
    JsonError {
        /// 1-based line number of the offending line.
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// One package entry of the metadata dump.
///
/// Fields of the wrong JSON type read as absent; non-string entries of
/// `requires_dist` are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name as published (any case).
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Raw requirement strings, e.g. `"numpy (>=1.16.0)"`.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub requires_dist: Option<Vec<String>>,

    /// Supported interpreter constraint, e.g. `">=3.8"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub requires_python: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    }))
}

impl PackageRecord {
    /// Creates a record with a name and requirement strings.
    pub fn new<I, S>(name: impl Into<String>, requires_dist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            requires_dist: Some(requires_dist.into_iter().map(Into::into).collect()),
            requires_python: None,
        }
    }

    /// Sets the `requires_python` constraint.
    pub fn with_requires_python(mut self, constraint: impl Into<String>) -> Self {
        self.requires_python = Some(constraint.into());
        self
    }

    /// Returns the requirement strings, treating a missing list as empty.
    pub fn requirements(&self) -> &[String] {
        self.requires_dist.as_deref().unwrap_or_default()
    }
}

/// Parses a single JSON line into a [`PackageRecord`].
///
/// Only a line that is not JSON at all is an error. Valid JSON that is not
/// an object yields an empty record, which the graph builder then skips.
///
/// # Example
///
/// ```
/// use depmap::parser::parse_record;
///
/// let record = parse_record(r#"{"name": "pandas", "requires_dist": ["numpy"]}"#).unwrap();
/// assert_eq!(record.name.as_deref(), Some("pandas"));
/// assert_eq!(record.requirements().len(), 1);
/// ```
pub fn parse_record(line: &str) -> Result<PackageRecord, serde_json::Error> {
    let value: Value = serde_json::from_str(line)?;
    if !value.is_object() {
        debug!("record is not a JSON object");
        return Ok(PackageRecord::default());
    }
    serde_json::from_value(value)
}

/// Streaming iterator over the records of a JSONL source.
///
/// Blank lines are skipped. The first malformed line is yielded as an error;
/// callers are expected to stop there.
pub struct RecordReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> RecordReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = ParseResult<PackageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let line_no = self.line_no;
            return Some(parse_record(&line).map_err(|source| ParseError::JsonError {
                line: line_no,
                source,
            }));
        }
    }
}
