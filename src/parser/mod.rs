//! Parser module for package index metadata.
//!
//! This module turns the raw metadata dump into typed records and reduces
//! free-form requirement strings to canonical package names.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use depmap::parser::{normalize, RecordReader};
//!
//! let input = r#"{"name": "pandas", "requires_dist": ["numpy (>=1.16.0)"]}"#;
//! let record = RecordReader::new(Cursor::new(input)).next().unwrap().unwrap();
//!
//! let deps: Vec<_> = record.requirements().iter().filter_map(|r| normalize(r)).collect();
//! assert_eq!(deps, vec!["numpy".to_string()]);
//! ```

pub mod record;
pub mod requirement;

pub use record::{parse_record, PackageRecord, ParseError, ParseResult, RecordReader};
pub use requirement::normalize;
