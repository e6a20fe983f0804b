//! Streaming construction of the dependency graph from package records.

use std::collections::HashMap;
use std::io::BufRead;

use tracing::{debug, info};

use super::filter::{self, SkipReason, Verdict};
use super::DependencyGraph;
use crate::parser::{normalize, PackageRecord, ParseResult, RecordReader};

/// Options controlling a build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Stop after this many input records. `None` or `Some(0)` reads
    /// everything.
    pub max_records: Option<usize>,
}

/// Counters collected while building a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records pulled from the input.
    pub records_read: usize,
    /// Records that contributed a source node.
    pub records_kept: usize,
    /// Records dropped, per reason.
    pub skipped: HashMap<SkipReason, usize>,
    /// Requirement strings that normalized to nothing.
    pub dropped_requirements: usize,
    /// Distinct edges added.
    pub edges_added: usize,
}

impl BuildStats {
    /// Number of records skipped for `reason`.
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    /// Total number of skipped records.
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Incrementally builds a [`DependencyGraph`] from package records.
///
/// # Example
///
/// ```rust
/// use depmap::graph::GraphBuilder;
/// use depmap::parser::PackageRecord;
///
/// let mut builder = GraphBuilder::new();
/// builder.add_record(&PackageRecord::new("pandas", ["numpy (>=1.16.0)"]));
/// builder.add_record(&PackageRecord::new("cash4u", ["numpy"]));
///
/// let (graph, stats) = builder.finish();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(stats.records_kept, 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DependencyGraph,
    options: BuildOptions,
    stats: BuildStats,
}

impl GraphBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given options.
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Returns true once the record limit has been reached.
    pub fn is_saturated(&self) -> bool {
        self.options
            .max_records
            .is_some_and(|max| max > 0 && self.stats.records_read >= max)
    }

    /// Feeds one record through the filters and into the graph.
    ///
    /// Returns the skip reason if the record was dropped.
    pub fn add_record(&mut self, record: &PackageRecord) -> Option<SkipReason> {
        self.stats.records_read += 1;

        let name = match filter::check(record) {
            Verdict::Keep(name) => name.to_lowercase(),
            Verdict::Skip(reason) => {
                *self.stats.skipped.entry(reason).or_default() += 1;
                return Some(reason);
            }
        };

        self.graph.add_package(&name);
        self.stats.records_kept += 1;

        for raw in record.requirements() {
            match normalize(raw) {
                Some(dependency) => {
                    if self.graph.link(&name, &dependency) {
                        self.stats.edges_added += 1;
                    }
                }
                None => {
                    debug!(package = %name, requirement = %raw, "dropped unparsable requirement");
                    self.stats.dropped_requirements += 1;
                }
            }
        }

        None
    }

    /// Consumes the builder, returning the graph and its statistics.
    pub fn finish(self) -> (DependencyGraph, BuildStats) {
        info!(
            records = self.stats.records_read,
            kept = self.stats.records_kept,
            skipped = self.stats.total_skipped(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "dependency graph built"
        );
        (self.graph, self.stats)
    }
}

/// Builds a graph from an in-memory sequence of records.
///
/// # Example
///
/// ```rust
/// use depmap::graph::build;
/// use depmap::parser::PackageRecord;
///
/// let graph = build(vec![
///     PackageRecord::new("numpy", Vec::<String>::new()),
///     PackageRecord::new("pandas", ["numpy (>=1.16.0)"]),
/// ]);
/// assert!(graph.contains_edge("pandas", "numpy"));
/// ```
pub fn build<I>(records: I) -> DependencyGraph
where
    I: IntoIterator<Item = PackageRecord>,
{
    let mut builder = GraphBuilder::new();
    for record in records {
        builder.add_record(&record);
    }
    builder.finish().0
}

/// Builds a graph from a JSONL source.
///
/// # Errors
///
/// Fails on the first malformed line or read error; no partial graph is
/// returned.
pub fn build_from_reader<R: BufRead>(
    reader: R,
    options: BuildOptions,
) -> ParseResult<(DependencyGraph, BuildStats)> {
    let mut builder = GraphBuilder::with_options(options);

    let mut records = RecordReader::new(reader);

    while !builder.is_saturated() {
        let Some(record) = records.next() else {
            break;
        };
        builder.add_record(&record?);
    }

    Ok(builder.finish())
}
