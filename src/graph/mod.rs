//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] struct, the streaming
//! [`GraphBuilder`] that fills it from package records, the noise filters
//! applied along the way, and weakly connected component extraction.
//!
//! # Example
//!
//! ```rust
//! use depmap::graph::{build, extract_component};
//! use depmap::parser::PackageRecord;
//!
//! let graph = build(vec![
//!     PackageRecord::new("pandas", ["numpy (>=1.16.0)"]),
//!     PackageRecord::new("flask", ["werkzeug"]),
//! ]);
//!
//! let numpy = extract_component(&graph, "numpy").unwrap();
//! assert_eq!(numpy.node_count(), 2);
//! assert_eq!(numpy.edge_count(), 1);
//! ```

mod builder;
mod component;
mod dependency_graph;
pub mod filter;

pub use builder::{build, build_from_reader, BuildOptions, BuildStats, GraphBuilder};
pub use component::{extract_component, GraphError};
pub use dependency_graph::{DependencyGraph, PackageNode, Position};
pub use filter::{has_dependencies, has_digit, is_spam_name, SkipReason};
