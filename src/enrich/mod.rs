//! Derived per-node attributes.
//!
//! Attributes are a read-only view over a [`DependencyGraph`]: usage is the
//! current in-degree, label and position come from the node payload, and the
//! minimum Python version comes from an explicit [`VersionTable`].

mod versions;

use std::collections::HashMap;

use crate::graph::{DependencyGraph, Position};

pub use versions::{parse_min_version, VersionTable, DEFAULT_MIN_VERSION};

/// Attributes of a single node, ready for export or rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttributes {
    /// Display label (defaults to the node id).
    pub label: String,
    /// Layout coordinate (defaults to the origin).
    pub position: Position,
    /// Number of packages depending on this one.
    pub usage: usize,
    /// Minimum supported Python version (defaults to 3.0).
    pub min_version: f64,
}

impl NodeAttributes {
    /// Attributes for a node id with every field at its default.
    pub fn with_defaults(id: &str) -> Self {
        Self {
            label: id.to_string(),
            position: Position::default(),
            usage: 0,
            min_version: DEFAULT_MIN_VERSION,
        }
    }
}

/// Attribute map keyed by node id.
pub type AttributeMap = HashMap<String, NodeAttributes>;

/// Computes the attributes of every node of `graph`.
///
/// The graph is not modified. Version lookups use the node label.
///
/// # Example
///
/// ```rust
/// use depmap::enrich::{enrich, VersionTable};
/// use depmap::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.link("a", "b");
/// graph.link("b", "c");
///
/// let mut versions = VersionTable::new();
/// versions.insert("b", 3.8);
///
/// let attrs = enrich(&graph, &versions);
/// assert_eq!(attrs["a"].usage, 0);
/// assert_eq!(attrs["b"].usage, 1);
/// assert_eq!(attrs["b"].min_version, 3.8);
/// assert_eq!(attrs["c"].min_version, 3.0);
/// ```
pub fn enrich(graph: &DependencyGraph, versions: &VersionTable) -> AttributeMap {
    let inner = graph.inner();
    let mut attributes = HashMap::with_capacity(graph.node_count());

    for idx in inner.node_indices() {
        let node = &inner[idx];
        let label = node.display_label().to_string();
        let min_version = versions.min_version(&label);

        attributes.insert(
            node.name.clone(),
            NodeAttributes {
                position: node.position_or_origin(),
                usage: graph.in_degree_at(idx),
                min_version,
                label,
            },
        );
    }

    attributes
}
