//! Dependency graph implementation using petgraph.
//!
//! Provides a directed graph structure for modeling package dependencies,
//! keyed by canonical package name, with idempotent node and edge insertion.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// A 2-D layout coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Represents a node in the dependency graph.
///
/// The name is the canonical (lowercase) identifier. Label and position are
/// only set when a graph is imported from a laid-out document.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    /// Canonical package name (e.g., "numpy", "scikit-learn")
    pub name: String,
    /// Display label, if different from the name
    pub label: Option<String>,
    /// Layout coordinate assigned by an external layout pass
    pub position: Option<Position>,
}

impl PackageNode {
    /// Creates a new node with no label or position.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depmap::graph::PackageNode;
    ///
    /// let node = PackageNode::new("numpy");
    /// assert_eq!(node.name, "numpy");
    /// assert_eq!(node.display_label(), "numpy");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            position: None,
        }
    }

    /// Returns the label, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns the position, falling back to the origin.
    pub fn position_or_origin(&self) -> Position {
        self.position.unwrap_or_default()
    }
}

/// A directed graph representing package dependencies.
///
/// The graph uses petgraph's `DiGraph` internally, with nodes representing
/// packages and edges representing dependency relationships. Edges point
/// from the dependent package to its dependency.
///
/// Node and edge indices are assigned in insertion order, which makes
/// iteration order stable as long as the graph is not mutated.
///
/// # Example
///
/// ```rust
/// use depmap::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.link("pandas", "numpy");
/// graph.link("pandas", "python-dateutil");
/// graph.link("pandas", "numpy"); // already present, no-op
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.in_degree("numpy"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<PackageNode, ()>,
    /// Maps package names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depmap::graph::DependencyGraph;
    ///
    /// let graph = DependencyGraph::new();
    /// assert_eq!(graph.node_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of nodes
    /// * `edges` - Expected number of edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Registers a package as a node.
    ///
    /// If a node with the same name already exists, returns its existing
    /// index without modification.
    pub fn add_package(&mut self, name: &str) -> NodeIndex {
        self.add_node(PackageNode::new(name))
    }

    /// Inserts a fully populated node.
    ///
    /// An existing node with the same name is left untouched and its index
    /// returned.
    pub fn add_node(&mut self, node: PackageNode) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&node.name) {
            return idx;
        }

        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(name, idx);
        idx
    }

    /// Adds an edge between two existing packages.
    ///
    /// Creates an edge from `from` (the dependent) to `to` (the dependency).
    ///
    /// # Returns
    ///
    /// `true` if a new edge was added, `false` if either node doesn't exist
    /// or the edge is already present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depmap::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_package("pandas");
    /// graph.add_package("numpy");
    ///
    /// assert!(graph.add_edge("pandas", "numpy"));
    /// assert!(!graph.add_edge("pandas", "numpy")); // duplicate
    /// assert!(!graph.add_edge("nonexistent", "numpy"));
    /// ```
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        self.insert_edge(from_idx, to_idx)
    }

    /// Adds an edge, registering either endpoint that is not yet a node.
    ///
    /// Returns `true` if a new edge was added.
    pub fn link(&mut self, from: &str, to: &str) -> bool {
        let from_idx = self.add_package(from);
        let to_idx = self.add_package(to);
        self.insert_edge(from_idx, to_idx)
    }

    fn insert_edge(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        // petgraph allows parallel edges, so guard against them here.
        if self.graph.contains_edge(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// Gets a reference to a node by name.
    pub fn get_node(&self, name: &str) -> Option<&PackageNode> {
        self.node_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets a mutable reference to a node by name.
    pub fn get_node_mut(&mut self, name: &str) -> Option<&mut PackageNode> {
        self.node_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight_mut(idx))
    }

    /// Sets the layout position of a node.
    ///
    /// Returns `false` if the node doesn't exist.
    pub fn set_position(&mut self, name: &str, position: Position) -> bool {
        match self.get_node_mut(name) {
            Some(node) => {
                node.position = Some(position);
                true
            }
            None => false,
        }
    }

    /// Number of packages that depend on `name`.
    ///
    /// Always computed from the current edge set. Returns 0 for unknown names.
    pub fn in_degree(&self, name: &str) -> usize {
        self.node_indices
            .get(name)
            .map_or(0, |&idx| self.in_degree_at(idx))
    }

    pub(crate) fn in_degree_at(&self, idx: NodeIndex) -> usize {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .count()
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &PackageNode> + '_ {
        self.graph.node_weights()
    }

    /// Iterates over `(dependent, dependency)` name pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                self.graph[edge.target()].name.as_str(),
            )
        })
    }

    /// Checks whether the edge `from -> to` exists.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Looks up the arena index of a node.
    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    /// Borrow the underlying petgraph structure.
    pub fn inner(&self) -> &DiGraph<PackageNode, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_package_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let idx = graph.add_package("numpy");
        let idx2 = graph.add_package("numpy");

        assert_eq!(idx, idx2);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains("numpy"));
    }

    #[test]
    fn test_add_node_keeps_first_payload() {
        let mut graph = DependencyGraph::new();
        let mut first = PackageNode::new("numpy");
        first.label = Some("NumPy".to_string());
        graph.add_node(first);
        graph.add_node(PackageNode::new("numpy"));

        assert_eq!(graph.get_node("numpy").unwrap().display_label(), "NumPy");
    }

    #[test]
    fn test_add_edge_requires_nodes() {
        let mut graph = DependencyGraph::new();
        graph.add_package("pandas");
        graph.add_package("numpy");

        assert!(graph.add_edge("pandas", "numpy"));
        assert!(!graph.add_edge("nonexistent", "numpy"));
        assert!(!graph.add_edge("numpy", "nonexistent"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_edge_is_noop() {
        let mut graph = DependencyGraph::new();
        assert!(graph.link("pandas", "numpy"));
        assert!(!graph.link("pandas", "numpy"));
        assert!(!graph.add_edge("pandas", "numpy"));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_self_loop_collapses() {
        let mut graph = DependencyGraph::new();
        assert!(graph.link("weird", "weird"));
        assert!(!graph.link("weird", "weird"));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_reverse_edge_is_distinct() {
        let mut graph = DependencyGraph::new();
        graph.link("a", "b");
        graph.link("b", "a");

        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge("a", "b"));
        assert!(graph.contains_edge("b", "a"));
    }

    #[test]
    fn test_in_degree_chain() {
        let mut graph = DependencyGraph::new();
        graph.link("a", "b");
        graph.link("b", "c");

        assert_eq!(graph.in_degree("a"), 0);
        assert_eq!(graph.in_degree("b"), 1);
        assert_eq!(graph.in_degree("c"), 1);
        assert_eq!(graph.in_degree("missing"), 0);
    }

    #[test]
    fn test_in_degree_tracks_mutation() {
        let mut graph = DependencyGraph::new();
        graph.link("a", "c");
        assert_eq!(graph.in_degree("c"), 1);

        graph.link("b", "c");
        assert_eq!(graph.in_degree("c"), 2);
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.link("pandas", "numpy");
        graph.link("scipy", "numpy");

        let names: Vec<&str> = graph.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["pandas", "numpy", "scipy"]);

        let edges: Vec<(&str, &str)> = graph.edges().collect();
        assert_eq!(edges, vec![("pandas", "numpy"), ("scipy", "numpy")]);
    }

    #[test]
    fn test_set_position() {
        let mut graph = DependencyGraph::new();
        graph.add_package("numpy");

        assert!(graph.set_position("numpy", Position::new(1.5, -2.0)));
        assert!(!graph.set_position("missing", Position::default()));

        let node = graph.get_node("numpy").unwrap();
        assert_eq!(node.position_or_origin(), Position::new(1.5, -2.0));
    }

    #[test]
    fn test_default_position_is_origin() {
        let node = PackageNode::new("numpy");
        assert_eq!(node.position_or_origin(), Position::new(0.0, 0.0));
    }
}
