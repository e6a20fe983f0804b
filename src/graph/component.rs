//! Weakly connected component extraction.
//!
//! Connectivity ignores edge direction: `A -> B` links A and B both ways.
//! The traversal walks petgraph's adjacency lists directly through
//! `neighbors_undirected`, so no undirected copy of the graph is built.

use std::collections::VecDeque;

use petgraph::visit::{EdgeRef, VisitMap, Visitable};
use tracing::debug;

use super::DependencyGraph;

/// Errors raised by graph queries.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    /// The requested seed package is not a node of the graph.
    #[error("seed package '{0}' not found in graph")]
    SeedNotFound(String),
}

/// Returns the subgraph induced on the weakly connected component of `seed`.
///
/// Node order, edge direction and node payloads (label, position) are
/// preserved from the source graph.
///
/// # Errors
///
/// Returns [`GraphError::SeedNotFound`] if `seed` is not a node.
///
/// # Example
///
/// ```rust
/// use depmap::graph::{extract_component, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.link("pandas", "numpy");
/// graph.link("flask", "werkzeug");
///
/// let component = extract_component(&graph, "numpy").unwrap();
/// assert_eq!(component.node_count(), 2);
/// assert!(component.contains("pandas"));
/// assert!(!component.contains("flask"));
/// ```
pub fn extract_component(graph: &DependencyGraph, seed: &str) -> Result<DependencyGraph, GraphError> {
    let start = graph
        .index_of(seed)
        .ok_or_else(|| GraphError::SeedNotFound(seed.to_string()))?;
    let inner = graph.inner();

    let mut seen = inner.visit_map();
    let mut queue = VecDeque::new();
    seen.visit(start);
    queue.push_back(start);
    let mut reached = 1usize;

    while let Some(idx) = queue.pop_front() {
        for next in inner.neighbors_undirected(idx) {
            if seen.visit(next) {
                reached += 1;
                queue.push_back(next);
            }
        }
    }

    let mut component = DependencyGraph::with_capacity(reached, reached);
    for idx in inner.node_indices().filter(|idx| seen.is_visited(idx)) {
        component.add_node(inner[idx].clone());
    }
    // Both endpoints of an edge share a component, so checking one suffices.
    for edge in inner
        .edge_references()
        .filter(|edge| seen.is_visited(&edge.source()))
    {
        component.add_edge(&inner[edge.source()].name, &inner[edge.target()].name);
    }

    debug!(
        seed,
        nodes = component.node_count(),
        edges = component.edge_count(),
        "extracted component"
    );

    Ok(component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Position;

    fn two_components() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.link("a", "b");
        graph.link("b", "a");
        graph.link("c", "d");
        graph.link("d", "c");
        graph
    }

    #[test]
    fn test_extract_disjoint_components() {
        let graph = two_components();
        let component = extract_component(&graph, "a").unwrap();

        let names: Vec<&str> = component.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(component.edge_count(), 2);
        assert!(!component.contains("c"));
    }

    #[test]
    fn test_seed_not_found() {
        let graph = two_components();
        assert_eq!(
            extract_component(&graph, "z").unwrap_err(),
            GraphError::SeedNotFound("z".to_string())
        );
    }

    #[test]
    fn test_traverses_against_edge_direction() {
        let mut graph = DependencyGraph::new();
        // pandas and scipy are only linked through their shared dependency.
        graph.link("pandas", "numpy");
        graph.link("scipy", "numpy");
        graph.link("seaborn", "pandas");
        graph.link("flask", "click");

        let component = extract_component(&graph, "scipy").unwrap();
        assert_eq!(component.node_count(), 4);
        assert!(component.contains("seaborn"));
        assert!(!component.contains("flask"));
        assert!(component.contains_edge("seaborn", "pandas"));
        assert!(!component.contains_edge("pandas", "seaborn"));
    }

    #[test]
    fn test_isolated_seed() {
        let mut graph = DependencyGraph::new();
        graph.add_package("alone");
        graph.link("x", "y");

        let component = extract_component(&graph, "alone").unwrap();
        assert_eq!(component.node_count(), 1);
        assert_eq!(component.edge_count(), 0);
    }

    #[test]
    fn test_preserves_node_payloads() {
        let mut graph = two_components();
        graph.set_position("b", Position::new(3.0, 4.0));
        graph.get_node_mut("b").unwrap().label = Some("B".to_string());

        let component = extract_component(&graph, "a").unwrap();
        let node = component.get_node("b").unwrap();
        assert_eq!(node.display_label(), "B");
        assert_eq!(node.position, Some(Position::new(3.0, 4.0)));
    }

    #[test]
    fn test_self_loop_in_component() {
        let mut graph = DependencyGraph::new();
        graph.link("a", "a");
        graph.link("a", "b");

        let component = extract_component(&graph, "b").unwrap();
        assert_eq!(component.edge_count(), 2);
        assert!(component.contains_edge("a", "a"));
    }
}
