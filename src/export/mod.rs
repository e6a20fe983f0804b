//! Graph interchange: export to and import from on-disk documents.
//!
//! A graph is first flattened into an [`InterchangeDocument`] (node and
//! edge records), which is then written by an [`Exporter`] in one of the
//! supported formats. Importing goes the other way: a format reader produces
//! a document, and [`import`] rebuilds the graph and its node positions.

pub mod gexf;
pub mod json;

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::enrich::AttributeMap;
use crate::graph::{DependencyGraph, PackageNode, Position};

/// Errors that can occur while reading or writing interchange documents.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failed to read or write the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to encode or decode JSON.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode or decode XML.
    #[error("Failed to process XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An XML attribute could not be parsed.
    #[error("Invalid XML attribute: {0}")]
    InvalidAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// The document is structurally invalid.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// An edge references a node that the document never declares.
    #[error("Malformed document: edge references undeclared node '{0}'")]
    UndeclaredNode(String),
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Serialized form of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub usage: usize,
}

impl NodeRecord {
    /// A record for `id` with default label, origin position and zero usage.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            x: 0.0,
            y: 0.0,
            usage: 0,
        }
    }
}

/// Serialized form of an edge, `source` depending on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
}

/// Flattened graph, fully materialized before it is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterchangeDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// How [`import`] treats edges whose endpoints are not declared as nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Register the missing endpoint with default attributes.
    #[default]
    AutoRegister,
    /// Fail with [`CodecError::UndeclaredNode`].
    Reject,
}

/// Flattens a graph and its attributes into a document.
///
/// Nodes and edges follow the graph's iteration order. Nodes missing from
/// `attributes` are exported with values derived from the graph itself.
///
/// # Example
///
/// ```rust
/// use depmap::enrich::{enrich, VersionTable};
/// use depmap::export::export;
/// use depmap::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.link("pandas", "numpy");
///
/// let doc = export(&graph, &enrich(&graph, &VersionTable::new()));
/// assert_eq!(doc.nodes.len(), 2);
/// assert_eq!(doc.nodes[1].usage, 1);
/// assert_eq!(doc.edges[0].source, "pandas");
/// ```
pub fn export(graph: &DependencyGraph, attributes: &AttributeMap) -> InterchangeDocument {
    let nodes = graph
        .nodes()
        .map(|node| match attributes.get(&node.name) {
            Some(attrs) => NodeRecord {
                id: node.name.clone(),
                label: attrs.label.clone(),
                x: attrs.position.x,
                y: attrs.position.y,
                usage: attrs.usage,
            },
            None => {
                let position = node.position_or_origin();
                NodeRecord {
                    id: node.name.clone(),
                    label: node.display_label().to_string(),
                    x: position.x,
                    y: position.y,
                    usage: graph.in_degree(&node.name),
                }
            }
        })
        .collect();

    let edges = graph
        .edges()
        .map(|(source, target)| EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
        })
        .collect();

    InterchangeDocument { nodes, edges }
}

/// Rebuilds a graph from a document.
///
/// Nodes are inserted first with their label and position, then edges.
/// A repeated node id keeps its first record. The returned map holds the
/// position of every declared node.
///
/// # Errors
///
/// With [`EdgePolicy::Reject`], returns [`CodecError::UndeclaredNode`] for
/// the first edge endpoint that is not declared.
pub fn import(
    document: &InterchangeDocument,
    policy: EdgePolicy,
) -> CodecResult<(DependencyGraph, HashMap<String, Position>)> {
    let mut graph = DependencyGraph::with_capacity(document.nodes.len(), document.edges.len());
    let mut positions = HashMap::with_capacity(document.nodes.len());

    for record in &document.nodes {
        if graph.contains(&record.id) {
            warn!(id = %record.id, "duplicate node record ignored");
            continue;
        }

        let position = Position::new(record.x, record.y);
        let label = (!record.label.is_empty()).then(|| record.label.clone());
        graph.add_node(PackageNode {
            name: record.id.clone(),
            label,
            position: Some(position),
        });
        positions.insert(record.id.clone(), position);
    }

    for edge in &document.edges {
        for endpoint in [&edge.source, &edge.target] {
            if graph.contains(endpoint) {
                continue;
            }
            match policy {
                EdgePolicy::Reject => return Err(CodecError::UndeclaredNode(endpoint.clone())),
                EdgePolicy::AutoRegister => {
                    warn!(id = %endpoint, "registering undeclared edge endpoint");
                    graph.add_package(endpoint);
                }
            }
        }
        graph.add_edge(&edge.source, &edge.target);
    }

    Ok((graph, positions))
}

/// Interchange file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `{"nodes": [...], "edges": [...]}` document
    Json,
    /// GEXF 1.3 with `viz` layout attributes
    Gexf,
}

impl ExportFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "gexf" => Ok(ExportFormat::Gexf),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, gexf",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Gexf => write!(f, "gexf"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Write the document to the given writer.
    fn export<W: Write>(&self, document: &InterchangeDocument, writer: &mut W) -> CodecResult<()>;
}

/// Write a document in the specified format.
pub fn write_document<W: Write>(
    format: ExportFormat,
    document: &InterchangeDocument,
    writer: &mut W,
) -> CodecResult<()> {
    match format {
        ExportFormat::Json => json::JsonExporter::default().export(document, writer),
        ExportFormat::Gexf => gexf::GexfExporter.export(document, writer),
    }
}

/// Read a document in the specified format.
pub fn read_document<R: BufRead>(format: ExportFormat, reader: R) -> CodecResult<InterchangeDocument> {
    match format {
        ExportFormat::Json => json::read_json(reader),
        ExportFormat::Gexf => gexf::read_gexf(reader),
    }
}
