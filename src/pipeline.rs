//! End-to-end runs wiring the stages together.
//!
//! Each function is one batch job: it reads its inputs from disk, runs the
//! stages in order and writes a single output file. Any failure aborts the
//! run; nothing is checkpointed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::enrich::{enrich, VersionTable};
use crate::export::{self, EdgePolicy, ExportFormat, InterchangeDocument};
use crate::graph::{self, BuildOptions, BuildStats, DependencyGraph};
use crate::render::{PlotlyJsonRenderer, RenderFrame, RenderOptions, Renderer};

/// Summary of a build run.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub stats: BuildStats,
    pub full_nodes: usize,
    pub full_edges: usize,
    pub component_nodes: usize,
    pub component_edges: usize,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Builds the full graph from a JSONL dump and extracts the seed's component.
#[instrument(skip(options))]
pub fn build_component(
    input: &Path,
    seed: &str,
    options: BuildOptions,
) -> Result<(DependencyGraph, BuildSummary)> {
    let (full, stats) = graph::build_from_reader(open(input)?, options)
        .with_context(|| format!("Failed to build graph from {}", input.display()))?;
    let component = graph::extract_component(&full, seed)?;

    let summary = BuildSummary {
        stats,
        full_nodes: full.node_count(),
        full_edges: full.edge_count(),
        component_nodes: component.node_count(),
        component_edges: component.edge_count(),
    };
    info!(
        seed,
        nodes = summary.component_nodes,
        edges = summary.component_edges,
        "component extracted"
    );

    Ok((component, summary))
}

/// Builds the seed's component and writes it for an external layout tool.
#[instrument(skip(options))]
pub fn run_build(
    input: &Path,
    seed: &str,
    output: &Path,
    format: ExportFormat,
    options: BuildOptions,
) -> Result<BuildSummary> {
    let (component, summary) = build_component(input, seed, options)?;

    let attributes = enrich(&component, &VersionTable::new());
    let document = export::export(&component, &attributes);
    write_document(output, format, &document)?;

    Ok(summary)
}

/// Loads a laid-out graph, recomputes usage and writes the JSON document.
#[instrument]
pub fn run_export(input: &Path, output: &Path, policy: EdgePolicy) -> Result<InterchangeDocument> {
    let graph = load_graph(input, policy)?;

    let attributes = enrich(&graph, &VersionTable::new());
    let document = export::export(&graph, &attributes);
    write_document(output, ExportFormat::Json, &document)?;

    Ok(document)
}

/// Loads a laid-out graph, enriches it and writes a Plotly figure.
#[instrument(skip(options))]
pub fn run_render(
    input: &Path,
    versions: Option<&Path>,
    output: &Path,
    options: RenderOptions,
    policy: EdgePolicy,
) -> Result<RenderFrame> {
    let graph = load_graph(input, policy)?;

    let table = match versions {
        Some(path) => VersionTable::from_reader(open(path)?)
            .with_context(|| format!("Failed to load version table {}", path.display()))?,
        None => VersionTable::new(),
    };

    let attributes = enrich(&graph, &table);
    let frame = RenderFrame::build(&graph, &attributes, &options);

    let mut renderer = PlotlyJsonRenderer::new(create(output)?, options);
    renderer
        .draw(&frame)
        .with_context(|| format!("Failed to write figure to {}", output.display()))?;
    info!(points = frame.len(), output = %output.display(), "figure written");

    Ok(frame)
}

/// Reads a graph document, picking the format from the file extension
/// (GEXF when unknown).
pub fn load_graph(input: &Path, policy: EdgePolicy) -> Result<DependencyGraph> {
    let format = ExportFormat::from_path(input).unwrap_or(ExportFormat::Gexf);
    let document = export::read_document(format, open(input)?)
        .with_context(|| format!("Failed to read {} document {}", format, input.display()))?;
    let (graph, _) = export::import(&document, policy)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

fn write_document(output: &Path, format: ExportFormat, document: &InterchangeDocument) -> Result<()> {
    let mut writer = create(output)?;
    export::write_document(format, document, &mut writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    writer.flush()?;

    info!(
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        %format,
        output = %output.display(),
        "document written"
    );
    Ok(())
}
