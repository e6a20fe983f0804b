//! Renderer boundary.
//!
//! The plot itself is drawn by an external charting library. This module
//! prepares what it needs, parallel per-node arrays of coordinates, marker
//! sizes, colors, labels and hover text, and hands them to a [`Renderer`].

mod plotly;

use std::io;

use crate::enrich::{AttributeMap, NodeAttributes};
use crate::graph::DependencyGraph;

pub use plotly::PlotlyJsonRenderer;

/// Smallest marker size drawn.
pub const DEFAULT_MIN_SIZE: f64 = 3.0;

/// Nodes with at least this many dependents get a visible text label.
pub const DEFAULT_LABEL_THRESHOLD: usize = 150;

/// Marker size for a node with `usage` dependents.
///
/// ```rust
/// use depmap::render::marker_size;
///
/// assert_eq!(marker_size(4, 3.0), 3.0);
/// assert_eq!(marker_size(400, 3.0), 20.0);
/// ```
pub fn marker_size(usage: usize, min_size: f64) -> f64 {
    (usage as f64).sqrt().max(min_size)
}

/// Options controlling frame construction.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Lower bound on marker size.
    pub min_size: f64,
    /// Usage needed before a node's label is drawn.
    pub label_threshold: usize,
    /// Plot title.
    pub title: String,
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            label_threshold: DEFAULT_LABEL_THRESHOLD,
            title: "Package Dependency Graph".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Parallel per-node arrays, ordered by ascending marker size so large
/// nodes are drawn last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub ids: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub size: Vec<f64>,
    pub color: Vec<f64>,
    pub text: Vec<String>,
    pub hover: Vec<String>,
}

impl RenderFrame {
    /// Builds a frame for every node of `graph`.
    ///
    /// Nodes missing from `attributes` are drawn with default attributes.
    pub fn build(graph: &DependencyGraph, attributes: &AttributeMap, options: &RenderOptions) -> Self {
        let mut rows: Vec<(&str, NodeAttributes, f64)> = graph
            .nodes()
            .map(|node| {
                let attrs = attributes
                    .get(&node.name)
                    .cloned()
                    .unwrap_or_else(|| NodeAttributes::with_defaults(&node.name));
                let size = marker_size(attrs.usage, options.min_size);
                (node.name.as_str(), attrs, size)
            })
            .collect();

        // Stable, so equal sizes keep graph order.
        rows.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut frame = Self::with_capacity(rows.len());
        for (id, attrs, size) in rows {
            let text = if attrs.usage >= options.label_threshold {
                attrs.label.clone()
            } else {
                String::new()
            };

            frame.ids.push(id.to_string());
            frame.x.push(attrs.position.x);
            frame.y.push(attrs.position.y);
            frame.size.push(size);
            frame.color.push(attrs.min_version);
            frame.hover.push(hover_text(&attrs.label, attrs.usage));
            frame.text.push(text);
        }
        frame
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            ids: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            size: Vec::with_capacity(n),
            color: Vec::with_capacity(n),
            text: Vec::with_capacity(n),
            hover: Vec::with_capacity(n),
        }
    }

    /// Number of points in the frame.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the frame has no points.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Hover text for one node, linking to its index page.
pub fn hover_text(label: &str, usage: usize) -> String {
    format!(
        "<b>{label}</b><br><br>Child Packages: {usage}<br>\
         <a href='https://pypi.org/project/{label}'>https://pypi.org/project/{label}</a>"
    )
}

/// Something that can draw a frame.
pub trait Renderer {
    /// Draw the frame.
    fn draw(&mut self, frame: &RenderFrame) -> io::Result<()>;
}
