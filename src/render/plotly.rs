//! Plotly figure output.
//!
//! Writes a figure document (`{"data": [...], "layout": {...}}`) that
//! `plotly.io.from_json` or `Plotly.newPlot` can display. The trace is a
//! WebGL scatter so graphs with 10^5 nodes stay interactive.

use std::io::{self, Write};

use serde_json::json;

use super::{RenderFrame, RenderOptions, Renderer};

/// Renderer that writes a Plotly figure as JSON.
pub struct PlotlyJsonRenderer<W> {
    writer: W,
    options: RenderOptions,
}

impl<W: Write> PlotlyJsonRenderer<W> {
    /// Creates a renderer writing to `writer`.
    pub fn new(writer: W, options: RenderOptions) -> Self {
        Self { writer, options }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn figure(&self, frame: &RenderFrame) -> serde_json::Value {
        json!({
            "data": [{
                "type": "scattergl",
                "mode": "markers+text",
                "x": frame.x,
                "y": frame.y,
                "text": frame.text,
                "hovertext": frame.hover,
                "hoverinfo": "text",
                "textposition": "middle center",
                "textfont": { "size": 5, "color": "black" },
                "marker": {
                    "size": frame.size,
                    "color": frame.color,
                    "colorbar": { "title": { "text": "Min Python Version" } },
                    "opacity": 0.5,
                },
            }],
            "layout": {
                "title": { "text": self.options.title },
                "xaxis": { "visible": false, "showgrid": false },
                "yaxis": { "visible": false, "showgrid": false },
                "showlegend": false,
                "width": self.options.width,
                "height": self.options.height,
                "plot_bgcolor": "rgba(0,0,0,0)",
            },
        })
    }
}

impl<W: Write> Renderer for PlotlyJsonRenderer<W> {
    fn draw(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let figure = self.figure(frame);
        serde_json::to_writer(&mut self.writer, &figure)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}
