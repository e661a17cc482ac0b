//! Hierarchy plots
//!
//! [`LayoutRenderer`] lays a hierarchy out as a rooted tree and produces a
//! [`PlotArtifact`]: a Plotly figure with one line layer for the edges and
//! one labelled marker layer for the vertices, root at the top.

pub mod figure;
pub mod layout;

pub use figure::{Figure, Layout, Trace};
pub use layout::{LayoutError, LayoutResult, TreeLayout};

use crate::graph::FilteredGraph;
use figure::{Axis, Line, Margin, Marker, ScatterTrace};
use serde::Serialize;

/// Fixed presentation settings for hierarchy plots
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
    pub edge_color: String,
    pub vertex_color: String,
    pub vertex_size: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            margin: 40,
            plot_bgcolor: "rgba(253,253,253,1)".to_string(),
            paper_bgcolor: "rgba(255,255,255,1)".to_string(),
            edge_color: "black".to_string(),
            vertex_color: "blue".to_string(),
            vertex_size: 10.0,
        }
    }
}

/// Screen position of a vertex after layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Renderable hierarchy plot.
///
/// Serialises as the Plotly figure; coordinates are kept alongside for
/// callers that need the geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotArtifact {
    #[serde(flatten)]
    pub figure: Figure,
    #[serde(skip)]
    pub coordinates: Vec<Point>,
}

/// Lays out and renders hierarchy graphs
#[derive(Debug, Clone, Default)]
pub struct LayoutRenderer {
    canvas: Canvas,
}

impl LayoutRenderer {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Render a built hierarchy rooted at its first vertex
    pub fn render_graph(&self, graph: &FilteredGraph) -> LayoutResult<PlotArtifact> {
        self.render(graph.vertices(), &graph.edge_indices(), 0)
    }

    pub fn render(
        &self,
        vertices: &[String],
        edges: &[(usize, usize)],
        root: usize,
    ) -> LayoutResult<PlotArtifact> {
        let layout = TreeLayout::compute(vertices.len(), edges, root)?;

        // Flip so the root is drawn at the top (subtracting avoids -0.0)
        let coordinates: Vec<Point> = (0..layout.len())
            .map(|v| Point {
                x: layout.x(v),
                y: 0.0 - layout.depth(v) as f64,
            })
            .collect();

        let mut edge_x = Vec::with_capacity(edges.len() * 3);
        let mut edge_y = Vec::with_capacity(edges.len() * 3);
        for &(source, target) in edges {
            let (from, to) = (coordinates[source], coordinates[target]);
            edge_x.extend([Some(from.x), Some(to.x), None]);
            edge_y.extend([Some(from.y), Some(to.y), None]);
        }

        let edge_layer = Trace::Scatter(ScatterTrace {
            x: edge_x,
            y: edge_y,
            mode: "lines".to_string(),
            line: Some(Line {
                color: self.canvas.edge_color.clone(),
                width: 1.0,
            }),
            marker: None,
            text: None,
            textposition: None,
            hoverinfo: "none".to_string(),
        });

        let vertex_layer = Trace::Scatter(ScatterTrace {
            x: coordinates.iter().map(|p| Some(p.x)).collect(),
            y: coordinates.iter().map(|p| Some(p.y)).collect(),
            mode: "markers+text".to_string(),
            line: None,
            marker: Some(Marker {
                color: self.canvas.vertex_color.clone(),
                size: self.canvas.vertex_size,
            }),
            text: Some(vertices.to_vec()),
            textposition: Some("top center".to_string()),
            hoverinfo: "text".to_string(),
        });

        let plot_layout = Layout {
            autosize: true,
            width: Some(self.canvas.width),
            height: Some(self.canvas.height),
            showlegend: Some(false),
            xaxis: Some(Axis::hidden()),
            yaxis: Some(Axis::hidden()),
            margin: Margin::uniform(self.canvas.margin),
            plot_bgcolor: Some(self.canvas.plot_bgcolor.clone()),
            paper_bgcolor: Some(self.canvas.paper_bgcolor.clone()),
            ..Layout::default()
        };

        Ok(PlotArtifact {
            figure: Figure::new(vec![edge_layer, vertex_layer], plot_layout),
            coordinates,
        })
    }
}
