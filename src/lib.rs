//! Orgdash
//!
//! A small web dashboard that renders company ownership hierarchies and
//! provider charts for a compiled-in set of company records.
//!
//! # Architecture
//!
//! - [`graph`]: the read-only company dataset and category-filtered
//!   hierarchy graphs (petgraph)
//! - [`render`]: rooted tree layout and Plotly figure serialisation
//! - [`reports`]: per-company provider charts from CSV exports
//! - [`analytics`]: regional risk choropleth over fetched district boundaries
//! - [`http`]: axum routes, handlers and the embedded dashboard page
//!
//! ## Example Usage
//!
//! ```rust
//! use orgdash::graph::{CategoryFilter, DataStore, GraphBuilder};
//! use orgdash::render::LayoutRenderer;
//!
//! let store = DataStore::load().unwrap();
//! let built = GraphBuilder::new(&store)
//!     .build("CompanyC789", &CategoryFilter::parse("new_company"))
//!     .unwrap();
//! assert_eq!(built.graph.vertex_count(), 3);
//!
//! let plot = LayoutRenderer::default().render_graph(&built.graph).unwrap();
//! assert_eq!(plot.coordinates.len(), 3);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analytics;
pub mod graph;
pub mod http;
pub mod render;
pub mod reports;

// Re-export main types for convenience
pub use graph::{
    BuiltGraph, CategoryFilter, CompanyRecord, CompanyStats, DataStore, FilteredGraph,
    GraphBuilder, GraphError, GraphResult, Vertex, VertexRole,
};

pub use render::{LayoutError, LayoutRenderer, LayoutResult, PlotArtifact, TreeLayout};

pub use reports::{ReportError, ReportResult, ReportService};

pub use analytics::{AnalyticsError, AnalyticsResult, AnalyticsService};

pub use http::{build_router, AppState, HttpServer, ServerConfig, ServerError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
