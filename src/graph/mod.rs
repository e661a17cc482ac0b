//! Company hierarchy data and graph construction
//!
//! This module holds:
//! - The compiled-in, read-only company dataset ([`DataStore`])
//! - Validated per-company records with explicit vertex roles
//! - Category filtering into directed petgraph graphs ([`GraphBuilder`])

pub mod builder;
pub mod record;
pub mod store;
pub mod types;

// Re-export main types
pub use builder::{BuiltGraph, FilteredGraph, GraphBuilder};
pub use record::{CompanyRecord, RecordBuilder};
pub use store::{DataStore, GraphError, GraphResult};
pub use types::{CategoryFilter, CompanyStats, Vertex, VertexRole};
