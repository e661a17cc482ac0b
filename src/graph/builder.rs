//! Category-filtered hierarchy graphs
//!
//! [`GraphBuilder`] selects the part of a [`CompanyRecord`] relevant to a
//! category and turns it into a directed petgraph graph with the same
//! topology. Vertices and edges keep the order they have in the record.

use super::record::CompanyRecord;
use super::store::{DataStore, GraphResult};
use super::types::{CategoryFilter, CompanyStats};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Subset of a company hierarchy restricted to one category
#[derive(Debug, Clone)]
pub struct FilteredGraph {
    vertices: Vec<String>,
    edges: Vec<(String, String)>,
    graph: DiGraph<String, ()>,
}

impl FilteredGraph {
    fn new(vertices: Vec<String>, edges: Vec<(String, String)>) -> Self {
        let graph = {
            let mut graph = DiGraph::with_capacity(vertices.len(), edges.len());
            let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(vertices.len());
            for label in &vertices {
                index.insert(label.as_str(), graph.add_node(label.clone()));
            }
            for (source, target) in &edges {
                // Both endpoints are kept vertices by construction
                if let (Some(&s), Some(&t)) =
                    (index.get(source.as_str()), index.get(target.as_str()))
                {
                    graph.add_edge(s, t, ());
                }
            }
            graph
        };
        FilteredGraph {
            vertices,
            edges,
            graph,
        }
    }

    /// Vertex labels; index `i` is node `i` of the graph
    pub fn vertices(&self) -> &[String] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Edges as (source index, target index) pairs, in edge order
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Hierarchy graph plus the company's stored metadata
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: FilteredGraph,
    pub stats: CompanyStats,
    pub description: String,
}

/// Builds filtered hierarchy graphs from a [`DataStore`]
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    store: &'a DataStore,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Build the hierarchy of `company` restricted to `category`.
    ///
    /// An unknown category is not an error: it selects no members, leaving
    /// the root and the structural vertices.
    pub fn build(&self, company: &str, category: &CategoryFilter) -> GraphResult<BuiltGraph> {
        let record = self.store.get(company)?;

        let (vertices, edges) = match category {
            CategoryFilter::All => (
                record.vertex_labels().map(str::to_string).collect(),
                record.edges().to_vec(),
            ),
            CategoryFilter::Named(name) => filter_by_category(record, name),
        };

        debug!(
            company,
            category = %category,
            vertices = vertices.len(),
            edges = edges.len(),
            "Built hierarchy graph"
        );

        Ok(BuiltGraph {
            graph: FilteredGraph::new(vertices, edges),
            stats: record.stats(),
            description: record.description().to_string(),
        })
    }
}

fn filter_by_category(
    record: &CompanyRecord,
    category: &str,
) -> (Vec<String>, Vec<(String, String)>) {
    let members: HashSet<&str> = record
        .category_members(category)
        .unwrap_or_default()
        .iter()
        .map(|m| m.as_str())
        .collect();

    let vertices: Vec<String> = record
        .vertices()
        .iter()
        .filter(|v| {
            members.contains(v.label()) || v.label() == record.key() || v.is_structural()
        })
        .map(|v| v.label().to_string())
        .collect();

    let kept: HashSet<&str> = vertices.iter().map(|v| v.as_str()).collect();
    let edges = record
        .edges()
        .iter()
        .filter(|(s, t)| kept.contains(s.as_str()) && kept.contains(t.as_str()))
        .cloned()
        .collect();

    (vertices, edges)
}
