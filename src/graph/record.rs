//! Company hierarchy records
//!
//! A record bundles one company's hierarchy (vertices and directed edges),
//! its category memberships, stored statistics and a description. Records
//! are validated once when they are built and are read-only afterwards.

use super::store::{GraphError, GraphResult};
use super::types::{CompanyStats, Vertex};
use indexmap::IndexMap;
use std::collections::HashSet;

/// One company's full hierarchy bundle
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    key: String,
    vertices: Vec<Vertex>,
    edges: Vec<(String, String)>,
    categories: IndexMap<String, Vec<String>>,
    stats: CompanyStats,
    description: String,
}

impl CompanyRecord {
    /// Start building a record whose root vertex is the company key itself
    pub fn builder(key: impl Into<String>) -> RecordBuilder {
        let key = key.into();
        RecordBuilder {
            vertices: vec![Vertex::entity(key.clone())],
            key,
            edges: Vec::new(),
            categories: IndexMap::new(),
            stats: CompanyStats {
                total_companies: 0,
                categories: 0,
                hierarchy_depth: 0,
            },
            description: String::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Root vertex (always index 0)
    pub fn root(&self) -> &Vertex {
        &self.vertices[0]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_labels(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(|v| v.label())
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn categories(&self) -> &IndexMap<String, Vec<String>> {
        &self.categories
    }

    /// Members of a category, `None` when the record has no such category
    pub fn category_members(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(|m| m.as_slice())
    }

    pub fn stats(&self) -> CompanyStats {
        self.stats
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    fn validate(&self) -> GraphResult<()> {
        let invalid = |reason: String| GraphError::InvalidRecord {
            company: self.key.clone(),
            reason,
        };

        if self.key.is_empty() {
            return Err(invalid("company key is empty".to_string()));
        }

        let mut labels = HashSet::with_capacity(self.vertices.len());
        for vertex in &self.vertices {
            if !labels.insert(vertex.label()) {
                return Err(invalid(format!("duplicate vertex '{}'", vertex.label())));
            }
        }

        for (source, target) in &self.edges {
            for endpoint in [source, target] {
                if !labels.contains(endpoint.as_str()) {
                    return Err(invalid(format!(
                        "edge ({}, {}) references unknown vertex '{}'",
                        source, target, endpoint
                    )));
                }
            }
        }

        for (category, members) in &self.categories {
            if let Some(missing) = members.iter().find(|m| !labels.contains(m.as_str())) {
                return Err(invalid(format!(
                    "category '{}' references unknown vertex '{}'",
                    category, missing
                )));
            }
        }

        Ok(())
    }
}

/// Incremental constructor for [`CompanyRecord`]
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    key: String,
    vertices: Vec<Vertex>,
    edges: Vec<(String, String)>,
    categories: IndexMap<String, Vec<String>>,
    stats: CompanyStats,
    description: String,
}

impl RecordBuilder {
    pub fn entity(mut self, label: impl Into<String>) -> Self {
        self.vertices.push(Vertex::entity(label));
        self
    }

    pub fn structural(mut self, label: impl Into<String>) -> Self {
        self.vertices.push(Vertex::structural(label));
        self
    }

    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push((source.into(), target.into()));
        self
    }

    pub fn category(mut self, name: impl Into<String>, members: &[&str]) -> Self {
        self.categories.insert(
            name.into(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn stats(mut self, total_companies: u32, categories: u32, hierarchy_depth: u32) -> Self {
        self.stats = CompanyStats {
            total_companies,
            categories,
            hierarchy_depth,
        };
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate and freeze the record
    pub fn build(self) -> GraphResult<CompanyRecord> {
        let record = CompanyRecord {
            key: self.key,
            vertices: self.vertices,
            edges: self.edges,
            categories: self.categories,
            stats: self.stats,
            description: self.description,
        };
        record.validate()?;
        Ok(record)
    }
}
