//! Core type definitions for company hierarchies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a vertex plays in a company hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexRole {
    /// A company or other related entity
    Entity,
    /// An intermediate grouping node, kept under every category filter
    Structural,
}

/// A labelled vertex of a company hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    label: String,
    role: VertexRole,
}

impl Vertex {
    pub fn entity(label: impl Into<String>) -> Self {
        Vertex {
            label: label.into(),
            role: VertexRole::Entity,
        }
    }

    pub fn structural(label: impl Into<String>) -> Self {
        Vertex {
            label: label.into(),
            role: VertexRole::Structural,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn role(&self) -> VertexRole {
        self.role
    }

    pub fn is_structural(&self) -> bool {
        self.role == VertexRole::Structural
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Descriptive statistics stored alongside a company.
///
/// These are reported verbatim and are not derived from the hierarchy, so
/// they can disagree with the vertex and edge counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStats {
    pub total_companies: u32,
    pub categories: u32,
    pub hierarchy_depth: u32,
}

/// Category selection applied when building a hierarchy graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Keep every vertex and edge
    #[default]
    All,
    /// Keep the members of one category plus the root and structural vertices
    Named(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Named(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        CategoryFilter::parse(s)
    }
}
