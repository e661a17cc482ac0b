//! Rooted tree layout
//!
//! Places a hierarchy on integer layers: a vertex's layer is its
//! breadth-first distance from the root with edges treated as undirected.
//! Leaves take consecutive x slots in depth-first order and every parent
//! is centred between its first and last child, so subtrees never overlap
//! and no two vertices on one layer share an x position.
//!
//! Each component the root cannot reach is attached below the root as its
//! last child, entered at the component's lowest-index vertex on layer 1.

use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised for malformed layout input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Root index {root} is out of bounds for {vertex_count} vertices")]
    RootOutOfBounds { root: usize, vertex_count: usize },

    #[error("Edge ({from}, {to}) references a vertex outside 0..{vertex_count}")]
    DanglingEdge {
        from: usize,
        to: usize,
        vertex_count: usize,
    },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Computed coordinates, indexed by vertex
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    x: Vec<f64>,
    depth: Vec<usize>,
    roots: Vec<usize>,
}

impl TreeLayout {
    pub fn compute(
        vertex_count: usize,
        edges: &[(usize, usize)],
        root: usize,
    ) -> LayoutResult<Self> {
        if root >= vertex_count {
            return Err(LayoutError::RootOutOfBounds { root, vertex_count });
        }

        let mut adjacency = vec![Vec::new(); vertex_count];
        for &(source, target) in edges {
            if source >= vertex_count || target >= vertex_count {
                return Err(LayoutError::DanglingEdge {
                    from: source,
                    to: target,
                    vertex_count,
                });
            }
            adjacency[source].push(target);
            if source != target {
                adjacency[target].push(source);
            }
        }

        let mut depth = vec![usize::MAX; vertex_count];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
        let mut roots = Vec::new();

        let starts = std::iter::once(root).chain((0..vertex_count).filter(|&v| v != root));
        for start in starts {
            if depth[start] != usize::MAX {
                continue;
            }
            roots.push(start);
            if start == root {
                depth[start] = 0;
            } else {
                // Hang the component under the root as its last child
                depth[start] = 1;
                children[root].push(start);
            }

            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for &next in &adjacency[current] {
                    if depth[next] == usize::MAX {
                        depth[next] = depth[current] + 1;
                        children[current].push(next);
                        queue.push_back(next);
                    }
                }
            }
        }

        let mut x = vec![0.0; vertex_count];
        place_subtree(root, &children, &mut x);

        let offset = x[root];
        for value in &mut x {
            *value -= offset;
        }

        Ok(TreeLayout { x, depth, roots })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self, vertex: usize) -> f64 {
        self.x[vertex]
    }

    /// Layer of a vertex; the root is layer 0
    pub fn depth(&self, vertex: usize) -> usize {
        self.depth[vertex]
    }

    /// Entry vertex of each connected component in placement order, the
    /// requested root first
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }
}

// Post-order placement with an explicit stack; hierarchies may be deep
fn place_subtree(root: usize, children: &[Vec<usize>], x: &mut [f64]) {
    let mut next_slot = 0.0;
    let mut stack = vec![(root, false)];
    while let Some((vertex, expanded)) = stack.pop() {
        let kids = &children[vertex];
        if kids.is_empty() {
            x[vertex] = next_slot;
            next_slot += 1.0;
        } else if expanded {
            x[vertex] = (x[kids[0]] + x[kids[kids.len() - 1]]) / 2.0;
        } else {
            stack.push((vertex, true));
            for &child in kids.iter().rev() {
                stack.push((child, false));
            }
        }
    }
}
