//! Undirected adjacency graph over triangle handles.
//!
//! The triangulation keeps one node per live triangle and one edge per shared
//! facet. The graph is symmetric and has no self-loops; both invariants are
//! enforced here rather than by callers.

#![forbid(unsafe_code)]

use crate::core::collections::FastHashMap;
use crate::core::simplex_set::SimplexSet;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Errors from graph mutation and queries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError<N: Debug> {
    /// A referenced node is not in the graph.
    #[error("Node {node:?} is not in the graph")]
    MissingNode {
        /// The missing node.
        node: N,
    },

    /// An edge from a node to itself was requested.
    #[error("Cannot connect node {node:?} to itself")]
    SelfConnection {
        /// The node on both ends.
        node: N,
    },
}

/// Symmetric adjacency map from each node to its neighbors.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::adjacency::AdjacencyGraph;
///
/// let mut graph = AdjacencyGraph::new();
/// graph.add_node(1);
/// graph.add_node(2);
/// graph.add_connection(1, 2).unwrap();
/// assert!(graph.neighbors(&2).unwrap().contains(&1));
///
/// graph.remove_node(&1);
/// assert!(graph.neighbors(&2).unwrap().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct AdjacencyGraph<N> {
    adjacency: FastHashMap<N, SimplexSet<N>>,
}

impl<N> AdjacencyGraph<N>
where
    N: Copy + Eq + Hash + Debug,
{
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adjacency: FastHashMap::default(),
        }
    }

    /// Adds `node` with no neighbors. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: N) {
        self.adjacency.entry(node).or_default();
    }

    /// Removes `node` and every edge touching it. Absent nodes are ignored.
    ///
    /// Returns `true` if the node was present.
    pub fn remove_node(&mut self, node: &N) -> bool {
        let Some(neighbors) = self.adjacency.remove(node) else {
            return false;
        };
        for neighbor in &neighbors {
            if let Some(back) = self.adjacency.get_mut(neighbor) {
                back.remove(node);
            }
        }
        true
    }

    /// Connects `a` and `b` in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfConnection`] if `a == b`, or
    /// [`GraphError::MissingNode`] if either endpoint is absent.
    pub fn add_connection(&mut self, a: N, b: N) -> Result<(), GraphError<N>> {
        self.check_pair(a, b)?;
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.insert(b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.insert(a);
        }
        Ok(())
    }

    /// Disconnects `a` and `b` in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfConnection`] if `a == b`, or
    /// [`GraphError::MissingNode`] if either endpoint is absent.
    pub fn remove_connection(&mut self, a: N, b: N) -> Result<(), GraphError<N>> {
        self.check_pair(a, b)?;
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.remove(&a);
        }
        Ok(())
    }

    fn check_pair(&self, a: N, b: N) -> Result<(), GraphError<N>> {
        if a == b {
            return Err(GraphError::SelfConnection { node: a });
        }
        for node in [a, b] {
            if !self.adjacency.contains_key(&node) {
                return Err(GraphError::MissingNode { node });
            }
        }
        Ok(())
    }

    /// Neighbors of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingNode`] if `node` is absent.
    pub fn neighbors(&self, node: &N) -> Result<&SimplexSet<N>, GraphError<N>> {
        self.adjacency
            .get(node)
            .ok_or(GraphError::MissingNode { node: *node })
    }

    /// Every node, in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.adjacency.keys().copied()
    }

    /// Returns `true` if `node` is in the graph.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Returns `true` if `a` and `b` are connected.
    #[must_use]
    pub fn is_connected(&self, a: &N, b: &N) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(b))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns `true` if there are no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.adjacency.values().map(SimplexSet::len).sum::<usize>() / 2
    }
}

impl<N> Default for AdjacencyGraph<N>
where
    N: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
