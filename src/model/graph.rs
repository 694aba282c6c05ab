//! Immutable input graph: a dense feature table plus the edge list.

use serde::{Deserialize, Serialize};
use super::{Edge, NodeId};
use crate::{Error, Result};

/// A graph as read from its description.
///
/// Features are stored row-major in one flat buffer; row `n` is the input
/// feature vector of node `n`. Once built, a `Graph` is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    num_nodes: usize,
    num_features: usize,
    features: Vec<f64>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a graph from per-node feature rows and an edge list.
    ///
    /// Fails if there are no nodes, no features, ragged rows, or an edge
    /// endpoint outside `0..num_nodes`.
    pub fn new(node_features: Vec<Vec<f64>>, edges: Vec<Edge>) -> Result<Self> {
        let num_nodes = node_features.len();
        let num_features = node_features.first().map_or(0, Vec::len);
        if num_nodes == 0 || num_features == 0 {
            return Err(Error::InvalidGraph(format!(
                "graph needs at least one node and one feature, got {num_nodes} x {num_features}"
            )));
        }

        let mut features = Vec::with_capacity(num_nodes * num_features);
        for (n, row) in node_features.into_iter().enumerate() {
            if row.len() != num_features {
                return Err(Error::InvalidGraph(format!(
                    "node {n} has {} features, expected {num_features}",
                    row.len()
                )));
            }
            features.extend(row);
        }

        Self::from_flat(num_nodes, num_features, features, edges)
    }

    /// Build a graph from an already flattened row-major feature buffer.
    pub fn from_flat(
        num_nodes: usize,
        num_features: usize,
        features: Vec<f64>,
        edges: Vec<Edge>,
    ) -> Result<Self> {
        if num_nodes.checked_mul(num_features) != Some(features.len()) {
            return Err(Error::InvalidGraph(format!(
                "feature buffer holds {} values, expected {num_nodes} x {num_features}",
                features.len()
            )));
        }
        if let Some(bad) = edges
            .iter()
            .find(|e| e.src.index() >= num_nodes || e.dst.index() >= num_nodes)
        {
            return Err(Error::InvalidGraph(format!(
                "edge {bad} references a node outside 0..{num_nodes}"
            )));
        }
        Ok(Self { num_nodes, num_features, features, edges })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Input feature vector of one node.
    ///
    /// # Panics
    /// If `node` is not a node of this graph.
    pub fn feature(&self, node: NodeId) -> &[f64] {
        let start = node.index() * self.num_features;
        &self.features[start..start + self.num_features]
    }

    /// All feature rows in node order.
    pub fn features(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.features.chunks_exact(self.num_features)
    }

    /// Edges in the order they were declared.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The `i`-th declared edge.
    pub fn edge(&self, i: usize) -> Option<Edge> {
        self.edges.get(i).copied()
    }

    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> {
        (0..self.num_nodes).map(NodeId)
    }
}
