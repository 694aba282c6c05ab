//! # Propagation Layer
//!
//! One round of message passing: every node replaces its features with the
//! elementwise mean of an aggregation multiset, then the mean goes through
//! a fixed affine map.
//!
//! ```text
//! features ──► mean over {n} ∪ N(n) ──► W · mean + b ──► output[n]
//! ```
//!
//! No activation, no degree normalization beyond the plain mean.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjacency::Adjacency;
use crate::model::{Graph, LinearParams, NodeId};
use crate::{Error, Result};

/// Which vectors take part in a node's mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// `{n} ∪ N(n)`. An isolated node keeps its own features.
    #[default]
    SelfInclusiveMean,
    /// `N(n)` only. An isolated node aggregates to the zero vector.
    NeighborMean,
}

impl Aggregation {
    /// Elementwise mean of the aggregation multiset of `node`.
    pub fn aggregate(self, graph: &Graph, adjacency: &Adjacency, node: NodeId) -> Vec<f64> {
        let neighbors = adjacency.neighbors(node);
        // Build the multiset explicitly so the divisor is its size.
        let members: Vec<NodeId> = match self {
            Aggregation::SelfInclusiveMean => std::iter::once(node)
                .chain(neighbors.iter().copied())
                .collect(),
            Aggregation::NeighborMean => neighbors.to_vec(),
        };

        let mut mean = vec![0.0; graph.num_features()];
        if members.is_empty() {
            return mean;
        }
        for &m in &members {
            for (acc, v) in mean.iter_mut().zip(graph.feature(m)) {
                *acc += v;
            }
        }
        let count = members.len() as f64;
        for acc in &mut mean {
            *acc /= count;
        }
        mean
    }
}

/// Per-node output vectors, row-major `(num_nodes, out_dim)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEmbeddings {
    out_dim: usize,
    values: Vec<f64>,
}

impl NodeEmbeddings {
    pub fn from_rows(out_dim: usize, rows: impl IntoIterator<Item = Vec<f64>>) -> Result<Self> {
        let mut values = Vec::new();
        for (n, row) in rows.into_iter().enumerate() {
            if row.len() != out_dim {
                return Err(Error::Dimension {
                    expected: format!("output row {n} of length {out_dim}"),
                    got: format!("length {}", row.len()),
                });
            }
            values.extend(row);
        }
        Ok(Self { out_dim, values })
    }

    pub fn num_nodes(&self) -> usize {
        if self.out_dim == 0 { 0 } else { self.values.len() / self.out_dim }
    }

    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    pub fn row(&self, node: NodeId) -> &[f64] {
        let start = node.index() * self.out_dim;
        &self.values[start..start + self.out_dim]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.out_dim.max(1))
    }
}

/// Mean aggregation followed by a fixed linear map.
#[derive(Debug, Clone)]
pub struct PropagationLayer {
    params: LinearParams,
    aggregation: Aggregation,
}

impl PropagationLayer {
    pub fn new(params: LinearParams) -> Self {
        Self { params, aggregation: Aggregation::default() }
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Run the layer over every node.
    ///
    /// Fails with `Error::Dimension` before any computation if the weight
    /// matrix does not take `graph.num_features()` inputs, or if the
    /// adjacency was built for a different node count.
    pub fn forward(&self, graph: &Graph, adjacency: &Adjacency) -> Result<NodeEmbeddings> {
        self.params.check_input(graph.num_features())?;
        if adjacency.num_nodes() != graph.num_nodes() {
            return Err(Error::Dimension {
                expected: format!("adjacency over {} nodes", graph.num_nodes()),
                got: format!("{} nodes", adjacency.num_nodes()),
            });
        }

        let out_dim = self.params.out_dim();
        let mut values = Vec::with_capacity(graph.num_nodes() * out_dim);
        for node in graph.node_ids() {
            let mean = self.aggregation.aggregate(graph, adjacency, node);
            values.extend(self.params.apply(&mean));
        }

        debug!(
            num_nodes = graph.num_nodes(),
            in_dim = graph.num_features(),
            out_dim,
            aggregation = ?self.aggregation,
            "propagated node features"
        );
        Ok(NodeEmbeddings { out_dim, values })
    }
}
