//! Symmetric adjacency derived from the edge list.
//!
//! Each edge `(u, v)` contributes `v` to `u`'s neighbor list and `u` to
//! `v`'s. Lists are multisets: duplicate edges repeat a neighbor, and a
//! self-edge `(u, u)` lists `u` twice. A node never appears among its own
//! neighbors unless the edge data says so; the self term of the mean lives
//! in the propagation rule, not here.

use smallvec::SmallVec;
use tracing::debug;

use crate::model::{Edge, Graph, NodeId};

/// Inline capacity covers the typical degree of small test graphs.
pub type NeighborList = SmallVec<[NodeId; 4]>;

/// Neighbor multiset per node, indexed by node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<NeighborList>,
}

impl Adjacency {
    /// Expand `edges` symmetrically over `num_nodes` nodes.
    ///
    /// # Panics
    /// If an edge endpoint is `>= num_nodes`. `Graph` guarantees this never
    /// happens for its own edges.
    pub fn from_edges(num_nodes: usize, edges: &[Edge]) -> Self {
        let mut neighbors = vec![NeighborList::new(); num_nodes];
        for edge in edges {
            neighbors[edge.src.index()].push(edge.dst);
            neighbors[edge.dst.index()].push(edge.src);
        }
        debug!(num_nodes, num_edges = edges.len(), "built symmetric adjacency");
        Self { neighbors }
    }

    pub fn build(graph: &Graph) -> Self {
        Self::from_edges(graph.num_nodes(), graph.edges())
    }

    pub fn num_nodes(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbors of `node` in edge-declaration order.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.neighbors[node.index()]
    }

    /// Number of neighbor entries (with multiplicity).
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors[node.index()].len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (NodeId, &[NodeId])> + '_ {
        self.neighbors
            .iter()
            .enumerate()
            .map(|(i, list)| (NodeId(i), list.as_slice()))
    }
}
