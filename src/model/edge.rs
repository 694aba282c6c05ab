//! Undirected edge between two nodes.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// An edge exactly as it appears in the graph description.
///
/// The pair is stored in file order, but the edge is undirected: adjacency
/// expands it both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeId,
    pub dst: NodeId,
}

impl Edge {
    pub fn new(src: impl Into<NodeId>, dst: impl Into<NodeId>) -> Self {
        Self { src: src.into(), dst: dst.into() }
    }

    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

impl From<(usize, usize)> for Edge {
    fn from((u, v): (usize, usize)) -> Self {
        Edge::new(u, v)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.src, self.dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Edge::new(0, 1).to_string(), "(0, 1)");
        assert!(Edge::new(4, 4).is_self_loop());
    }
}
