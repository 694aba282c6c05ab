//! Scoring: reduce output vectors to node, edge and graph scalars, and
//! threshold them into binary labels.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Edge, Graph};
use crate::propagate::NodeEmbeddings;
use crate::{Error, Result};

/// Default decision threshold for binary labels.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Combines two endpoint node scores into an edge score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCombiner {
    #[default]
    Product,
    Sum,
    Max,
    Min,
    AbsDiff,
}

impl EdgeCombiner {
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            EdgeCombiner::Product => a * b,
            EdgeCombiner::Sum => a + b,
            EdgeCombiner::Max => a.max(b),
            EdgeCombiner::Min => a.min(b),
            EdgeCombiner::AbsDiff => (a - b).abs(),
        }
    }
}

/// Reduces all node scores into the graph score. Empty input reduces to 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphReducer {
    #[default]
    Mean,
    Sum,
    Max,
    Min,
}

impl GraphReducer {
    pub fn reduce(self, scores: &[f64]) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        match self {
            GraphReducer::Mean => scores.iter().sum::<f64>() / scores.len() as f64,
            GraphReducer::Sum => scores.iter().sum(),
            GraphReducer::Max => scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            GraphReducer::Min => scores.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// `1` iff `score > threshold` (strict).
#[inline]
pub fn binarize(score: f64, threshold: f64) -> bool {
    score > threshold
}

/// One scalar per node: the sum of its output components.
pub fn node_scores(embeddings: &NodeEmbeddings) -> Vec<f64> {
    embeddings.rows().map(|row| row.iter().sum()).collect()
}

/// Score of one declared edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeScore {
    /// Position of the edge in the graph description, from 0.
    pub index: usize,
    pub edge: Edge,
    pub score: f64,
    pub binary: bool,
}

/// Everything derived from one propagated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub threshold: f64,
    pub node_scores: Vec<f64>,
    pub edges: Vec<EdgeScore>,
    pub graph_score: f64,
    pub graph_binary: bool,
}

impl ScoreReport {
    pub fn edge_scores(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.edges.iter().map(|e| e.score)
    }

    pub fn edge_binary(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        self.edges.iter().map(|e| e.binary)
    }
}

/// Stateless scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scorer {
    pub threshold: f64,
    pub combiner: EdgeCombiner,
    pub reducer: GraphReducer,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            combiner: EdgeCombiner::default(),
            reducer: GraphReducer::default(),
        }
    }
}

impl Scorer {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold, ..Self::default() }
    }

    /// Score every node, every declared edge (once, in file order) and the
    /// whole graph.
    pub fn score(&self, graph: &Graph, embeddings: &NodeEmbeddings) -> Result<ScoreReport> {
        if embeddings.num_nodes() != graph.num_nodes() {
            return Err(Error::Dimension {
                expected: format!("{} output rows", graph.num_nodes()),
                got: embeddings.num_nodes().to_string(),
            });
        }

        let node_scores = node_scores(embeddings);
        let edges: Vec<EdgeScore> = graph
            .edges()
            .iter()
            .enumerate()
            .map(|(index, &edge)| {
                let score = self
                    .combiner
                    .combine(node_scores[edge.src.index()], node_scores[edge.dst.index()]);
                EdgeScore { index, edge, score, binary: binarize(score, self.threshold) }
            })
            .collect();
        let graph_score = self.reducer.reduce(&node_scores);

        debug!(
            num_edges = edges.len(),
            graph_score,
            threshold = self.threshold,
            "scored propagated output"
        );
        Ok(ScoreReport {
            threshold: self.threshold,
            node_scores,
            edges,
            graph_score,
            graph_binary: binarize(graph_score, self.threshold),
        })
    }
}
