//! # meanprop — single-round graph feature propagation
//!
//! Loads a small graph from its text description, runs one round of mean
//! aggregation followed by a fixed linear map, then scores nodes, edges and
//! the whole graph.
//!
//! ## Pipeline
//!
//! ```text
//! loader ──► adjacency ──► propagate ──► scoring ──► export
//!  text      N(n) lists    W·mean+b      sums, products, mean
//! ```
//!
//! Every stage is a pure function of its inputs. Two conforming producers
//! are checked against each other with [`compare`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meanprop::{Engine, EngineConfig};
//!
//! # fn example() -> meanprop::Result<()> {
//! let engine = Engine::new(EngineConfig::with_out_dim(4))?;
//! let output = engine.run_file("fixtures/graph_data.txt")?;
//!
//! println!("graph score = {:.2}", output.report.graph_score);
//! for edge in &output.report.edges {
//!     println!("edge {} {} -> {:.2}", edge.index, edge.edge, edge.score);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod loader;
pub mod adjacency;
pub mod propagate;
pub mod scoring;
pub mod export;
pub mod compare;
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Edge, Graph, LinearParams, NodeId};
pub use adjacency::Adjacency;
pub use propagate::{Aggregation, NodeEmbeddings, PropagationLayer};
pub use scoring::{EdgeCombiner, EdgeScore, GraphReducer, ScoreReport, Scorer};
pub use config::EngineConfig;

use std::path::Path;

use serde::Serialize;
use tracing::info;

// ============================================================================
// Engine
// ============================================================================

/// Output of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub embeddings: NodeEmbeddings,
    pub report: ScoreReport,
}

/// The primary entry point. Holds immutable configuration and runs the
/// whole pipeline for one graph at a time.
///
/// An `Engine` can be shared freely between runs; nothing is mutated.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine with explicit linear-map parameters and default scoring.
    pub fn with_params(params: &LinearParams) -> Result<Self> {
        let weights = (0..params.out_dim()).map(|o| params.row(o).to_vec()).collect();
        Self::new(EngineConfig {
            out_dim: Some(params.out_dim()),
            weights: Some(weights),
            bias: Some(params.bias().to_vec()),
            ..EngineConfig::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load → adjacency → propagate → score.
    ///
    /// Either every stage succeeds or nothing is returned.
    #[tracing::instrument(skip_all, fields(num_nodes = graph.num_nodes(), num_edges = graph.num_edges()))]
    pub fn run(&self, graph: &Graph) -> Result<RunOutput> {
        // Phase 1: Parameters
        let params = self.config.linear_params(graph.num_features())?;

        // Phase 2: Adjacency
        let adjacency = Adjacency::build(graph);

        // Phase 3: Propagate
        let layer = PropagationLayer::new(params).with_aggregation(self.config.aggregation);
        let embeddings = layer.forward(graph, &adjacency)?;

        // Phase 4: Score
        let report = self.config.scorer().score(graph, &embeddings)?;

        info!(
            graph_score = report.graph_score,
            graph_binary = report.graph_binary,
            "forward pass complete"
        );
        Ok(RunOutput { embeddings, report })
    }

    /// Parse a graph description and run it.
    pub fn run_str(&self, text: &str) -> Result<RunOutput> {
        let graph = loader::parse(text)?;
        self.run(&graph)
    }

    /// Load a graph file and run it.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<RunOutput> {
        let graph = loader::load(path)?;
        self.run(&graph)
    }

    /// Text report for `output` at the configured precision.
    pub fn render(&self, output: &RunOutput) -> Result<String> {
        export::render_text(output, self.config.precision)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("Dimension error: expected {expected}, got {got}")]
    Dimension { expected: String, got: String },

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report parse error: {0}")]
    Parse(String),

    #[error("Outputs differ: {0}")]
    Mismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
