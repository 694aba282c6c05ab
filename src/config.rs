//! Engine configuration.
//!
//! Loaded from JSON and overlaid by command-line flags. Every field has a
//! default, so `{}` is a valid config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_PRECISION;
use crate::model::LinearParams;
use crate::propagate::Aggregation;
use crate::scoring::{EdgeCombiner, GraphReducer, Scorer, DEFAULT_THRESHOLD};
use crate::{Error, Result};

/// Upper bound on rendered fractional digits.
pub const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Output dimension. Implied by `weights` when those are given.
    pub out_dim: Option<usize>,
    pub threshold: f64,
    /// Value of every weight when no explicit matrix is given.
    pub weight_fill: f64,
    /// Value of every bias entry when no explicit bias is given.
    pub bias_fill: f64,
    /// Explicit `(out_dim, in_dim)` weight rows.
    pub weights: Option<Vec<Vec<f64>>>,
    pub bias: Option<Vec<f64>>,
    pub aggregation: Aggregation,
    pub combiner: EdgeCombiner,
    pub reducer: GraphReducer,
    /// Fractional digits in the text report.
    pub precision: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            out_dim: None,
            threshold: DEFAULT_THRESHOLD,
            weight_fill: 1.0,
            bias_fill: 0.0,
            weights: None,
            bias: None,
            aggregation: Aggregation::default(),
            combiner: EdgeCombiner::default(),
            reducer: GraphReducer::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl EngineConfig {
    /// Reference parity setup: all-ones weights, zero bias, threshold 0.5.
    pub fn with_out_dim(out_dim: usize) -> Self {
        Self { out_dim: Some(out_dim), ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Output dimension after taking explicit parameters into account.
    pub fn resolved_out_dim(&self) -> Option<usize> {
        match (&self.weights, &self.bias) {
            (Some(w), _) => Some(w.len()),
            (None, Some(b)) => self.out_dim.or(Some(b.len())),
            (None, None) => self.out_dim,
        }
    }

    /// Check everything that does not depend on the graph.
    pub fn validate(&self) -> Result<()> {
        if self.out_dim == Some(0) {
            return Err(Error::Config("out_dim must be at least 1".into()));
        }
        for (name, v) in [
            ("threshold", self.threshold),
            ("weight_fill", self.weight_fill),
            ("bias_fill", self.bias_fill),
        ] {
            if !v.is_finite() {
                return Err(Error::Config(format!("{name} must be finite, got {v}")));
            }
        }
        if self.precision > MAX_PRECISION {
            return Err(Error::Config(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        if let (Some(declared), Some(resolved)) = (self.out_dim, self.resolved_out_dim()) {
            if declared != resolved {
                return Err(Error::Dimension {
                    expected: format!("out_dim {declared}"),
                    got: format!("parameters with {resolved} outputs"),
                });
            }
        }
        if let (None, Some(bias), Some(resolved)) =
            (&self.weights, &self.bias, self.resolved_out_dim())
        {
            if bias.len() != resolved {
                return Err(Error::Dimension {
                    expected: format!("bias of length {resolved}"),
                    got: format!("length {}", bias.len()),
                });
            }
        }
        if let Some(weights) = &self.weights {
            let bias = self.bias.clone().unwrap_or_else(|| vec![self.bias_fill; weights.len()]);
            LinearParams::new(weights.clone(), bias)?;
        }
        Ok(())
    }

    /// Linear-map parameters for a graph with `in_dim` input features.
    ///
    /// Explicit weights are returned as given, even if their column count
    /// differs from `in_dim`; the propagation layer rejects that mismatch.
    pub fn linear_params(&self, in_dim: usize) -> Result<LinearParams> {
        let out_dim = self
            .resolved_out_dim()
            .ok_or_else(|| Error::Config("output dimension not set".into()))?;
        if out_dim == 0 {
            return Err(Error::Config("out_dim must be at least 1".into()));
        }

        match (&self.weights, &self.bias) {
            (Some(weights), bias) => {
                let bias = bias.clone().unwrap_or_else(|| vec![self.bias_fill; out_dim]);
                LinearParams::new(weights.clone(), bias)
            }
            (None, Some(bias)) => {
                LinearParams::new(vec![vec![self.weight_fill; in_dim]; out_dim], bias.clone())
            }
            (None, None) => Ok(LinearParams::filled(out_dim, in_dim, self.weight_fill, self.bias_fill)),
        }
    }

    pub fn scorer(&self) -> Scorer {
        Scorer {
            threshold: self.threshold,
            combiner: self.combiner,
            reducer: self.reducer,
        }
    }
}
