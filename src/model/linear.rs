//! Affine map parameters `y = W x + b`.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Weight matrix of shape `(out_dim, in_dim)` stored row-major, plus a bias
/// of length `out_dim`.
///
/// These are fixed inputs to the engine, never learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    out_dim: usize,
    in_dim: usize,
    weights: Vec<f64>,
    bias: Vec<f64>,
}

impl LinearParams {
    /// Build from explicit weight rows and bias.
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self> {
        let out_dim = weights.len();
        let in_dim = weights.first().map_or(0, Vec::len);
        if out_dim == 0 || in_dim == 0 {
            return Err(Error::Dimension {
                expected: "non-empty weight matrix".into(),
                got: format!("{out_dim} x {in_dim}"),
            });
        }
        if bias.len() != out_dim {
            return Err(Error::Dimension {
                expected: format!("bias of length {out_dim}"),
                got: format!("length {}", bias.len()),
            });
        }

        let mut flat = Vec::with_capacity(out_dim * in_dim);
        for (r, row) in weights.into_iter().enumerate() {
            if row.len() != in_dim {
                return Err(Error::Dimension {
                    expected: format!("{in_dim} columns in weight row {r}"),
                    got: row.len().to_string(),
                });
            }
            flat.extend(row);
        }

        Ok(Self { out_dim, in_dim, weights: flat, bias })
    }

    /// Every weight set to `weight`, every bias to `bias`.
    pub fn filled(out_dim: usize, in_dim: usize, weight: f64, bias: f64) -> Self {
        Self {
            out_dim,
            in_dim,
            weights: vec![weight; out_dim * in_dim],
            bias: vec![bias; out_dim],
        }
    }

    /// All-ones weights and zero bias: the reference parity parameters.
    pub fn ones(out_dim: usize, in_dim: usize) -> Self {
        Self::filled(out_dim, in_dim, 1.0, 0.0)
    }

    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    /// Weight row for output component `o`.
    pub fn row(&self, o: usize) -> &[f64] {
        &self.weights[o * self.in_dim..(o + 1) * self.in_dim]
    }

    /// Fail with `Error::Dimension` unless the map accepts `in_dim` inputs.
    pub fn check_input(&self, in_dim: usize) -> Result<()> {
        if self.in_dim != in_dim {
            return Err(Error::Dimension {
                expected: format!("weight matrix with {in_dim} columns"),
                got: format!("{} columns", self.in_dim),
            });
        }
        if self.bias.len() != self.out_dim {
            return Err(Error::Dimension {
                expected: format!("bias of length {}", self.out_dim),
                got: format!("length {}", self.bias.len()),
            });
        }
        Ok(())
    }

    /// `W x + b`. `x` must have `in_dim` components.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.in_dim);
        (0..self.out_dim)
            .map(|o| {
                let dot: f64 = self.row(o).iter().zip(x).map(|(w, v)| w * v).sum();
                dot + self.bias[o]
            })
            .collect()
    }
}
