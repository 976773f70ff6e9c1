//! Linear decision function over the random feature embedding

use crate::core::{Result, SVMError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// score = φ · w + b
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDecisionModel {
    pub(crate) weights: Array1<f64>,
    pub(crate) bias: f64,
}

/// Gradients produced by [`LinearDecisionModel::backward`]
#[derive(Debug, Clone)]
pub struct LinearGradients {
    /// ∂L/∂w = φᵀ ∂s
    pub weights: Array1<f64>,
    /// ∂L/∂b = Σ ∂s
    pub bias: f64,
    /// ∂L/∂φ = ∂s ⊗ w, passed on to the feature map
    pub features: Array2<f64>,
}

impl LinearDecisionModel {
    /// Zero weights of width `feature_dim` and bias 1.0
    pub fn new(feature_dim: usize) -> Self {
        Self::from_parts(Array1::zeros(feature_dim), 1.0)
    }

    pub fn from_parts(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> ArrayView1<f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn feature_dim(&self) -> usize {
        self.weights.len()
    }

    /// Per-row decision score
    pub fn forward(&self, features: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.check_width(features)?;
        Ok(features.dot(&self.weights) + self.bias)
    }

    /// Back-propagate ∂L/∂score through the linear layer
    pub fn backward(
        &self,
        features: ArrayView2<f64>,
        grad_scores: ArrayView1<f64>,
    ) -> Result<LinearGradients> {
        self.check_width(features)?;
        if grad_scores.len() != features.nrows() {
            return Err(SVMError::DimensionMismatch {
                expected: features.nrows(),
                actual: grad_scores.len(),
            });
        }

        let weights = features.t().dot(&grad_scores);
        let bias = grad_scores.sum();
        let column = grad_scores.insert_axis(Axis(1));
        let row = self.weights.view().insert_axis(Axis(0));
        let features = column.dot(&row);

        Ok(LinearGradients {
            weights,
            bias,
            features,
        })
    }

    fn check_width(&self, features: ArrayView2<f64>) -> Result<()> {
        if features.ncols() != self.weights.len() {
            return Err(SVMError::DimensionMismatch {
                expected: self.weights.len(),
                actual: features.ncols(),
            });
        }
        Ok(())
    }
}
