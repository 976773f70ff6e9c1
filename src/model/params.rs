//! Trainable parameter set (γ, w, b) and matching gradients
//!
//! The random directions ε are deliberately not part of this set: they live in
//! the kernel map and the optimizer never sees them.

use crate::model::LinearDecisionModel;
use ndarray::{Array1, ArrayView1};

/// Everything gradient descent is allowed to update
#[derive(Debug, Clone, PartialEq)]
pub struct TrainableParams {
    pub(crate) bandwidth: Array1<f64>,
    pub(crate) linear: LinearDecisionModel,
}

impl TrainableParams {
    /// γ = initial_bandwidth everywhere, w = 0, b = 1
    pub fn initial(input_dim: usize, feature_dim: usize, initial_bandwidth: f64) -> Self {
        Self {
            bandwidth: Array1::from_elem(input_dim, initial_bandwidth),
            linear: LinearDecisionModel::new(feature_dim),
        }
    }

    pub fn bandwidth(&self) -> ArrayView1<f64> {
        self.bandwidth.view()
    }

    pub fn linear(&self) -> &LinearDecisionModel {
        &self.linear
    }

    pub fn weights(&self) -> ArrayView1<f64> {
        self.linear.weights()
    }

    pub fn bias(&self) -> f64 {
        self.linear.bias()
    }
}

/// ∂objective with respect to each trainable parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub bandwidth: Array1<f64>,
    pub weights: Array1<f64>,
    pub bias: f64,
}
