//! Regularized hinge-loss objective
//!
//! objective = ½‖w‖² + trade_off · mean_i max(0, 1 - y_i s_i)
//!
//! This is the SVM primal, evaluated on the random feature embedding rather
//! than on a kernel Gram matrix.

use crate::core::{Result, SVMError};
use ndarray::{Array1, ArrayView1, Zip};

/// Components of one objective evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveValue {
    pub objective: f64,
    pub mean_hinge: f64,
    pub regularization: f64,
}

/// Hinge loss plus L2 penalty on the linear weights
#[derive(Debug, Clone, Copy)]
pub struct HingeObjective {
    trade_off: f64,
}

impl HingeObjective {
    pub fn new(trade_off: f64) -> Self {
        Self { trade_off }
    }

    pub fn trade_off(&self) -> f64 {
        self.trade_off
    }

    /// max(0, 1 - y s) per example
    pub fn hinge(scores: ArrayView1<f64>, labels: ArrayView1<f64>) -> Result<Array1<f64>> {
        check_lengths(scores, labels)?;
        Ok(Zip::from(&scores)
            .and(&labels)
            .map_collect(|&s, &y| (1.0 - y * s).max(0.0)))
    }

    pub fn evaluate(
        &self,
        scores: ArrayView1<f64>,
        labels: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> Result<ObjectiveValue> {
        let hinge = Self::hinge(scores, labels)?;
        let mean_hinge = hinge.mean().unwrap_or(0.0);
        let regularization = 0.5 * weights.dot(&weights);

        Ok(ObjectiveValue {
            objective: regularization + self.trade_off * mean_hinge,
            mean_hinge,
            regularization,
        })
    }

    /// ∂objective/∂s_i, excluding the regularizer
    ///
    /// -trade_off · y_i / N where the margin is violated, 0 elsewhere
    /// (including the kink at y s = 1).
    pub fn grad_wrt_scores(
        &self,
        scores: ArrayView1<f64>,
        labels: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        check_lengths(scores, labels)?;
        let n = scores.len().max(1) as f64;
        let scale = self.trade_off / n;
        Ok(Zip::from(&scores).and(&labels).map_collect(|&s, &y| {
            if 1.0 - y * s > 0.0 {
                -scale * y
            } else {
                0.0
            }
        }))
    }

    /// ∂(½‖w‖²)/∂w
    pub fn grad_wrt_weights(weights: ArrayView1<f64>) -> Array1<f64> {
        weights.to_owned()
    }
}

fn check_lengths(scores: ArrayView1<f64>, labels: ArrayView1<f64>) -> Result<()> {
    if scores.len() != labels.len() {
        return Err(SVMError::DimensionMismatch {
            expected: scores.len(),
            actual: labels.len(),
        });
    }
    Ok(())
}
