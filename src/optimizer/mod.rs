//! Parameter update rules
//!
//! An optimizer only ever receives the trainable set (γ, w, b); the frozen
//! random directions are unreachable from here.

use crate::core::{Result, SVMError};
use crate::model::{Gradients, TrainableParams};

/// Applies one update given the current gradients
pub trait Optimizer {
    fn step(&mut self, params: &mut TrainableParams, grads: &Gradients) -> Result<()>;
}

/// Plain gradient descent: θ ← θ - η ∇θ, with no momentum, decay or schedule
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "learning_rate must be positive and finite, got: {learning_rate}"
            )));
        }
        Ok(Self { learning_rate })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Optimizer for GradientDescent {
    fn step(&mut self, params: &mut TrainableParams, grads: &Gradients) -> Result<()> {
        if grads.bandwidth.len() != params.bandwidth.len() {
            return Err(SVMError::DimensionMismatch {
                expected: params.bandwidth.len(),
                actual: grads.bandwidth.len(),
            });
        }
        if grads.weights.len() != params.linear.weights.len() {
            return Err(SVMError::DimensionMismatch {
                expected: params.linear.weights.len(),
                actual: grads.weights.len(),
            });
        }

        let lr = self.learning_rate;
        params.bandwidth.scaled_add(-lr, &grads.bandwidth);
        params.linear.weights.scaled_add(-lr, &grads.weights);
        params.linear.bias -= lr * grads.bias;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_invalid_learning_rate() {
        assert!(GradientDescent::new(0.0).is_err());
        assert!(GradientDescent::new(-1.0).is_err());
        assert!(GradientDescent::new(f64::NAN).is_err());
        assert_eq!(GradientDescent::new(0.1).expect("valid").learning_rate(), 0.1);
    }

    #[test]
    fn test_step_updates_all_params() {
        let mut params = TrainableParams::initial(2, 4, 1.0);
        let grads = Gradients {
            bandwidth: array![1.0, -2.0],
            weights: array![0.5, 0.0, -0.5, 1.0],
            bias: 4.0,
        };

        let mut optimizer = GradientDescent::new(0.1).expect("valid");
        optimizer.step(&mut params, &grads).expect("shapes match");

        assert_abs_diff_eq!(params.bandwidth()[0], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(params.bandwidth()[1], 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(params.weights()[0], -0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(params.weights()[3], -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(params.bias(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_step_shape_mismatch_leaves_params_untouched() {
        let mut params = TrainableParams::initial(2, 4, 1.0);
        let before = params.clone();
        let grads = Gradients {
            bandwidth: array![1.0],
            weights: array![0.0, 0.0, 0.0, 0.0],
            bias: 1.0,
        };

        let mut optimizer = GradientDescent::new(0.1).expect("valid");
        assert!(optimizer.step(&mut params, &grads).is_err());
        assert_eq!(params, before);
    }
}
