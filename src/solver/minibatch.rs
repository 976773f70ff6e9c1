//! Minibatch gradient descent trainer
//!
//! Each iteration draws `batch_size` row indices uniformly with replacement,
//! runs the feature map, linear model and objective forward, back-propagates
//! in reverse order and applies one optimizer step to (γ, w, b).

use crate::core::{
    check_finite, check_num_epochs, iteration_count, IterationReport, ProgressObserver, Result,
    SVMError,
};
use crate::kernel::ReparameterizedKernelMap;
use crate::model::{Gradients, TrainableParams};
use crate::objective::{HingeObjective, ObjectiveValue};
use crate::optimizer::{GradientDescent, Optimizer};
use log::{debug, info, warn};
use ndarray::{ArrayView1, ArrayView2, Axis};
use rand::Rng;

/// Summary of a finished training session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingResult {
    /// Number of optimizer steps taken
    pub iterations: usize,
    /// Mean hinge loss of the last minibatch, if any step ran
    pub final_mean_hinge: Option<f64>,
    /// Objective of the last minibatch, if any step ran
    pub final_objective: Option<f64>,
}

/// Drives the sample → forward → backward → update loop
pub struct MinibatchTrainer<O: Optimizer = GradientDescent> {
    objective: HingeObjective,
    optimizer: O,
    batch_size: usize,
    num_epochs: f64,
}

impl MinibatchTrainer<GradientDescent> {
    /// Trainer with plain gradient descent at a fixed learning rate
    pub fn with_gradient_descent(
        trade_off: f64,
        learning_rate: f64,
        batch_size: usize,
        num_epochs: f64,
    ) -> Result<Self> {
        Self::new(
            HingeObjective::new(trade_off),
            GradientDescent::new(learning_rate)?,
            batch_size,
            num_epochs,
        )
    }
}

impl<O: Optimizer> MinibatchTrainer<O> {
    pub fn new(
        objective: HingeObjective,
        optimizer: O,
        batch_size: usize,
        num_epochs: f64,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(SVMError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        check_num_epochs(num_epochs)?;
        Ok(Self {
            objective,
            optimizer,
            batch_size,
            num_epochs,
        })
    }

    /// floor(num_epochs * N / batch_size)
    pub fn num_iterations(&self, num_samples: usize) -> usize {
        iteration_count(self.num_epochs, num_samples, self.batch_size)
    }

    /// Run the full training loop
    ///
    /// Inputs are validated before anything is mutated. A zero iteration
    /// count is a valid outcome that leaves `params` untouched.
    pub fn train<G, P>(
        &mut self,
        map: &ReparameterizedKernelMap,
        params: &mut TrainableParams,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        rng: &mut G,
        observer: &mut P,
    ) -> Result<TrainingResult>
    where
        G: Rng + ?Sized,
        P: ProgressObserver + ?Sized,
    {
        validate_training_data(x, y, map.input_dim())?;

        let n = x.nrows();
        let num_iterations = self.num_iterations(n);
        info!(
            "Training on {} samples with {} dimensions for {} iterations (batch_size={}, trade_off={})",
            n,
            x.ncols(),
            num_iterations,
            self.batch_size,
            self.objective.trade_off()
        );
        if num_iterations == 0 {
            warn!(
                "num_epochs * N / batch_size < 1; no training iterations will run ({} * {} / {})",
                self.num_epochs, n, self.batch_size
            );
        }

        let mut last: Option<ObjectiveValue> = None;
        for iteration in 0..num_iterations {
            let indices: Vec<usize> = (0..self.batch_size)
                .map(|_| rng.gen_range(0..n))
                .collect();
            let batch_x = x.select(Axis(0), &indices);
            let batch_y = y.select(Axis(0), &indices);

            let (value, grads) = objective_and_gradients(
                map,
                &self.objective,
                params,
                batch_x.view(),
                batch_y.view(),
            )?;
            self.optimizer.step(params, &grads)?;

            debug!("Iter {}: loss={}", iteration, value.mean_hinge);
            observer.on_iteration(&IterationReport {
                iteration,
                num_iterations,
                mean_hinge: value.mean_hinge,
                objective: value.objective,
            });
            last = Some(value);
        }

        let result = TrainingResult {
            iterations: num_iterations,
            final_mean_hinge: last.map(|v| v.mean_hinge),
            final_objective: last.map(|v| v.objective),
        };
        if let Some(loss) = result.final_mean_hinge {
            info!(
                "Training completed after {} iterations, final loss={:.6}",
                num_iterations, loss
            );
        }
        Ok(result)
    }
}

/// Forward and backward pass over one batch
///
/// Returns the objective evaluated at the current parameters together with
/// its gradient with respect to γ, w and b.
pub fn objective_and_gradients(
    map: &ReparameterizedKernelMap,
    objective: &HingeObjective,
    params: &TrainableParams,
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
) -> Result<(ObjectiveValue, Gradients)> {
    let forward = map.forward(x, params.bandwidth())?;
    let scores = params.linear().forward(forward.features.view())?;
    let value = objective.evaluate(scores.view(), y, params.weights())?;

    let grad_scores = objective.grad_wrt_scores(scores.view(), y)?;
    let linear_grads = params
        .linear()
        .backward(forward.features.view(), grad_scores.view())?;
    let grad_bandwidth = map.backward(x, &forward, linear_grads.features.view())?;

    let grad_weights = linear_grads.weights + HingeObjective::grad_wrt_weights(params.weights());

    Ok((
        value,
        Gradients {
            bandwidth: grad_bandwidth,
            weights: grad_weights,
            bias: linear_grads.bias,
        },
    ))
}

/// Shape and label checks shared by every training entry point
pub fn validate_training_data(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    input_dim: usize,
) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(SVMError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(SVMError::EmptyDataset);
    }
    if x.ncols() != input_dim {
        return Err(SVMError::DimensionMismatch {
            expected: input_dim,
            actual: x.ncols(),
        });
    }
    check_finite(x)?;
    if let Some(&label) = y.iter().find(|&&label| label != 1.0 && label != -1.0) {
        return Err(SVMError::InvalidLabel(label));
    }
    Ok(())
}
