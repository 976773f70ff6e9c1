//! Core type definitions for the random-feature SVM

use crate::core::{Result, SVMError};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted `num_epochs`
///
/// The iteration count is a float product cast to `usize`, and that cast
/// saturates rather than failing.
pub const MAX_NUM_EPOCHS: f64 = 1e6;

/// One predicted row: the thresholded label and the score it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// -1 or +1; a score of exactly zero gives -1
    pub label: f64,
    /// s = φ(x)·w + b
    pub decision_value: f64,
}

impl Prediction {
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }
}

/// Hyperparameters fixed for the lifetime of a training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Weight of the mean hinge loss against the L2 regularizer
    pub trade_off: f64,
    /// Value every bandwidth entry starts from
    pub initial_bandwidth: f64,
    /// Rows per minibatch, also the fixed prediction batch width
    pub batch_size: usize,
    /// Number of random directions R (the embedding has 2R features)
    pub random_feature_dim: usize,
    /// Fixed gradient descent step size
    pub learning_rate: f64,
    /// Passes over the training set, may be fractional
    pub num_epochs: f64,
    /// Seed for random directions and minibatch sampling
    pub seed: Option<u64>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            trade_off: 1.0,
            initial_bandwidth: 1.0,
            batch_size: 10,
            random_feature_dim: 400,
            learning_rate: 1e-3,
            num_epochs: 2.0,
            seed: None,
        }
    }
}

impl Hyperparameters {
    /// Check every field, failing on the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SVMError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        if self.random_feature_dim == 0 {
            return Err(SVMError::InvalidParameter(
                "random_feature_dim must be positive".to_string(),
            ));
        }
        check_positive("learning_rate", self.learning_rate)?;
        check_positive("trade_off", self.trade_off)?;
        check_num_epochs(self.num_epochs)?;
        if !self.initial_bandwidth.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "initial_bandwidth must be finite, got: {}",
                self.initial_bandwidth
            )));
        }
        Ok(())
    }

    /// Parse hyperparameters from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| SVMError::ConfigError(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Load hyperparameters from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Number of gradient steps for a training set of `num_samples` rows
    pub fn num_iterations(&self, num_samples: usize) -> usize {
        iteration_count(self.num_epochs, num_samples, self.batch_size)
    }
}

/// floor(num_epochs * num_samples / batch_size); zero is a valid count
pub fn iteration_count(num_epochs: f64, num_samples: usize, batch_size: usize) -> usize {
    (num_epochs * num_samples as f64 / batch_size as f64).floor() as usize
}

/// Positive, finite and no larger than [`MAX_NUM_EPOCHS`]
pub fn check_num_epochs(num_epochs: f64) -> Result<()> {
    check_positive("num_epochs", num_epochs)?;
    if num_epochs > MAX_NUM_EPOCHS {
        return Err(SVMError::InvalidParameter(format!(
            "num_epochs must be at most {MAX_NUM_EPOCHS}, got: {num_epochs}"
        )));
    }
    Ok(())
}

/// Reject NaN and infinite entries, reporting the first one found
pub fn check_finite(x: ArrayView2<f64>) -> Result<()> {
    match x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(SVMError::NonFiniteValue { row, col, value }),
        None => Ok(()),
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SVMError::InvalidParameter(format!(
            "{name} must be positive and finite, got: {value}"
        )))
    }
}

/// Progress signal emitted once per training iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Total iterations scheduled for this session
    pub num_iterations: usize,
    /// Mean hinge loss over the minibatch, before the update
    pub mean_hinge: f64,
    /// Full objective (regularizer + trade_off * mean hinge), before the update
    pub objective: f64,
}
