//! High-level API for the random-feature SVM
//!
//! This module owns the model lifecycle: hyperparameters are fixed at
//! construction, `fit` draws fresh random directions and trains from scratch,
//! and `predict` runs padded fixed-width batches over the frozen state.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ndarray::array;
//! use rtsvm::api::RepTrickSVM;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let x = array![[1.0, 1.0], [1.2, 0.8], [-1.0, -1.0], [-0.9, -1.1]];
//! let y = array![1.0, 1.0, -1.0, -1.0];
//!
//! let mut svm = RepTrickSVM::builder()
//!     .with_batch_size(2)
//!     .with_random_feature_dim(200)
//!     .with_learning_rate(0.01)
//!     .with_num_epochs(20.0)
//!     .with_seed(42)
//!     .build()?;
//! svm.fit(x.view(), y.view())?;
//!
//! let labels = svm.predict(x.view())?;
//! println!("Accuracy: {:.2}%", svm.evaluate(x.view(), y.view())? * 100.0);
//! # let _ = labels;
//! # Ok(())
//! # }
//! ```

use crate::core::{
    Classifier, Hyperparameters, NoopObserver, Prediction, ProgressObserver, Result, SVMError,
};
use crate::kernel::{RandomDirections, RandomFeatureSampler, ReparameterizedKernelMap};
use crate::model::TrainableParams;
use crate::predict::BatchPredictor;
use crate::solver::{validate_training_data, MinibatchTrainer};
use log::info;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Everything created by `fit`; replaced wholesale on the next `fit`
#[derive(Debug, Clone)]
struct FittedState {
    map: ReparameterizedKernelMap,
    params: TrainableParams,
    iterations_run: usize,
}

/// SVM with random Fourier features and a learned per-dimension bandwidth
#[derive(Debug, Clone)]
pub struct RepTrickSVM {
    hyperparameters: Hyperparameters,
    rng: StdRng,
    state: Option<FittedState>,
}

impl RepTrickSVM {
    /// Create an untrained model, rejecting invalid hyperparameters
    pub fn new(hyperparameters: Hyperparameters) -> Result<Self> {
        hyperparameters.validate()?;
        let rng = match hyperparameters.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            hyperparameters,
            rng,
            state: None,
        })
    }

    /// Start from default hyperparameters
    pub fn builder() -> RepTrickSVMBuilder {
        RepTrickSVMBuilder::default()
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    /// Train from scratch on `x` (N x D) and labels `y` in {-1, +1}
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        self.fit_with_observer(x, y, &mut NoopObserver)
    }

    /// Train from scratch, reporting every iteration to `observer`
    ///
    /// Inputs are validated before the previous fitted state is touched, so a
    /// rejected call leaves an earlier model usable.
    pub fn fit_with_observer<P>(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        observer: &mut P,
    ) -> Result<()>
    where
        P: ProgressObserver + ?Sized,
    {
        let input_dim = x.ncols();
        validate_training_data(x, y, input_dim)?;

        let hp = &self.hyperparameters;
        let sampler = RandomFeatureSampler::new(hp.random_feature_dim, input_dim)?;
        let mut trainer = MinibatchTrainer::with_gradient_descent(
            hp.trade_off,
            hp.learning_rate,
            hp.batch_size,
            hp.num_epochs,
        )?;

        info!(
            "Building random feature map: input_dim={}, random_feature_dim={}, scheduled iterations={}",
            input_dim,
            hp.random_feature_dim,
            hp.num_iterations(x.nrows())
        );
        let map = ReparameterizedKernelMap::new(sampler.sample(&mut self.rng));
        let mut params =
            TrainableParams::initial(input_dim, map.feature_dim(), hp.initial_bandwidth);

        let result = trainer.train(&map, &mut params, x, y, &mut self.rng, observer)?;

        self.state = Some(FittedState {
            map,
            params,
            iterations_run: result.iterations,
        });
        Ok(())
    }

    /// Labels in {-1, +1}; a zero score maps to -1
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.predictor()?.predict(x)
    }

    /// Raw decision values
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.predictor()?.decision_function(x)
    }

    /// Label and decision value per row
    pub fn predict_detailed(&self, x: ArrayView2<f64>) -> Result<Vec<Prediction>> {
        let scores = self.decision_function(x)?;
        Ok(scores
            .iter()
            .map(|&s| Prediction::new(crate::predict::label_from_score(s), s))
            .collect())
    }

    /// Fraction of rows whose predicted label equals `y`
    pub fn evaluate(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<f64> {
        Ok(self.evaluate_detailed(x, y)?.accuracy())
    }

    /// Confusion counts against the true labels
    pub fn evaluate_detailed(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
    ) -> Result<EvaluationMetrics> {
        if x.nrows() != y.len() {
            return Err(SVMError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        let predictions = self.predict(x)?;

        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (&pred, &actual) in predictions.iter().zip(y.iter()) {
            match (pred > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        Ok(EvaluationMetrics::new(tp, tn, fp, fn_))
    }

    /// Summary of the fitted state
    pub fn info(&self) -> Result<ModelInfo> {
        let state = self.fitted()?;
        let bandwidth = state.params.bandwidth();
        let weights = state.params.weights();
        Ok(ModelInfo {
            input_dim: state.map.input_dim(),
            random_feature_dim: state.map.directions().random_feature_dim(),
            iterations_run: state.iterations_run,
            bias: state.params.bias(),
            weight_norm: weights.dot(&weights).sqrt(),
            bandwidth_min: bandwidth.iter().copied().fold(f64::INFINITY, f64::min),
            bandwidth_max: bandwidth.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            bandwidth_mean: bandwidth.mean().unwrap_or(0.0),
        })
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Input dimension fixed by the last `fit`
    pub fn input_dim(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.map.input_dim())
    }

    pub fn iterations_run(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.iterations_run)
    }

    /// Frozen random directions ε of the current session
    pub fn random_directions(&self) -> Option<&RandomDirections> {
        self.state.as_ref().map(|s| s.map.directions())
    }

    /// Learned bandwidth γ
    pub fn bandwidth(&self) -> Option<ArrayView1<f64>> {
        self.state.as_ref().map(|s| s.params.bandwidth())
    }

    pub fn weights(&self) -> Option<ArrayView1<f64>> {
        self.state.as_ref().map(|s| s.params.weights())
    }

    pub fn bias(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.params.bias())
    }

    fn fitted(&self) -> Result<&FittedState> {
        self.state.as_ref().ok_or(SVMError::ModelNotTrained)
    }

    fn predictor(&self) -> Result<BatchPredictor<'_>> {
        let state = self.fitted()?;
        BatchPredictor::new(&state.map, &state.params, self.hyperparameters.batch_size)
    }
}

impl Classifier for RepTrickSVM {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        RepTrickSVM::fit(self, x, y)
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        RepTrickSVM::predict(self, x)
    }

    fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        RepTrickSVM::decision_function(self, x)
    }
}

/// Builder over [`Hyperparameters`]; validation happens in `build`
#[derive(Debug, Clone, Default)]
pub struct RepTrickSVMBuilder {
    hyperparameters: Hyperparameters,
}

impl RepTrickSVMBuilder {
    /// Set the hinge loss weight
    pub fn with_trade_off(mut self, trade_off: f64) -> Self {
        self.hyperparameters.trade_off = trade_off;
        self
    }

    /// Set the starting value of every bandwidth entry
    pub fn with_initial_bandwidth(mut self, initial_bandwidth: f64) -> Self {
        self.hyperparameters.initial_bandwidth = initial_bandwidth;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.hyperparameters.batch_size = batch_size;
        self
    }

    /// Set R, the number of random directions
    pub fn with_random_feature_dim(mut self, random_feature_dim: usize) -> Self {
        self.hyperparameters.random_feature_dim = random_feature_dim;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.hyperparameters.learning_rate = learning_rate;
        self
    }

    pub fn with_num_epochs(mut self, num_epochs: f64) -> Self {
        self.hyperparameters.num_epochs = num_epochs;
        self
    }

    /// Make random directions and minibatch sampling reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.hyperparameters.seed = Some(seed);
        self
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn build(self) -> Result<RepTrickSVM> {
        RepTrickSVM::new(self.hyperparameters)
    }
}

/// Confusion counts over ±1 labels; +1 is the positive class
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Share of rows whose predicted ±1 label matches the true one
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// TP / (TP + FP), with +1 as the positive class
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// TN / (TN + FP), the recall of the -1 class
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub input_dim: usize,
    pub random_feature_dim: usize,
    pub iterations_run: usize,
    pub bias: f64,
    pub weight_norm: f64,
    pub bandwidth_min: f64,
    pub bandwidth_max: f64,
    pub bandwidth_mean: f64,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Fit on the training split and return predicted labels for the test split
    pub fn fit_predict(
        hyperparameters: Hyperparameters,
        x_train: ArrayView2<f64>,
        y_train: ArrayView1<f64>,
        x_test: ArrayView2<f64>,
    ) -> Result<Array1<f64>> {
        let mut svm = RepTrickSVM::new(hyperparameters)?;
        svm.fit(x_train, y_train)?;
        svm.predict(x_test)
    }

    /// Fit on the training split and return test accuracy
    pub fn evaluate_split(
        hyperparameters: Hyperparameters,
        x_train: ArrayView2<f64>,
        y_train: ArrayView1<f64>,
        x_test: ArrayView2<f64>,
        y_test: ArrayView1<f64>,
    ) -> Result<f64> {
        let mut svm = RepTrickSVM::new(hyperparameters)?;
        svm.fit(x_train, y_train)?;
        svm.evaluate(x_test, y_test)
    }
}
