//! Support Vector Machine on random Fourier features with a learnable bandwidth
//!
//! A Gaussian-kernel SVM is approximated by an explicit 2R-dimensional
//! cosine/sine embedding. The random directions are reparameterized as a frozen
//! noise matrix scaled by a per-dimension bandwidth, which lets minibatch
//! gradient descent tune the kernel width alongside the linear weights.

pub mod api;
pub mod core;
pub mod kernel;
pub mod model;
pub mod objective;
pub mod optimizer;
pub mod predict;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, ModelInfo, RepTrickSVM, RepTrickSVMBuilder};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::kernel::{
    Kernel, RBFKernel, RandomDirections, RandomFeatureSampler, ReparameterizedKernelMap,
};
pub use crate::model::{LinearDecisionModel, TrainableParams};
pub use crate::objective::{HingeObjective, ObjectiveValue};
pub use crate::optimizer::{GradientDescent, Optimizer};
pub use crate::predict::BatchPredictor;
pub use crate::solver::{MinibatchTrainer, TrainingResult};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
