//! Fixed-width batch inference
//!
//! Test rows are processed in chunks of exactly `batch_size`. When the row
//! count is not a multiple of the batch size the last chunk is filled with
//! copies of row 0. Which row fills the gap is arbitrary: outputs at padded
//! positions are dropped before returning.

use crate::core::{check_finite, Result, SVMError};
use crate::kernel::ReparameterizedKernelMap;
use crate::model::TrainableParams;
use ndarray::{Array1, ArrayView2, Axis};

/// Map a decision value to a label; zero (and NaN) map to -1
pub fn label_from_score(score: f64) -> f64 {
    if score > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Apply [`label_from_score`] to every score
pub fn labels_from_scores(scores: &Array1<f64>) -> Array1<f64> {
    scores.mapv(label_from_score)
}

/// Row indices 0..num_rows followed by zeros up to a multiple of `batch_size`
pub fn padded_indices(num_rows: usize, batch_size: usize) -> Vec<usize> {
    let padded_len = num_rows.div_ceil(batch_size) * batch_size;
    let mut indices: Vec<usize> = (0..num_rows).collect();
    indices.resize(padded_len, 0);
    indices
}

/// Read-only view over a fitted feature map and parameter set
pub struct BatchPredictor<'a> {
    map: &'a ReparameterizedKernelMap,
    params: &'a TrainableParams,
    batch_size: usize,
}

impl<'a> BatchPredictor<'a> {
    pub fn new(
        map: &'a ReparameterizedKernelMap,
        params: &'a TrainableParams,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(SVMError::InvalidParameter(
                "batch_size must be positive".to_string(),
            ));
        }
        Ok(Self {
            map,
            params,
            batch_size,
        })
    }

    /// Raw scores for every row of `x`, in order
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.map.input_dim() {
            return Err(SVMError::DimensionMismatch {
                expected: self.map.input_dim(),
                actual: x.ncols(),
            });
        }

        check_finite(x)?;

        let num_rows = x.nrows();
        if num_rows == 0 {
            return Ok(Array1::zeros(0));
        }

        let indices = padded_indices(num_rows, self.batch_size);
        let mut scores = Vec::with_capacity(indices.len());
        for chunk in indices.chunks(self.batch_size) {
            let batch = x.select(Axis(0), chunk);
            let features = self.map.transform(batch.view(), self.params.bandwidth())?;
            let batch_scores = self.params.linear().forward(features.view())?;
            scores.extend(batch_scores.iter().copied());
        }
        scores.truncate(num_rows);

        Ok(Array1::from_vec(scores))
    }

    /// Labels in {-1, +1} for every row of `x`
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        Ok(labels_from_scores(&self.decision_function(x)?))
    }
}
