//! Core traits for the random-feature SVM

use crate::core::{IterationReport, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Binary classifier over dense row-major inputs
pub trait Classifier {
    /// Train on `x` (N x D) with signed labels `y` (length N)
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()>;

    /// Predict a label in {-1, +1} for every row of `x`
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;

    /// Raw decision values for every row of `x`
    fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}

/// Sink for per-iteration training progress
pub trait ProgressObserver {
    fn on_iteration(&mut self, report: &IterationReport);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&IterationReport),
{
    fn on_iteration(&mut self, report: &IterationReport) {
        self(report)
    }
}

/// Observer that discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_iteration(&mut self, _report: &IterationReport) {}
}

/// Observer that records every report in order
#[derive(Debug, Default, Clone)]
pub struct LossHistory {
    reports: Vec<IterationReport>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded reports
    pub fn reports(&self) -> &[IterationReport] {
        &self.reports
    }

    /// Mean hinge loss per iteration
    pub fn mean_hinge(&self) -> Vec<f64> {
        self.reports.iter().map(|r| r.mean_hinge).collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl ProgressObserver for LossHistory {
    fn on_iteration(&mut self, report: &IterationReport) {
        self.reports.push(*report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(iteration: usize, mean_hinge: f64) -> IterationReport {
        IterationReport {
            iteration,
            num_iterations: 2,
            mean_hinge,
            objective: mean_hinge,
        }
    }

    #[test]
    fn test_loss_history_records_in_order() {
        let mut history = LossHistory::new();
        assert!(history.is_empty());

        history.on_iteration(&report(0, 1.0));
        history.on_iteration(&report(1, 0.5));

        assert_eq!(history.len(), 2);
        assert_eq!(history.mean_hinge(), vec![1.0, 0.5]);
        assert_eq!(history.reports()[1].iteration, 1);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |r: &IterationReport| seen.push(r.iteration);
            observer.on_iteration(&report(3, 0.2));
        }
        assert_eq!(seen, vec![3]);
    }
}
