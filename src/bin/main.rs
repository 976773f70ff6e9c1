//! rtsvm demo
//!
//! Trains the random-feature SVM on a synthetic XOR problem and reports
//! held-out accuracy. Hyperparameters come from the JSON file named by
//! `RTSVM_CONFIG` when set, otherwise a demo configuration is used.
//! Log verbosity follows `RUST_LOG` (default: info).

use env_logger::Env;
use log::{error, info};
use ndarray::{s, Axis};
use rtsvm::utils::synthetic;
use rtsvm::{Hyperparameters, IterationReport, RepTrickSVM, Result};
use std::process;

const CONFIG_ENV: &str = "RTSVM_CONFIG";

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_hyperparameters() -> Result<Hyperparameters> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            info!("Loading hyperparameters from {path:?}");
            Hyperparameters::from_file(path)
        }
        None => Ok(Hyperparameters {
            batch_size: 20,
            random_feature_dim: 200,
            learning_rate: 0.01,
            num_epochs: 20.0,
            seed: Some(7),
            ..Default::default()
        }),
    }
}

fn run() -> Result<()> {
    let hyperparameters = load_hyperparameters()?;
    info!("Hyperparameters: {hyperparameters:?}");

    let (x, y) = synthetic::xor(100, 1.5, 0.4, 11);
    let split = x.nrows() * 4 / 5;
    let (x_train, x_test) = (x.slice(s![..split, ..]), x.slice(s![split.., ..]));
    let (y_train, y_test) = (y.slice(s![..split]), y.slice(s![split..]));
    info!(
        "Training rows: {}, test rows: {}",
        x_train.len_of(Axis(0)),
        x_test.len_of(Axis(0))
    );

    let mut svm = RepTrickSVM::new(hyperparameters)?;
    let mut report_every = |report: &IterationReport| {
        if report.iteration % 50 == 0 || report.iteration + 1 == report.num_iterations {
            info!(
                "Iter {}/{}: loss={:.6} objective={:.6}",
                report.iteration, report.num_iterations, report.mean_hinge, report.objective
            );
        }
    };
    svm.fit_with_observer(x_train, y_train, &mut report_every)?;

    let model_info = svm.info()?;
    let metrics = svm.evaluate_detailed(x_test, y_test)?;

    println!("=== Random-Feature SVM ===");
    println!("Iterations:      {}", model_info.iterations_run);
    println!("Bias:            {:.6}", model_info.bias);
    println!("Weight norm:     {:.6}", model_info.weight_norm);
    println!(
        "Bandwidth:       min {:.4} / mean {:.4} / max {:.4}",
        model_info.bandwidth_min, model_info.bandwidth_mean, model_info.bandwidth_max
    );
    println!("\nTest Results:");
    println!("  Accuracy:        {:.2}%", metrics.accuracy() * 100.0);
    println!("  Precision:       {:.4}", metrics.precision());
    println!("  Recall:          {:.4}", metrics.recall());
    println!("  F1 Score:        {:.4}", metrics.f1_score());

    Ok(())
}
