//! Integration tests for the rtsvm library
//!
//! These tests exercise the public fit/predict lifecycle end to end and check
//! the behavioural guarantees of the random-feature model.

use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rtsvm::api::RepTrickSVM;
use rtsvm::utils::synthetic;
use rtsvm::{Hyperparameters, LossHistory, RandomFeatureSampler, SVMError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hyperparameters(seed: u64) -> Hyperparameters {
    Hyperparameters {
        trade_off: 1.0,
        initial_bandwidth: 1.0,
        batch_size: 10,
        random_feature_dim: 100,
        learning_rate: 0.01,
        num_epochs: 10.0,
        seed: Some(seed),
    }
}

/// Complete workflow: fit -> predict -> evaluate on separable clusters
#[test]
fn test_complete_workflow_two_clusters() {
    init_logger();
    let (x, y) = synthetic::two_clusters(50, 2.0, 0.4, 1);
    let mut svm = RepTrickSVM::new(hyperparameters(2)).expect("valid");

    svm.fit(x.view(), y.view()).expect("Training should succeed");

    let accuracy = svm.evaluate(x.view(), y.view()).expect("trained");
    assert!(
        accuracy >= 0.9,
        "Accuracy should be at least 90% for separated clusters, got: {}",
        accuracy
    );

    let metrics = svm.evaluate_detailed(x.view(), y.view()).expect("trained");
    assert!(metrics.precision() >= 0.8);
    assert!(metrics.recall() >= 0.8);
}

/// Random features handle a problem no linear model can
#[test]
fn test_xor_is_learnable() {
    init_logger();
    let (x, y) = synthetic::xor(50, 1.5, 0.3, 3);
    let mut svm = RepTrickSVM::new(Hyperparameters {
        num_epochs: 30.0,
        random_feature_dim: 200,
        ..hyperparameters(4)
    })
    .expect("valid");

    svm.fit(x.view(), y.view()).expect("Training should succeed");

    let accuracy = svm.evaluate(x.view(), y.view()).expect("trained");
    assert!(accuracy >= 0.8, "XOR accuracy too low: {}", accuracy);
}

/// Mean hinge loss at the end of training is below the start
#[test]
fn test_training_reduces_loss() {
    init_logger();
    let (x, y) = synthetic::two_clusters(50, 2.0, 0.4, 5);
    let mut svm = RepTrickSVM::new(hyperparameters(6)).expect("valid");
    let mut history = LossHistory::new();

    svm.fit_with_observer(x.view(), y.view(), &mut history)
        .expect("Training should succeed");

    let losses = history.mean_hinge();
    // floor(10 * 100 / 10) = 100
    assert_eq!(losses.len(), 100);

    let window = 10;
    let head = losses[..window].iter().sum::<f64>() / window as f64;
    let tail = losses[losses.len() - window..].iter().sum::<f64>() / window as f64;
    assert!(tail < head, "loss did not decrease: head {head}, tail {tail}");
    assert!(losses[losses.len() - 1] < losses[0]);
}

/// M labels back for M rows, whatever M is relative to the batch size
#[test]
fn test_predict_returns_exactly_m_labels() {
    let (x, y) = synthetic::two_clusters(10, 2.0, 0.3, 7);
    let mut svm = RepTrickSVM::new(hyperparameters(8)).expect("valid");
    svm.fit(x.view(), y.view()).expect("fit");

    // D = 2, batch_size = 10, M = 3
    let x_test = array![[1.0, 2.0], [-1.5, -0.5], [0.1, 0.0]];
    let labels = svm.predict(x_test.view()).expect("trained");
    assert_eq!(labels.len(), 3);
    assert!(labels.iter().all(|&l| l == 1.0 || l == -1.0));

    for m in [1, 9, 10, 11, 19, 20, 21] {
        let x_test = Array2::from_shape_fn((m, 2), |(i, j)| i as f64 * 0.1 - j as f64);
        assert_eq!(svm.predict(x_test.view()).expect("trained").len(), m);
    }
}

/// Predictions do not depend on how rows are grouped into batches
#[test]
fn test_predict_matches_row_by_row() {
    let (x, y) = synthetic::two_clusters(10, 2.0, 0.3, 9);
    let mut svm = RepTrickSVM::new(hyperparameters(10)).expect("valid");
    svm.fit(x.view(), y.view()).expect("fit");

    let all = svm.decision_function(x.view()).expect("trained");
    for i in 0..x.nrows() {
        let single = svm
            .decision_function(x.slice(ndarray::s![i..i + 1, ..]))
            .expect("trained");
        assert!((single[0] - all[i]).abs() < 1e-9);
    }
}

/// Predict is pure: repeated calls agree and parameters do not move
#[test]
fn test_predict_is_idempotent() {
    let (x, y) = synthetic::two_clusters(10, 2.0, 0.3, 11);
    let mut svm = RepTrickSVM::new(hyperparameters(12)).expect("valid");
    svm.fit(x.view(), y.view()).expect("fit");

    let bandwidth_before = svm.bandwidth().expect("trained").to_owned();
    let weights_before = svm.weights().expect("trained").to_owned();

    let first = svm.predict(x.view()).expect("trained");
    let second = svm.predict(x.view()).expect("trained");
    assert_eq!(first, second);

    assert_eq!(svm.bandwidth().expect("trained"), bandwidth_before.view());
    assert_eq!(svm.weights().expect("trained"), weights_before.view());
}

/// A second fit redraws ε and starts the parameters over
#[test]
fn test_refit_redraws_random_directions() {
    let (x, y) = synthetic::two_clusters(10, 2.0, 0.3, 13);
    let mut svm = RepTrickSVM::new(hyperparameters(14)).expect("valid");

    svm.fit(x.view(), y.view()).expect("first fit");
    let first = svm.random_directions().expect("trained").clone();

    svm.fit(x.view(), y.view()).expect("second fit");
    let second = svm.random_directions().expect("trained").clone();

    assert_eq!(first.view().dim(), second.view().dim());
    assert_ne!(first, second);
}

/// A refit may change the input dimension; predict then follows the new one
#[test]
fn test_refit_with_new_dimension() {
    let (x, y) = synthetic::two_clusters(10, 2.0, 0.3, 15);
    let mut svm = RepTrickSVM::new(hyperparameters(16)).expect("valid");
    svm.fit(x.view(), y.view()).expect("fit");
    assert_eq!(svm.input_dim(), Some(2));

    let x3 = Array2::from_shape_fn((20, 3), |(i, j)| x[[i, j % 2]]);
    svm.fit(x3.view(), y.view()).expect("refit");
    assert_eq!(svm.input_dim(), Some(3));
    assert!(matches!(
        svm.predict(x.view()),
        Err(SVMError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

/// Fewer samples than one batch: zero iterations, parameters at their start
#[test]
fn test_degenerate_iteration_count() {
    let x = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]];
    let y = array![1.0, -1.0, 1.0];
    let mut svm = RepTrickSVM::new(Hyperparameters {
        num_epochs: 2.0,
        batch_size: 10,
        initial_bandwidth: 0.75,
        ..hyperparameters(17)
    })
    .expect("valid");
    let mut history = LossHistory::new();

    svm.fit_with_observer(x.view(), y.view(), &mut history)
        .expect("zero iterations is not an error");

    assert!(svm.is_trained());
    assert_eq!(svm.iterations_run(), Some(0));
    assert!(history.is_empty());
    assert!(svm.bandwidth().expect("trained").iter().all(|&g| g == 0.75));
    assert!(svm.weights().expect("trained").iter().all(|&w| w == 0.0));
    assert_eq!(svm.bias(), Some(1.0));

    // Every score is the bias, so every label is +1
    let labels = svm.predict(x.view()).expect("trained");
    assert!(labels.iter().all(|&l| l == 1.0));
}

/// Same seed, same data: identical models
#[test]
fn test_seeded_training_is_reproducible() {
    let (x, y) = synthetic::two_clusters(20, 2.0, 0.3, 18);

    let mut a = RepTrickSVM::new(hyperparameters(19)).expect("valid");
    let mut b = RepTrickSVM::new(hyperparameters(19)).expect("valid");
    a.fit(x.view(), y.view()).expect("fit");
    b.fit(x.view(), y.view()).expect("fit");

    assert_eq!(a.random_directions(), b.random_directions());
    assert_eq!(a.weights(), b.weights());
    assert_eq!(a.bandwidth(), b.bandwidth());
    assert_eq!(a.bias(), b.bias());
}

/// Each failure mode surfaces as its own error variant
#[test]
fn test_error_kinds_are_distinct() {
    assert!(matches!(
        RepTrickSVM::new(Hyperparameters {
            batch_size: 0,
            ..Default::default()
        }),
        Err(SVMError::InvalidParameter(_))
    ));

    let mut svm = RepTrickSVM::new(hyperparameters(20)).expect("valid");
    assert!(matches!(
        svm.predict(Array2::zeros((1, 2)).view()),
        Err(SVMError::ModelNotTrained)
    ));

    let x = array![[0.0, 1.0], [1.0, 0.0]];
    assert!(matches!(
        svm.fit(x.view(), array![1.0].view()),
        Err(SVMError::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    ));
    assert!(matches!(
        svm.fit(x.view(), array![1.0, 0.0].view()),
        Err(SVMError::InvalidLabel(_))
    ));
    assert!(matches!(
        svm.fit(Array2::zeros((0, 2)).view(), ndarray::Array1::zeros(0).view()),
        Err(SVMError::EmptyDataset)
    ));
    assert!(!svm.is_trained());
}

/// Training moves γ away from its start while ε stays the matrix drawn at fit
#[test]
fn test_fit_learns_bandwidth_over_frozen_directions() {
    init_logger();
    let (x, y) = synthetic::two_clusters(30, 1.0, 0.5, 21);
    let hp = Hyperparameters {
        initial_bandwidth: 1.0,
        ..hyperparameters(22)
    };
    let mut svm = RepTrickSVM::new(hp.clone()).expect("valid");
    svm.fit(x.view(), y.view()).expect("fit");

    // floor(10 * 60 / 10) = 60
    assert_eq!(svm.iterations_run(), Some(60));
    let bandwidth = svm.bandwidth().expect("trained");
    assert!(bandwidth.iter().all(|g| g.is_finite()));
    assert!(
        bandwidth.iter().any(|&g| (g - hp.initial_bandwidth).abs() > 1e-9),
        "bandwidth never left its initial value: {bandwidth}"
    );

    // The first draw from a fresh seeded RNG is the sampler call inside fit
    let mut rng = StdRng::seed_from_u64(22);
    let expected = RandomFeatureSampler::new(hp.random_feature_dim, 2)
        .expect("valid")
        .sample(&mut rng);
    assert_eq!(svm.random_directions(), Some(&expected));

    svm.predict(x.view()).expect("trained");
    assert_eq!(svm.random_directions(), Some(&expected));
}

/// NaN or infinite features are rejected instead of poisoning γ
#[test]
fn test_non_finite_features_are_rejected() {
    let x = array![[f64::NAN, 1.0], [1.0, 0.0], [0.5, 0.5], [2.0, 2.0]];
    let y = array![1.0, -1.0, 1.0, -1.0];
    let mut svm = RepTrickSVM::new(Hyperparameters {
        batch_size: 2,
        num_epochs: 5.0,
        ..hyperparameters(23)
    })
    .expect("valid");

    assert!(matches!(
        svm.fit(x.view(), y.view()),
        Err(SVMError::NonFiniteValue { row: 0, col: 0, .. })
    ));
    assert!(!svm.is_trained());

    let clean = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5], [2.0, 2.0]];
    svm.fit(clean.view(), y.view()).expect("fit");
    assert!(svm
        .bandwidth()
        .expect("trained")
        .iter()
        .all(|g| g.is_finite()));
    assert!(matches!(
        svm.predict(array![[1.0, 0.0], [2.0, f64::INFINITY]].view()),
        Err(SVMError::NonFiniteValue { row: 1, col: 1, .. })
    ));
}
