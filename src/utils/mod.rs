//! Utility functions for random-feature SVM experiments

use crate::core::Result;
use crate::kernel::{Kernel, RBFKernel, ReparameterizedKernelMap};
use ndarray::{ArrayView1, ArrayView2};

/// Seeded synthetic datasets for tests, benches and demos
pub mod synthetic {
    use ndarray::{Array1, Array2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    /// Two Gaussian blobs in 2D centered at (+c, +c) and (-c, -c)
    ///
    /// Rows alternate +1, -1, +1, ... so any prefix is roughly balanced.
    /// Returns `2 * n_per_class` rows.
    pub fn two_clusters(
        n_per_class: usize,
        center: f64,
        std_dev: f64,
        seed: u64,
    ) -> (Array2<f64>, Array1<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = 2 * n_per_class;
        let mut x = Array2::zeros((n, 2));
        let mut y = Array1::zeros(n);

        for i in 0..n {
            let label = if i % 2 == 0 { 1.0 } else { -1.0 };
            for d in 0..2 {
                let noise: f64 = rng.sample(StandardNormal);
                x[[i, d]] = label * center + std_dev * noise;
            }
            y[i] = label;
        }
        (x, y)
    }

    /// XOR layout: blobs at (±c, ±c), labelled +1 when both signs agree
    ///
    /// Not linearly separable in the input space. Returns `4 * n_per_blob`
    /// rows.
    pub fn xor(
        n_per_blob: usize,
        center: f64,
        std_dev: f64,
        seed: u64,
    ) -> (Array2<f64>, Array1<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let corners = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
        let n = 4 * n_per_blob;
        let mut x = Array2::zeros((n, 2));
        let mut y = Array1::zeros(n);

        for i in 0..n {
            let (sx, sy) = corners[i % 4];
            let nx: f64 = rng.sample(StandardNormal);
            let ny: f64 = rng.sample(StandardNormal);
            x[[i, 0]] = sx * center + std_dev * nx;
            x[[i, 1]] = sy * center + std_dev * ny;
            y[i] = if sx * sy > 0.0 { 1.0 } else { -1.0 };
        }
        (x, y)
    }
}

/// Mean squared error between φ(X)φ(X)ᵀ / R and the exact Gaussian Gram matrix
///
/// Shrinks towards zero as R grows; useful for picking `random_feature_dim`.
pub fn kernel_approximation_error(
    map: &ReparameterizedKernelMap,
    bandwidth: ArrayView1<f64>,
    x: ArrayView2<f64>,
) -> Result<f64> {
    let features = map.transform(x, bandwidth)?;
    let exact = RBFKernel::new(bandwidth.to_owned())?;
    let r = map.directions().random_feature_dim() as f64;
    let approx_gram = features.dot(&features.t()) / r;

    let n = x.nrows();
    if n == 0 {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for i in 0..n {
        for j in 0..n {
            let diff = approx_gram[[i, j]] - exact.compute(x.row(i), x.row(j));
            total += diff * diff;
        }
    }
    Ok(total / (n * n) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::RandomFeatureSampler;
    use ndarray::Array1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_two_clusters_layout() {
        let (x, y) = synthetic::two_clusters(25, 2.0, 0.1, 3);
        assert_eq!(x.dim(), (50, 2));
        assert_eq!(y.len(), 50);
        assert_eq!(y.iter().filter(|&&l| l == 1.0).count(), 25);

        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            assert!(row.iter().all(|&v| v * label > 0.0));
        }
    }

    #[test]
    fn test_synthetic_is_seeded() {
        let (a, _) = synthetic::two_clusters(5, 1.0, 0.5, 42);
        let (b, _) = synthetic::two_clusters(5, 1.0, 0.5, 42);
        let (c, _) = synthetic::two_clusters(5, 1.0, 0.5, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_xor_labels() {
        let (x, y) = synthetic::xor(10, 2.0, 0.1, 1);
        assert_eq!(x.dim(), (40, 2));
        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            assert_eq!(label, (row[0] * row[1]).signum());
        }
    }

    #[test]
    fn test_approximation_error_shrinks_with_more_features() {
        let (x, _) = synthetic::two_clusters(5, 0.5, 0.5, 7);
        let bandwidth = Array1::from_elem(2, 1.0);

        let error_for = |r: usize| {
            let mut rng = StdRng::seed_from_u64(99);
            let directions = RandomFeatureSampler::new(r, 2)
                .expect("valid")
                .sample(&mut rng);
            let map = ReparameterizedKernelMap::new(directions);
            kernel_approximation_error(&map, bandwidth.view(), x.view()).expect("valid")
        };

        let coarse = error_for(10);
        let fine = error_for(5000);
        assert!(fine < coarse, "fine {fine}, coarse {coarse}");
        assert!(fine < 1e-3);
    }
}
