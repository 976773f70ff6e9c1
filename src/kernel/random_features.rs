//! Random Fourier features with a reparameterized, trainable bandwidth
//!
//! Directions are split into a frozen noise source ε ~ N(0, I) and a learned
//! per-dimension scale γ, so that ω = ε ⊙ γ. The embedding
//!
//! φ(x) = [cos(ω x), sin(ω x)]
//!
//! satisfies φ(x)·φ(y) / R ≈ exp(-½ Σ_d γ_d² (x_d - y_d)²), and because ε
//! never changes, gradients of any objective built on φ flow into γ alone.

use crate::core::{Result, SVMError};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rand::Rng;
use rand_distr::StandardNormal;

/// Draws the fixed noise matrix ε of shape (R, D)
#[derive(Debug, Clone, Copy)]
pub struct RandomFeatureSampler {
    random_feature_dim: usize,
    input_dim: usize,
}

impl RandomFeatureSampler {
    /// Create a sampler for R random directions in D input dimensions
    pub fn new(random_feature_dim: usize, input_dim: usize) -> Result<Self> {
        if random_feature_dim == 0 {
            return Err(SVMError::InvalidParameter(
                "random_feature_dim must be positive".to_string(),
            ));
        }
        if input_dim == 0 {
            return Err(SVMError::InvalidParameter(
                "input dimension must be positive".to_string(),
            ));
        }
        Ok(Self {
            random_feature_dim,
            input_dim,
        })
    }

    /// Draw R i.i.d. rows from the D-dimensional standard normal
    ///
    /// With identity covariance the components are independent, so each
    /// entry is an independent N(0, 1) draw.
    pub fn sample<G: Rng + ?Sized>(&self, rng: &mut G) -> RandomDirections {
        let epsilon: Array2<f64> =
            Array2::from_shape_fn((self.random_feature_dim, self.input_dim), |_| {
                rng.sample(StandardNormal)
            });
        RandomDirections { epsilon }
    }
}

/// Frozen random directions ε; read-only once drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RandomDirections {
    epsilon: Array2<f64>,
}

impl RandomDirections {
    /// Wrap an explicit (R, D) matrix
    pub fn from_array(epsilon: Array2<f64>) -> Result<Self> {
        if epsilon.nrows() == 0 || epsilon.ncols() == 0 {
            return Err(SVMError::InvalidParameter(format!(
                "random directions must be non-empty, got shape {:?}",
                epsilon.shape()
            )));
        }
        Ok(Self { epsilon })
    }

    pub fn view(&self) -> ArrayView2<f64> {
        self.epsilon.view()
    }

    /// R
    pub fn random_feature_dim(&self) -> usize {
        self.epsilon.nrows()
    }

    /// D
    pub fn input_dim(&self) -> usize {
        self.epsilon.ncols()
    }
}

/// Output of a forward pass, kept for the backward pass
#[derive(Debug, Clone)]
pub struct FeatureMapForward {
    /// φ(X), shape (N, 2R)
    pub features: Array2<f64>,
    /// z = X ωᵀ, shape (N, R)
    pub projections: Array2<f64>,
}

/// Cosine/sine random feature map over the frozen directions
#[derive(Debug, Clone)]
pub struct ReparameterizedKernelMap {
    directions: RandomDirections,
}

impl ReparameterizedKernelMap {
    pub fn new(directions: RandomDirections) -> Self {
        Self { directions }
    }

    pub fn directions(&self) -> &RandomDirections {
        &self.directions
    }

    pub fn input_dim(&self) -> usize {
        self.directions.input_dim()
    }

    /// Embedding width 2R
    pub fn feature_dim(&self) -> usize {
        2 * self.directions.random_feature_dim()
    }

    /// ω = ε ⊙ γ, with γ broadcast across every row of ε
    pub fn effective_directions(&self, bandwidth: ArrayView1<f64>) -> Result<Array2<f64>> {
        self.check_bandwidth(bandwidth)?;
        Ok(&self.directions.epsilon * &bandwidth)
    }

    /// Compute φ(X) only
    pub fn transform(&self, x: ArrayView2<f64>, bandwidth: ArrayView1<f64>) -> Result<Array2<f64>> {
        Ok(self.forward(x, bandwidth)?.features)
    }

    /// Compute φ(X) and keep the projections for `backward`
    pub fn forward(
        &self,
        x: ArrayView2<f64>,
        bandwidth: ArrayView1<f64>,
    ) -> Result<FeatureMapForward> {
        if x.ncols() != self.input_dim() {
            return Err(SVMError::DimensionMismatch {
                expected: self.input_dim(),
                actual: x.ncols(),
            });
        }
        let omega = self.effective_directions(bandwidth)?;
        let projections = x.dot(&omega.t());

        let r = self.directions.random_feature_dim();
        let mut features = Array2::zeros((x.nrows(), 2 * r));
        features
            .slice_mut(s![.., ..r])
            .assign(&projections.mapv(f64::cos));
        features
            .slice_mut(s![.., r..])
            .assign(&projections.mapv(f64::sin));

        Ok(FeatureMapForward {
            features,
            projections,
        })
    }

    /// Gradient with respect to γ given ∂L/∂φ of shape (N, 2R)
    ///
    /// ∂z = -sin(z) ⊙ ∂φ_cos + cos(z) ⊙ ∂φ_sin, then
    /// ∂γ_d = Σ_r ε_rd (∂zᵀ X)_rd. ε itself receives no gradient.
    pub fn backward(
        &self,
        x: ArrayView2<f64>,
        forward: &FeatureMapForward,
        grad_features: ArrayView2<f64>,
    ) -> Result<Array1<f64>> {
        let r = self.directions.random_feature_dim();
        let (n, _) = forward.projections.dim();
        if grad_features.dim() != (n, 2 * r) {
            return Err(SVMError::DimensionMismatch {
                expected: 2 * r,
                actual: grad_features.ncols(),
            });
        }
        if x.nrows() != n {
            return Err(SVMError::DimensionMismatch {
                expected: n,
                actual: x.nrows(),
            });
        }

        let grad_cos = grad_features.slice(s![.., ..r]);
        let grad_sin = grad_features.slice(s![.., r..]);
        let mut grad_projections = Array2::zeros((n, r));
        Zip::from(&mut grad_projections)
            .and(&forward.projections)
            .and(&grad_cos)
            .and(&grad_sin)
            .for_each(|g, &z, &dc, &ds| *g = -z.sin() * dc + z.cos() * ds);

        let grad_omega = grad_projections.t().dot(&x);
        Ok((grad_omega * &self.directions.epsilon).sum_axis(Axis(0)))
    }

    fn check_bandwidth(&self, bandwidth: ArrayView1<f64>) -> Result<()> {
        if bandwidth.len() != self.input_dim() {
            return Err(SVMError::DimensionMismatch {
                expected: self.input_dim(),
                actual: bandwidth.len(),
            });
        }
        Ok(())
    }
}
