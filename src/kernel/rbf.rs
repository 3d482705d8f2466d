//! RBF (Radial Basis Function) kernel random features
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! Its spectral density is a Gaussian, so each projection entry is drawn
//! i.i.d. from N(0, 2γ).

use crate::core::{Result, SinkError};
use crate::kernel::traits::check_projection_shape;
use crate::kernel::KernelSpec;
use ndarray::{Array2, ArrayView1};
use ndarray_rand::RandomExt;
use rand::RngCore;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// RBF (Gaussian) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the kernel width:
/// - High gamma: narrow kernel, projections spread wide, features oscillate fast
/// - Low gamma: wide kernel, projections stay near zero, features vary slowly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RbfKernel {
    gamma: f64,
}

impl RbfKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive and finite
    pub fn new(gamma: f64) -> Self {
        assert!(
            gamma > 0.0 && gamma.is_finite(),
            "Gamma must be positive, got: {}",
            gamma
        );
        Self { gamma }
    }

    /// Fallible variant of [`RbfKernel::new`]
    pub fn try_new(gamma: f64) -> Result<Self> {
        if gamma > 0.0 && gamma.is_finite() {
            Ok(Self { gamma })
        } else {
            Err(SinkError::InvalidParameter(format!(
                "RBF gamma must be positive and finite, got: {gamma}"
            )))
        }
    }

    /// Create an RBF kernel from its bandwidth σ, K(x, y) = exp(-||x - y||² / 2σ²)
    pub fn from_bandwidth(sigma: f64) -> Self {
        assert!(
            sigma > 0.0 && sigma.is_finite(),
            "Bandwidth must be positive, got: {}",
            sigma
        );
        Self::new(1.0 / (2.0 * sigma * sigma))
    }

    /// Create RBF kernel with gamma = 1.0 / input_dim
    pub fn with_auto_gamma(input_dim: usize) -> Self {
        assert!(input_dim > 0, "Input dimension must be positive");
        Self::new(1.0 / input_dim as f64)
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Standard deviation of each projection entry
    pub fn projection_std(&self) -> f64 {
        (2.0 * self.gamma).sqrt()
    }
}

impl Default for RbfKernel {
    /// Default RBF kernel with gamma = 1.0
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl KernelSpec for RbfKernel {
    fn name(&self) -> &'static str {
        "rbf"
    }

    fn generate(
        &self,
        n_features: usize,
        input_dim: usize,
        out: &mut Array2<f64>,
        rng: &mut dyn RngCore,
    ) {
        check_projection_shape(n_features, input_dim, out);
        let draws: Array2<f64> = Array2::random_using(out.raw_dim(), StandardNormal, rng);
        out.assign(&(draws * self.projection_std()));
    }

    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        let diff = &ArrayView1::from(x) - &ArrayView1::from(y);
        (-self.gamma * diff.dot(&diff)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rbf_kernel_creation() {
        assert_eq!(RbfKernel::new(0.5).gamma(), 0.5);
        assert_eq!(RbfKernel::with_auto_gamma(10).gamma(), 0.1);
        assert_eq!(RbfKernel::default().gamma(), 1.0);
        assert_relative_eq!(RbfKernel::from_bandwidth(2.0).gamma(), 0.125);
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_rbf_kernel_invalid_gamma() {
        RbfKernel::new(-0.5);
    }

    #[test]
    fn test_rbf_kernel_try_new() {
        assert!(RbfKernel::try_new(2.0).is_ok());
        assert!(RbfKernel::try_new(0.0).is_err());
        assert!(RbfKernel::try_new(f64::NAN).is_err());
    }

    #[test]
    fn test_rbf_kernel_evaluate() {
        let kernel = RbfKernel::new(0.5);
        let x = [1.0, 2.0];
        let y = [3.0, 2.0];
        assert_relative_eq!(kernel.evaluate(&x, &x), 1.0);
        // ||x - y||² = 4
        assert_relative_eq!(kernel.evaluate(&x, &y), (-2.0_f64).exp());
    }

    #[test]
    fn test_generate_overwrites_every_entry() {
        let kernel = RbfKernel::new(1.0);
        let mut out = Array2::from_elem((3, 2), f64::NAN);
        let mut rng = StdRng::seed_from_u64(7);
        kernel.generate(3, 2, &mut out, &mut rng);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_generate_matches_spectral_variance() {
        let gamma = 0.25;
        let kernel = RbfKernel::new(gamma);
        let n = 20_000;
        let mut out = Array2::zeros((n, 1));
        let mut rng = StdRng::seed_from_u64(42);
        kernel.generate(n, 1, &mut out, &mut rng);

        let mean = out.mean().unwrap();
        let var = out.var(0.0);
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert_relative_eq!(var, 2.0 * gamma, max_relative = 0.05);
    }

    #[test]
    #[should_panic(expected = "Projection matrix must be n_features x input_dim")]
    fn test_generate_shape_mismatch() {
        let kernel = RbfKernel::default();
        let mut out = Array2::zeros((2, 2));
        let mut rng = StdRng::seed_from_u64(0);
        kernel.generate(3, 2, &mut out, &mut rng);
    }
}
