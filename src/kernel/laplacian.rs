//! Laplacian kernel random features
//!
//! K(x, y) = exp(-γ * ||x - y||₁). The kernel factorizes over dimensions and
//! the Fourier transform of exp(-γ|δ|) is a Cauchy density with scale γ.

use crate::core::{Result, SinkError};
use crate::kernel::traits::check_projection_shape;
use crate::kernel::KernelSpec;
use ndarray::{Array2, ArrayView1};
use ndarray_rand::RandomExt;
use rand::RngCore;
use rand_distr::Cauchy;
use serde::{Deserialize, Serialize};

/// Laplacian kernel: K(x, y) = exp(-γ * ||x - y||₁)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaplacianKernel {
    gamma: f64,
}

impl LaplacianKernel {
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

    pub fn try_new(gamma: f64) -> Result<Self> {
        if gamma > 0.0 && gamma.is_finite() {
            Ok(Self { gamma })
        } else {
            Err(SinkError::InvalidParameter(format!(
                "Laplacian gamma must be positive and finite, got: {gamma}"
            )))
        }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for LaplacianKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl KernelSpec for LaplacianKernel {
    fn name(&self) -> &'static str {
        "laplacian"
    }

    fn generate(
        &self,
        n_features: usize,
        input_dim: usize,
        out: &mut Array2<f64>,
        rng: &mut dyn RngCore,
    ) {
        check_projection_shape(n_features, input_dim, out);
        let cauchy = Cauchy::new(0.0, self.gamma)
            .unwrap_or_else(|e| panic!("Invalid Laplacian gamma {}: {e}", self.gamma));
        let draws: Array2<f64> = Array2::random_using(out.raw_dim(), cauchy, rng);
        out.assign(&draws);
    }

    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        let diff = &ArrayView1::from(x) - &ArrayView1::from(y);
        (-self.gamma * diff.mapv(f64::abs).sum()).exp()
    }
}
