//! Kernel trait definition

use ndarray::Array2;
use rand::RngCore;

/// A shift-invariant kernel with a closed-form random feature generator
///
/// By Bochner's theorem such a kernel is the Fourier transform of a
/// probability distribution. Sampling projection directions from that
/// distribution and passing them through the cosine feature map gives an
/// unbiased estimate of the kernel.
pub trait KernelSpec: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Fill `out` with one random projection row per feature
    ///
    /// Every element of `out` is overwritten; prior contents are ignored.
    ///
    /// # Panics
    /// Panics if `out` is not `n_features × input_dim`
    fn generate(
        &self,
        n_features: usize,
        input_dim: usize,
        out: &mut Array2<f64>,
        rng: &mut dyn RngCore,
    );

    /// Exact kernel value K(x, y) that the random features approximate
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Shape check shared by every `generate` implementation
pub(crate) fn check_projection_shape(n_features: usize, input_dim: usize, out: &Array2<f64>) {
    assert_eq!(
        out.dim(),
        (n_features, input_dim),
        "Projection matrix must be n_features x input_dim"
    );
}
