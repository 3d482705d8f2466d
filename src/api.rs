//! High-level API for building kitchen sink models
//!
//! # Quick Start
//!
//! ```rust
//! use kitchensink::api::KitchenSink;
//! use kitchensink::RbfKernel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = KitchenSink::with_kernel(RbfKernel::new(0.5))
//!     .with_features(200)
//!     .with_seed(42)
//!     .build(3, 1)?;
//!
//! let prediction = sink.predict(&[0.1, 0.2, 0.3])?;
//! assert_eq!(prediction.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::core::{Result, SinkConfig};
use crate::kernel::{KernelSpec, RbfKernel};
use crate::sink::Sink;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builder for [`Sink`] models
pub struct KitchenSink<K: KernelSpec = RbfKernel> {
    kernel: K,
    config: SinkConfig,
}

impl KitchenSink<RbfKernel> {
    /// Builder with a unit-gamma RBF kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(RbfKernel::default())
    }
}

impl Default for KitchenSink<RbfKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KernelSpec> KitchenSink<K> {
    /// Builder with a custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            config: SinkConfig::default(),
        }
    }

    /// Builder from a complete configuration; `build` still takes the dimensions
    pub fn with_config(kernel: K, config: SinkConfig) -> Self {
        Self { kernel, config }
    }

    /// Set the number of random features
    pub fn with_features(mut self, n_features: usize) -> Self {
        self.config.n_features = n_features;
        self
    }

    /// Set the batch chunking hint
    pub fn with_grain_size(mut self, grain_size: usize) -> Self {
        self.config.grain_size = grain_size;
        self
    }

    /// Make the random structure reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Build a sink for the given input and output dimensions
    pub fn build(mut self, input_dim: usize, output_dim: usize) -> Result<Sink<K>> {
        self.config.input_dim = input_dim;
        self.config.output_dim = output_dim;
        self.config.validate()?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sink = Sink::new(
            self.config.n_features,
            self.kernel,
            input_dim,
            output_dim,
            &mut rng,
        );
        Ok(sink.with_grain_size(self.config.grain_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SinkError;
    use crate::kernel::LaplacianKernel;

    #[test]
    fn test_builder_pattern() {
        let builder = KitchenSink::new()
            .with_features(64)
            .with_grain_size(10)
            .with_seed(3);

        assert_eq!(builder.config().n_features, 64);
        assert_eq!(builder.config().grain_size, 10);
        assert_eq!(builder.config().seed, Some(3));

        let sink = builder.build(4, 2).expect("Build should succeed");
        assert_eq!(sink.n_features(), 64);
        assert_eq!(sink.input_dim(), 4);
        assert_eq!(sink.output_dim(), 2);
        assert_eq!(sink.grain_size(), 10);
    }

    #[test]
    fn test_builder_seed_reproducible() {
        let a = KitchenSink::with_kernel(LaplacianKernel::new(0.7))
            .with_seed(99)
            .build(3, 1)
            .unwrap();
        let b = KitchenSink::with_kernel(LaplacianKernel::new(0.7))
            .with_seed(99)
            .build(3, 1)
            .unwrap();
        assert_eq!(a.projections(), b.projections());
        assert_eq!(a.phases(), b.phases());
    }

    #[test]
    fn test_builder_without_seed() {
        let sink = KitchenSink::new().with_features(5).build(2, 1).unwrap();
        assert_eq!(sink.projections().dim(), (5, 2));
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        let err = KitchenSink::new().with_features(0).build(2, 1).err();
        assert!(matches!(err, Some(SinkError::InvalidParameter(_))));

        assert!(KitchenSink::new().build(0, 1).is_err());
        assert!(KitchenSink::new().with_grain_size(0).build(1, 1).is_err());
    }
}
