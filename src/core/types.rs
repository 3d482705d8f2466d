//! Core type definitions for the kitchen sink model

use crate::core::{Result, SinkError};
use serde::{Deserialize, Serialize};

/// Configuration for building a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Number of random features (rows of the projection matrix)
    pub n_features: usize,
    /// Input dimensionality
    pub input_dim: usize,
    /// Output dimensionality
    pub output_dim: usize,
    /// Number of rows a batch driver should hand to one predictor replica
    pub grain_size: usize,
    /// Seed for the random structure; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            n_features: 100,
            input_dim: 1,
            output_dim: 1,
            grain_size: DEFAULT_GRAIN_SIZE,
            seed: None,
        }
    }
}

/// Default chunk size for batch prediction
pub const DEFAULT_GRAIN_SIZE: usize = 500;

impl SinkConfig {
    /// Check that every size is usable
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(SinkError::InvalidParameter(
                "number of features must be positive".to_string(),
            ));
        }
        if self.input_dim == 0 {
            return Err(SinkError::InvalidParameter(
                "input dimension must be positive".to_string(),
            ));
        }
        if self.output_dim == 0 {
            return Err(SinkError::InvalidParameter(
                "output dimension must be positive".to_string(),
            ));
        }
        if self.grain_size == 0 {
            return Err(SinkError::InvalidParameter(
                "grain size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
