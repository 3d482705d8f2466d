//! Random kitchen sinks: kernel approximation with random Fourier features
//!
//! Based on "Random Features for Large-Scale Kernel Machines" by Ali Rahimi
//! and Benjamin Recht. An implicit shift-invariant kernel is replaced by an
//! explicit randomized feature map followed by a linear model, so prediction
//! costs scale with the number of features rather than the training set.

pub mod api;
pub mod core;
pub mod feature;
pub mod gradient;
pub mod kernel;
pub mod predictor;
pub mod sink;

// Re-export main types for convenience
pub use crate::api::KitchenSink;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SinkError};
pub use crate::gradient::SinkLossDeriver;
pub use crate::kernel::{KernelSpec, LaplacianKernel, RbfKernel};
pub use crate::predictor::BatchPredictor;
pub use crate::sink::Sink;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
