//! Error types for the kitchen sink model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{context} dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl SinkError {
    /// Shorthand for a [`SinkError::DimensionMismatch`]
    pub fn dimension(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, SinkError>;
