use thiserror::Error;

use crate::math::matrix::ShapeError;

/// Errors raised by the network, its training loop, and the predictor.
#[derive(Debug, Error)]
pub enum NnError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("expected input with {expected} features, got {actual}")]
    InputWidth { expected: usize, actual: usize },

    #[error("training set is empty")]
    EmptyDataset,

    #[error("inputs and labels differ in length: {inputs} vs {labels}")]
    LengthMismatch { inputs: usize, labels: usize },

    #[error("network output is not a finite number ({0}); input magnitude is out of range")]
    NonFinite(f64),

    #[error("batch size must be at least 1")]
    ZeroBatch,

    #[error("invalid model configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NnError>;
