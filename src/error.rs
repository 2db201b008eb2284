//! Error types for image operations.

use thiserror::Error;

/// Error type for image construction and operations.
#[derive(Error, Debug)]
pub enum OpError {
    /// Pixel buffer is empty, ragged, has the wrong channel count or
    /// holds values outside 0-255.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Operation parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Images (or a raw buffer and its declared shape) have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// A numeric fit has no solution for the given inputs.
    #[error("degenerate computation: {0}")]
    Degenerate(String),

    /// Pipeline description could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Reading a pipeline description failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for OpError {
    fn from(err: serde_json::Error) -> Self {
        OpError::Config(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<OpError> for pyo3::PyErr {
    fn from(err: OpError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OpError>;
