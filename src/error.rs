use thiserror::Error;

/// Result type alias for bitconv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at layer construction, weight loading and forward passes.
#[derive(Debug, Error)]
pub enum Error {
    /// A buffer of known size could not be reserved.
    #[error("allocation of {elements} elements failed for {what}")]
    Allocation {
        /// What the buffer was for.
        what: &'static str,
        /// Requested element count.
        elements: usize,
    },

    /// The quantization mode name is not one of FP, BNN, TBN, TNN.
    #[error("unknown quantization mode: {0}")]
    UnknownQuantMode(String),

    /// Layer hyper-parameters that can never produce a valid layer.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A buffer length or tensor shape does not match what the layer expects.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape or length.
        expected: String,
        /// Actual shape or length.
        actual: String,
    },

    /// The input is too small for the (dilated) kernel or pooling window.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Reading a weight file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn shape_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Error::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
