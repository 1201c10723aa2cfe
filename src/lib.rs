//! A bit-packed quantized CNN inference engine.
//!
//! Layers run in one of four numeric modes fixed at construction: FP
//! (reference float), BNN (binary activations and weights), TBN (ternary
//! activations, binary weights) and TNN (ternary activations and weights).
//! Quantized layers pack one bit per input channel into `u32` or `u64` words
//! and replace multiply-accumulate with XOR/AND and population counts.
//!
//! # Example
//!
//! ```no_run
//! use bitconv::arc::lenet;
//! use bitconv::{QuantMode, Tensor};
//!
//! let mut net = lenet(QuantMode::Bnn)?;
//! net.load("data/lenet_bnn.bin")?;
//! let logits = net.predict(Tensor::new(3, 32, 32))?;
//! # Ok::<(), bitconv::Error>(())
//! ```

/// Error type shared by every fallible operation.
pub mod error;
/// Channel-major activation tensor.
pub mod tensor;
/// Quantization modes, packed words, popcount and the activation codec.
pub mod quantization;
/// Convolution and fully-connected kernels, shape arithmetic.
pub mod conv;
/// Layers and the sequential network.
pub mod network;
/// Binary weight file reader.
pub mod loader;
/// LeNet, QCAD and AlexNet builders.
pub mod arc;
/// Benchmarking utilities comparing FP/TNN/TBN/BNN performance.
pub mod metrics;

pub use conv::{output_dim, ConvParams};
pub use error::{Error, Result};
pub use network::{
    flatten, max_pool2d, max_pool2d_k, Conv1d, Conv2d, Flatten, Layer, LayerType, Linear, MaxPool2d, Network,
    Weights,
};
pub use quantization::{DefaultWord, PackedWord, QuantMode};
pub use tensor::Tensor;
