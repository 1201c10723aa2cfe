//! Quantization modes, packed words and the activation codec.

mod bitops;
mod codec;
mod popcount;
mod word;

pub use bitops::{bnn_disagreements, tbn_counts, tnn_counts};
pub use codec::{quantize, quantize_binary, quantize_ternary, BitPlane, QuantizedActivation, TernaryPlanes};
pub use popcount::{popcount_u32, popcount_u64, swar_u32, swar_u64};
pub use word::{channel_mask, words_for, DefaultWord, PackedWord};

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Numeric representation of a layer, fixed when the layer is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantMode {
    /// Unquantized floating point.
    Fp,
    /// Binary activations and weights.
    Bnn,
    /// Ternary activations, binary weights.
    Tbn,
    /// Ternary activations and weights.
    Tnn,
}

impl QuantMode {
    pub const ALL: [QuantMode; 4] = [QuantMode::Fp, QuantMode::Tnn, QuantMode::Tbn, QuantMode::Bnn];

    pub fn is_quantized(self) -> bool {
        self != QuantMode::Fp
    }
}

impl fmt::Display for QuantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantMode::Fp => write!(f, "FP"),
            QuantMode::Bnn => write!(f, "BNN"),
            QuantMode::Tbn => write!(f, "TBN"),
            QuantMode::Tnn => write!(f, "TNN"),
        }
    }
}

impl FromStr for QuantMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FP" | "FP32" => Ok(QuantMode::Fp),
            "BNN" => Ok(QuantMode::Bnn),
            "TBN" => Ok(QuantMode::Tbn),
            "TNN" => Ok(QuantMode::Tnn),
            _ => Err(Error::UnknownQuantMode(s.to_string())),
        }
    }
}
