use std::io::Read;

use tracing::debug;

use crate::conv::{linear_bnn, linear_fp, linear_tbn, linear_tnn};
use crate::error::{Error, Result};
use crate::loader;
use crate::quantization::{quantize_binary, quantize_ternary, DefaultWord, PackedWord, QuantMode};
use crate::tensor::Tensor;

use super::{Layer, LayerType, Weights};

/// Fully-connected layer.
///
/// Consumes any tensor holding exactly `in_features` values and produces a
/// `[out_features, 1, 1]` tensor.
#[derive(Debug, Clone)]
pub struct Linear<W = DefaultWord> {
    in_features: usize,
    out_features: usize,
    threshold: f32,
    weights: Weights<W>,
}

impl<W: PackedWord> Linear<W> {
    pub fn new(in_features: usize, out_features: usize, mode: QuantMode) -> Result<Self> {
        if in_features == 0 || out_features == 0 {
            return Err(Error::InvalidConfig(format!(
                "linear layer needs nonzero features, got {} -> {}",
                in_features, out_features
            )));
        }
        let weights = Weights::zeroed(mode, out_features, in_features, 1)?;
        debug!(in_features, out_features, %mode, "linear layer created");
        Ok(Linear {
            in_features,
            out_features,
            threshold: 0.0,
            weights,
        })
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn mode(&self) -> QuantMode {
        self.weights.mode()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn weights(&self) -> &Weights<W> {
        &self.weights
    }

    /// Replace the weights. Mode and size must match the layer.
    pub fn set_weights(&mut self, weights: Weights<W>) -> Result<()> {
        weights.check_fits(self.mode(), self.out_features, self.in_features, 1)?;
        self.weights = weights;
        Ok(())
    }

    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        if input.len() != self.in_features {
            return Err(Error::shape_mismatch(
                format!("{} input features", self.in_features),
                format!("{} ({})", input.len(), input),
            ));
        }
        let mut output = Tensor::try_new(self.out_features, 1, 1)?;
        let x = input.as_slice();
        let out = output.as_mut_slice();
        let n = self.in_features;
        match &self.weights {
            Weights::Fp(w) => linear_fp(x, w, out),
            Weights::Bnn(w) => {
                let plane = quantize_binary::<W>(x, n, 1, self.threshold)?;
                linear_bnn(&plane, w, n, out);
            }
            Weights::Tbn(w) => {
                let planes = quantize_ternary::<W>(x, n, 1, self.threshold)?;
                linear_tbn(&planes, w, out);
            }
            Weights::Tnn { pos, neg } => {
                let planes = quantize_ternary::<W>(x, n, 1, self.threshold)?;
                linear_tnn(&planes, pos, neg, out);
            }
        }
        Ok(output)
    }
}

impl<W: PackedWord> Layer for Linear<W> {
    fn layer_type(&self) -> LayerType {
        LayerType::Linear
    }

    fn forward(&self, input: Tensor) -> Result<Tensor> {
        Linear::forward(self, input)
    }

    fn weight_memory_bytes(&self) -> usize {
        self.weights.memory_bytes()
    }

    fn read_weights(&mut self, reader: &mut dyn Read) -> Result<()> {
        let weights = loader::read_weights(reader, self.mode(), self.out_features, self.in_features, 1)?;
        self.set_weights(weights)
    }
}
