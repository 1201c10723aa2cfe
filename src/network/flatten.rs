use std::io::Read;

use crate::error::Result;
use crate::tensor::Tensor;

use super::{Layer, LayerType};

/// `[C, H, W]` to `[C*H*W, 1, 1]` in channel, row, column order.
///
/// The CHW buffer already has that order, so only the shape changes.
pub fn flatten(input: Tensor) -> Result<Tensor> {
    let len = input.len();
    input.reshape(len, 1, 1)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl Layer for Flatten {
    fn layer_type(&self) -> LayerType {
        LayerType::Flatten
    }

    fn forward(&self, input: Tensor) -> Result<Tensor> {
        flatten(input)
    }

    fn weight_memory_bytes(&self) -> usize {
        0
    }

    fn read_weights(&mut self, _reader: &mut dyn Read) -> Result<()> {
        Ok(())
    }
}
