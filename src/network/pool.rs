use std::io::Read;

use crate::error::{Error, Result};
use crate::tensor::Tensor;

use super::{Layer, LayerType};

fn pool(input: &Tensor, kernel: usize, stride: usize, out_h: usize, out_w: usize) -> Result<Tensor> {
    if out_h == 0 || out_w == 0 {
        return Err(Error::InvalidShape(format!(
            "pooling {}x{} with kernel {} stride {} leaves no output",
            input.h(), input.w(), kernel, stride
        )));
    }
    let mut output = Tensor::try_new(input.c(), out_h, out_w)?;
    for c in 0..input.c() {
        for y in 0..out_h {
            for x in 0..out_w {
                let mut max_val = f32::NEG_INFINITY;
                for ky in 0..kernel {
                    for kx in 0..kernel {
                        max_val = max_val.max(input.get(c, y * stride + ky, x * stride + kx));
                    }
                }
                output.set(c, y, x, max_val);
            }
        }
    }
    Ok(output)
}

/// 2x2 max pooling with stride 2. Odd trailing rows and columns are dropped.
pub fn max_pool2d(input: Tensor) -> Result<Tensor> {
    pool(&input, 2, 2, input.h() / 2, input.w() / 2)
}

/// Max pooling with a square `kernel` and `stride`, no padding.
pub fn max_pool2d_k(input: Tensor, kernel: usize, stride: usize) -> Result<Tensor> {
    if kernel == 0 || stride == 0 {
        return Err(Error::InvalidConfig(format!(
            "pooling kernel and stride must be nonzero, got {} and {}",
            kernel, stride
        )));
    }
    if input.h() < kernel || input.w() < kernel {
        return Err(Error::InvalidShape(format!(
            "pooling kernel {} exceeds input {}x{}",
            kernel, input.h(), input.w()
        )));
    }
    let out_h = (input.h() - kernel) / stride + 1;
    let out_w = (input.w() - kernel) / stride + 1;
    pool(&input, kernel, stride, out_h, out_w)
}

/// Max pooling stage of a [`Network`](super::Network).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxPool2d {
    /// 2x2 window, stride 2.
    Fixed,
    Window { kernel: usize, stride: usize },
}

impl MaxPool2d {
    pub fn new(kernel: usize, stride: usize) -> Self {
        MaxPool2d::Window { kernel, stride }
    }
}

impl Layer for MaxPool2d {
    fn layer_type(&self) -> LayerType {
        LayerType::MaxPool2d
    }

    fn forward(&self, input: Tensor) -> Result<Tensor> {
        match *self {
            MaxPool2d::Fixed => max_pool2d(input),
            MaxPool2d::Window { kernel, stride } => max_pool2d_k(input, kernel, stride),
        }
    }

    fn weight_memory_bytes(&self) -> usize {
        0
    }

    fn read_weights(&mut self, _reader: &mut dyn Read) -> Result<()> {
        Ok(())
    }
}
