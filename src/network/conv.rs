use std::io::Read;

use tracing::debug;

use crate::conv::{convolve, ConvParams, Window};
use crate::error::{Error, Result};
use crate::loader;
use crate::quantization::{DefaultWord, PackedWord, QuantMode};
use crate::tensor::Tensor;

use super::{Layer, LayerType, Weights};

fn check_params(in_channels: usize, out_channels: usize, params: &ConvParams) -> Result<()> {
    if in_channels == 0 || out_channels == 0 {
        return Err(Error::InvalidConfig(format!(
            "convolution needs nonzero channels, got {} -> {}",
            in_channels, out_channels
        )));
    }
    if params.kernel_size == 0 || params.stride == 0 || params.dilation == 0 {
        return Err(Error::InvalidConfig(format!(
            "kernel size, stride and dilation must be nonzero, got {:?}",
            params
        )));
    }
    Ok(())
}

fn axis_output(params: &ConvParams, input: usize, axis: &str) -> Result<usize> {
    params.output_dim(input).ok_or_else(|| {
        Error::InvalidShape(format!(
            "{} {} with padding {} is smaller than kernel {} at dilation {}",
            axis, input, params.padding, params.kernel_size, params.dilation
        ))
    })
}

/// 2D convolution over `[in_channels, h, w]` inputs with a square kernel.
#[derive(Debug, Clone)]
pub struct Conv2d<W = DefaultWord> {
    in_channels: usize,
    out_channels: usize,
    params: ConvParams,
    threshold: f32,
    weights: Weights<W>,
}

impl<W: PackedWord> Conv2d<W> {
    pub fn new(in_channels: usize, out_channels: usize, params: ConvParams, mode: QuantMode) -> Result<Self> {
        check_params(in_channels, out_channels, &params)?;
        let taps = params.kernel_size * params.kernel_size;
        let weights = Weights::zeroed(mode, out_channels, in_channels, taps)?;
        debug!(in_channels, out_channels, ?params, %mode, "conv2d layer created");
        Ok(Conv2d {
            in_channels,
            out_channels,
            params,
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

    pub fn params(&self) -> &ConvParams {
        &self.params
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    fn taps(&self) -> usize {
        self.params.kernel_size * self.params.kernel_size
    }

    pub fn weights(&self) -> &Weights<W> {
        &self.weights
    }

    /// Replace the weights. Mode and `[out, in, k, k]` size must match.
    pub fn set_weights(&mut self, weights: Weights<W>) -> Result<()> {
        weights.check_fits(self.mode(), self.out_channels, self.in_channels, self.taps())?;
        self.weights = weights;
        Ok(())
    }

    /// Output `(height, width)` for an input plane.
    pub fn output_shape(&self, in_h: usize, in_w: usize) -> Result<(usize, usize)> {
        Ok((axis_output(&self.params, in_h, "height")?, axis_output(&self.params, in_w, "width")?))
    }

    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        if input.c() != self.in_channels {
            return Err(Error::shape_mismatch(
                format!("{} input channels", self.in_channels),
                format!("{}", input),
            ));
        }
        let (out_h, out_w) = self.output_shape(input.h(), input.w())?;
        let window = Window::conv2d(&self.params, input.h(), input.w(), out_h, out_w);
        let mut output = Tensor::try_new(self.out_channels, out_h, out_w)?;
        convolve(
            &window,
            input.as_slice(),
            self.in_channels,
            self.threshold,
            &self.weights,
            output.as_mut_slice(),
        )?;
        Ok(output)
    }
}

impl<W: PackedWord> Layer for Conv2d<W> {
    fn layer_type(&self) -> LayerType {
        LayerType::Conv2d
    }

    fn forward(&self, input: Tensor) -> Result<Tensor> {
        Conv2d::forward(self, input)
    }

    fn weight_memory_bytes(&self) -> usize {
        self.weights.memory_bytes()
    }

    fn read_weights(&mut self, reader: &mut dyn Read) -> Result<()> {
        let weights = loader::read_weights(reader, self.mode(), self.out_channels, self.in_channels, self.taps())?;
        self.set_weights(weights)
    }
}

/// 1D convolution over `[in_channels, 1, len]` inputs.
#[derive(Debug, Clone)]
pub struct Conv1d<W = DefaultWord> {
    in_channels: usize,
    out_channels: usize,
    params: ConvParams,
    threshold: f32,
    weights: Weights<W>,
}

impl<W: PackedWord> Conv1d<W> {
    pub fn new(in_channels: usize, out_channels: usize, params: ConvParams, mode: QuantMode) -> Result<Self> {
        check_params(in_channels, out_channels, &params)?;
        let weights = Weights::zeroed(mode, out_channels, in_channels, params.kernel_size)?;
        debug!(in_channels, out_channels, ?params, %mode, "conv1d layer created");
        Ok(Conv1d {
            in_channels,
            out_channels,
            params,
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

    pub fn params(&self) -> &ConvParams {
        &self.params
    }

    pub fn weights(&self) -> &Weights<W> {
        &self.weights
    }

    /// Replace the weights. Mode and `[out, in, k]` size must match.
    pub fn set_weights(&mut self, weights: Weights<W>) -> Result<()> {
        weights.check_fits(self.mode(), self.out_channels, self.in_channels, self.params.kernel_size)?;
        self.weights = weights;
        Ok(())
    }

    pub fn output_len(&self, in_len: usize) -> Result<usize> {
        axis_output(&self.params, in_len, "length")
    }

    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        if input.c() != self.in_channels || input.h() != 1 {
            return Err(Error::shape_mismatch(
                format!("{}x1xL", self.in_channels),
                format!("{}", input),
            ));
        }
        let out_len = self.output_len(input.w())?;
        let window = Window::conv1d(&self.params, input.w(), out_len);
        let mut output = Tensor::try_new(self.out_channels, 1, out_len)?;
        convolve(
            &window,
            input.as_slice(),
            self.in_channels,
            self.threshold,
            &self.weights,
            output.as_mut_slice(),
        )?;
        Ok(output)
    }
}

impl<W: PackedWord> Layer for Conv1d<W> {
    fn layer_type(&self) -> LayerType {
        LayerType::Conv1d
    }

    fn forward(&self, input: Tensor) -> Result<Tensor> {
        Conv1d::forward(self, input)
    }

    fn weight_memory_bytes(&self) -> usize {
        self.weights.memory_bytes()
    }

    fn read_weights(&mut self, reader: &mut dyn Read) -> Result<()> {
        let weights =
            loader::read_weights(reader, self.mode(), self.out_channels, self.in_channels, self.params.kernel_size)?;
        self.set_weights(weights)
    }
}
