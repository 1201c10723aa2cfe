//! Shape arithmetic shared by the convolution and pooling layers.

/// Output length along one axis:
/// `floor((input + 2*padding - dilation*(kernel-1) - 1) / stride) + 1`.
///
/// Returns `None` when the dilated kernel does not fit the padded input or a
/// parameter is zero.
pub fn output_dim(input: usize, kernel: usize, stride: usize, padding: usize, dilation: usize) -> Option<usize> {
    if kernel == 0 || stride == 0 || dilation == 0 {
        return None;
    }
    let span = dilation * (kernel - 1) + 1;
    let padded = input + 2 * padding;
    if padded < span {
        return None;
    }
    Some((padded - span) / stride + 1)
}

/// Kernel hyper-parameters of a convolution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvParams {
    pub kernel_size: usize,
    pub stride: usize,
    pub padding: usize,
    pub dilation: usize,
}

impl ConvParams {
    pub fn new(kernel_size: usize, stride: usize, padding: usize, dilation: usize) -> Self {
        ConvParams {
            kernel_size,
            stride,
            padding,
            dilation,
        }
    }

    /// `kernel_size` with stride 1, no padding, no dilation.
    pub fn kernel(kernel_size: usize) -> Self {
        ConvParams::new(kernel_size, 1, 0, 1)
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_dilation(mut self, dilation: usize) -> Self {
        self.dilation = dilation;
        self
    }

    pub fn output_dim(&self, input: usize) -> Option<usize> {
        output_dim(input, self.kernel_size, self.stride, self.padding, self.dilation)
    }
}

/// Precomputed input coordinates for every (output position, kernel tap) pair
/// along one axis. `None` marks a tap that lands in the padding.
#[derive(Debug, Clone)]
pub(crate) struct AxisTaps {
    kernel: usize,
    taps: Vec<Option<usize>>,
}

impl AxisTaps {
    pub fn new(input: usize, output: usize, kernel: usize, stride: usize, padding: usize, dilation: usize) -> Self {
        let mut taps = Vec::with_capacity(output * kernel);
        for o in 0..output {
            let base = o * stride;
            for k in 0..kernel {
                let coord = (base + k * dilation).checked_sub(padding).filter(|&i| i < input);
                taps.push(coord);
            }
        }
        AxisTaps { kernel, taps }
    }

    /// Single tap at offset zero, for the unused axis of a 1D convolution.
    pub fn unit(output: usize) -> Self {
        AxisTaps {
            kernel: 1,
            taps: (0..output).map(Some).collect(),
        }
    }

    #[inline(always)]
    pub fn at(&self, out: usize) -> &[Option<usize>] {
        &self.taps[out * self.kernel..(out + 1) * self.kernel]
    }
}

/// Sliding-window description of one convolution call.
#[derive(Debug, Clone)]
pub(crate) struct Window {
    pub in_h: usize,
    pub in_w: usize,
    pub out_h: usize,
    pub out_w: usize,
    pub kernel_h: usize,
    pub kernel_w: usize,
    pub rows: AxisTaps,
    pub cols: AxisTaps,
}

impl Window {
    pub fn conv2d(params: &ConvParams, in_h: usize, in_w: usize, out_h: usize, out_w: usize) -> Self {
        let ConvParams { kernel_size, stride, padding, dilation } = *params;
        Window {
            in_h,
            in_w,
            out_h,
            out_w,
            kernel_h: kernel_size,
            kernel_w: kernel_size,
            rows: AxisTaps::new(in_h, out_h, kernel_size, stride, padding, dilation),
            cols: AxisTaps::new(in_w, out_w, kernel_size, stride, padding, dilation),
        }
    }

    /// A length-`in_len` sequence treated as a single-row image.
    pub fn conv1d(params: &ConvParams, in_len: usize, out_len: usize) -> Self {
        let ConvParams { kernel_size, stride, padding, dilation } = *params;
        Window {
            in_h: 1,
            in_w: in_len,
            out_h: 1,
            out_w: out_len,
            kernel_h: 1,
            kernel_w: kernel_size,
            rows: AxisTaps::unit(1),
            cols: AxisTaps::new(in_len, out_len, kernel_size, stride, padding, dilation),
        }
    }

    pub fn kernel_area(&self) -> usize {
        self.kernel_h * self.kernel_w
    }

    pub fn in_plane(&self) -> usize {
        self.in_h * self.in_w
    }
}
