//! Convolution and fully-connected kernels.
//!
//! Kernels operate on flat slices: activations channel-major, packed
//! activations `[words, spatial]`, weights as described on
//! [`Weights`](crate::network::Weights). Every kernel writes whole output rows
//! through [`fill_rows`], so the outer loop can be spread across threads.

mod bitwise;
mod dense;
mod float;
pub(crate) mod geometry;

pub use geometry::{output_dim, ConvParams};

pub(crate) use bitwise::{conv_bnn, conv_tbn, conv_tnn};
pub(crate) use dense::{linear_bnn, linear_fp, linear_tbn, linear_tnn};
pub(crate) use float::conv_fp;
pub(crate) use geometry::Window;

use crate::error::Result;
use crate::network::Weights;
use crate::quantization::{quantize_binary, quantize_ternary, PackedWord};

/// Run `f(row_index, row)` over consecutive `row_len` chunks of `output`.
///
/// Rows are disjoint, so with the `parallel` feature they are handed to rayon
/// workers without any locking.
pub(crate) fn fill_rows<F>(output: &mut [f32], row_len: usize, f: F)
where
    F: Fn(usize, &mut [f32]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        output
            .chunks_mut(row_len)
            .enumerate()
            .for_each(|(r, row)| f(r, row));
    }
}

/// Dispatch a convolution over `window` to the kernel matching `weights`.
///
/// `input` is the raw `[in_channels, in_h, in_w]` activation; it is quantized
/// here with `threshold` unless the weights are FP. `output` must hold
/// `out_channels * out_h * out_w` values.
pub(crate) fn convolve<W: PackedWord>(
    window: &Window,
    input: &[f32],
    in_channels: usize,
    threshold: f32,
    weights: &Weights<W>,
    output: &mut [f32],
) -> Result<()> {
    let spatial = window.in_plane();
    match weights {
        Weights::Fp(w) => conv_fp(window, input, in_channels, w, output),
        Weights::Bnn(w) => {
            let plane = quantize_binary::<W>(input, in_channels, spatial, threshold)?;
            conv_bnn(window, &plane, w, in_channels, output);
        }
        Weights::Tbn(w) => {
            let planes = quantize_ternary::<W>(input, in_channels, spatial, threshold)?;
            conv_tbn(window, &planes, w, output);
        }
        Weights::Tnn { pos, neg } => {
            let planes = quantize_ternary::<W>(input, in_channels, spatial, threshold)?;
            conv_tnn(window, &planes, pos, neg, output);
        }
    }
    Ok(())
}
