use crate::error::{Error, Result};
use crate::quantization::{words_for, PackedWord, QuantMode};
use crate::tensor::try_filled;

/// Layer weights, one physical layout per [`QuantMode`].
///
/// Packed variants are laid out `[out, words, taps]` where `words` is the
/// number of channel words and `taps` the flattened kernel (`1` for linear
/// layers). The FP variant is `[out, in, taps]`.
///
/// Bit conventions:
/// - `Bnn`: a set bit is a -1 weight, matching the activation encoding.
/// - `Tbn`: a set bit is a +1 weight.
/// - `Tnn`: `pos` holds +1 weights, `neg` holds -1 weights, neither is 0.
#[derive(Debug, Clone, PartialEq)]
pub enum Weights<W> {
    Fp(Vec<f32>),
    Bnn(Vec<W>),
    Tbn(Vec<W>),
    Tnn { pos: Vec<W>, neg: Vec<W> },
}

impl<W: PackedWord> Weights<W> {
    /// All-zero weights of the right size for `mode`.
    pub fn zeroed(mode: QuantMode, out_channels: usize, in_channels: usize, taps: usize) -> Result<Self> {
        let packed = out_channels * words_for::<W>(in_channels) * taps;
        Ok(match mode {
            QuantMode::Fp => Weights::Fp(try_filled("weights", out_channels * in_channels * taps, 0.0)?),
            QuantMode::Bnn => Weights::Bnn(try_filled("weights", packed, W::ZERO)?),
            QuantMode::Tbn => Weights::Tbn(try_filled("weights", packed, W::ZERO)?),
            QuantMode::Tnn => Weights::Tnn {
                pos: try_filled("weights_pos", packed, W::ZERO)?,
                neg: try_filled("weights_neg", packed, W::ZERO)?,
            },
        })
    }

    /// Pack logical weights `[out, in, taps]` for `mode`.
    ///
    /// Binary modes keep only the sign (zero counts as +1); TNN keeps
    /// -1/0/+1 by sign.
    pub fn from_logical(
        mode: QuantMode,
        values: &[f32],
        out_channels: usize,
        in_channels: usize,
        taps: usize,
    ) -> Result<Self> {
        let expected = out_channels * in_channels * taps;
        if values.len() != expected {
            return Err(Error::shape_mismatch(expected, values.len()));
        }
        let mut weights = Weights::zeroed(mode, out_channels, in_channels, taps)?;
        if let Weights::Fp(buf) = &mut weights {
            buf.copy_from_slice(values);
            return Ok(weights);
        }

        let words = words_for::<W>(in_channels);
        for o in 0..out_channels {
            for ic in 0..in_channels {
                let mask = W::bit(ic % W::BITS);
                for t in 0..taps {
                    let v = values[(o * in_channels + ic) * taps + t];
                    let idx = (o * words + ic / W::BITS) * taps + t;
                    match &mut weights {
                        Weights::Bnn(buf) if v < 0.0 => buf[idx] |= mask,
                        Weights::Tbn(buf) if v >= 0.0 => buf[idx] |= mask,
                        Weights::Tnn { pos, .. } if v > 0.0 => pos[idx] |= mask,
                        Weights::Tnn { neg, .. } if v < 0.0 => neg[idx] |= mask,
                        _ => {}
                    }
                }
            }
        }
        Ok(weights)
    }

    pub fn mode(&self) -> QuantMode {
        match self {
            Weights::Fp(_) => QuantMode::Fp,
            Weights::Bnn(_) => QuantMode::Bnn,
            Weights::Tbn(_) => QuantMode::Tbn,
            Weights::Tnn { .. } => QuantMode::Tnn,
        }
    }

    /// Element count of one plane (words for packed modes, floats for FP).
    pub fn plane_len(&self) -> usize {
        match self {
            Weights::Fp(w) => w.len(),
            Weights::Bnn(w) | Weights::Tbn(w) => w.len(),
            Weights::Tnn { pos, .. } => pos.len(),
        }
    }

    pub fn memory_bytes(&self) -> usize {
        match self {
            Weights::Fp(w) => w.len() * std::mem::size_of::<f32>(),
            Weights::Bnn(w) | Weights::Tbn(w) => w.len() * W::BYTES,
            Weights::Tnn { pos, neg } => (pos.len() + neg.len()) * W::BYTES,
        }
    }

    /// Check that these weights fit a layer with the given shape and mode.
    pub(crate) fn check_fits(&self, mode: QuantMode, out_channels: usize, in_channels: usize, taps: usize) -> Result<()> {
        if self.mode() != mode {
            return Err(Error::shape_mismatch(format!("{} weights", mode), format!("{} weights", self.mode())));
        }
        let expected = match mode {
            QuantMode::Fp => out_channels * in_channels * taps,
            _ => out_channels * words_for::<W>(in_channels) * taps,
        };
        let consistent = match self {
            Weights::Tnn { pos, neg } => pos.len() == neg.len(),
            _ => true,
        };
        if self.plane_len() != expected || !consistent {
            return Err(Error::shape_mismatch(expected, self.plane_len()));
        }
        Ok(())
    }
}
