use crate::error::{Error, Result};
use crate::tensor::try_filled;

use super::word::{words_for, PackedWord};
use super::QuantMode;

/// Single-plane binary activation: bit set where the value is below threshold.
///
/// Layout is `[words, spatial]`: word `g` of position `p` lives at
/// `g * spatial + p` and holds channels `g * W::BITS ..`.
#[derive(Debug, Clone, PartialEq)]
pub struct BitPlane<W> {
    pub words: usize,
    pub spatial: usize,
    pub bits: Vec<W>,
}

/// Two-plane ternary activation, same layout as [`BitPlane`].
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryPlanes<W> {
    pub words: usize,
    pub spatial: usize,
    /// Channels with value >= threshold.
    pub pos: Vec<W>,
    /// Channels with value <= -threshold (and not in `pos`).
    pub neg: Vec<W>,
}

impl<W: PackedWord> BitPlane<W> {
    #[inline(always)]
    pub fn word(&self, group: usize, pos: usize) -> W {
        self.bits[group * self.spatial + pos]
    }
}

impl<W: PackedWord> TernaryPlanes<W> {
    /// `(pos, neg)` words of a channel group at a position.
    #[inline(always)]
    pub fn word(&self, group: usize, pos: usize) -> (W, W) {
        let idx = group * self.spatial + pos;
        (self.pos[idx], self.neg[idx])
    }
}

/// An activation after encoding for a particular [`QuantMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizedActivation<W> {
    Float(Vec<f32>),
    Binary(BitPlane<W>),
    Ternary(TernaryPlanes<W>),
}

fn check_len(data: &[f32], channels: usize, spatial: usize) -> Result<()> {
    if data.len() != channels * spatial {
        return Err(Error::shape_mismatch(
            format!("{} values ({} channels x {})", channels * spatial, channels, spatial),
            data.len(),
        ));
    }
    Ok(())
}

/// Encode a channel-major `[channels, spatial]` activation as a binary bit-plane.
///
/// Bits of the final partial word beyond `channels` stay zero.
pub fn quantize_binary<W: PackedWord>(
    data: &[f32],
    channels: usize,
    spatial: usize,
    threshold: f32,
) -> Result<BitPlane<W>> {
    check_len(data, channels, spatial)?;
    let words = words_for::<W>(channels);
    let mut bits = try_filled("binary activation plane", words * spatial, W::ZERO)?;
    for c in 0..channels {
        let mask = W::bit(c % W::BITS);
        let row = (c / W::BITS) * spatial;
        let src = &data[c * spatial..(c + 1) * spatial];
        for (p, &v) in src.iter().enumerate() {
            if v < threshold {
                bits[row + p] |= mask;
            }
        }
    }
    Ok(BitPlane { words, spatial, bits })
}

/// Encode a channel-major `[channels, spatial]` activation as ternary planes.
///
/// Values in the open dead zone `(-threshold, threshold)` set neither plane.
pub fn quantize_ternary<W: PackedWord>(
    data: &[f32],
    channels: usize,
    spatial: usize,
    threshold: f32,
) -> Result<TernaryPlanes<W>> {
    check_len(data, channels, spatial)?;
    let words = words_for::<W>(channels);
    let mut pos = try_filled("ternary activation plane", words * spatial, W::ZERO)?;
    let mut neg = try_filled("ternary activation plane", words * spatial, W::ZERO)?;
    for c in 0..channels {
        let mask = W::bit(c % W::BITS);
        let row = (c / W::BITS) * spatial;
        let src = &data[c * spatial..(c + 1) * spatial];
        for (p, &v) in src.iter().enumerate() {
            if v >= threshold {
                pos[row + p] |= mask;
            } else if v <= -threshold {
                neg[row + p] |= mask;
            }
        }
    }
    Ok(TernaryPlanes { words, spatial, pos, neg })
}

/// Encode an activation for `mode`. FP activations pass through untouched.
pub fn quantize<W: PackedWord>(
    data: Vec<f32>,
    channels: usize,
    spatial: usize,
    threshold: f32,
    mode: QuantMode,
) -> Result<QuantizedActivation<W>> {
    match mode {
        QuantMode::Fp => {
            check_len(&data, channels, spatial)?;
            Ok(QuantizedActivation::Float(data))
        }
        QuantMode::Bnn => Ok(QuantizedActivation::Binary(quantize_binary(&data, channels, spatial, threshold)?)),
        QuantMode::Tbn | QuantMode::Tnn => {
            Ok(QuantizedActivation::Ternary(quantize_ternary(&data, channels, spatial, threshold)?))
        }
    }
}
