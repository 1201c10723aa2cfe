//! Per-word signed dot products reconstructed from population counts.
//!
//! Conventions shared by the codec and the weight packers:
//! - BNN: a set bit means -1 on both sides, so XOR marks disagreements.
//! - TBN: activations use `pos`/`neg` planes, a set weight bit means +1.
//! - TNN: weights use `pos`/`neg` planes like the activations.

use super::word::PackedWord;

/// Number of channels in the word where the binary input and weight disagree.
///
/// `mask` selects the channels present in the word; weight bits outside it
/// are ignored.
#[inline(always)]
pub fn bnn_disagreements<W: PackedWord>(input: W, weight: W, mask: W) -> u32 {
    ((input ^ weight) & mask).popcount()
}

/// `(plus, minus)` counts of a ternary input against ±1 weights.
///
/// Channels in neither input plane (dead zone or padding) land in neither count.
#[inline(always)]
pub fn tbn_counts<W: PackedWord>(pos: W, neg: W, weight: W) -> (u32, u32) {
    let inv = !weight;
    let minus = (pos & inv) | (neg & weight);
    let plus = (pos & weight) | (neg & inv);
    (plus.popcount(), minus.popcount())
}

/// `(plus, minus)` counts of a ternary input against ternary weights.
#[inline(always)]
pub fn tnn_counts<W: PackedWord>(pos: W, neg: W, w_pos: W, w_neg: W) -> (u32, u32) {
    let minus = (pos & w_neg) | (neg & w_pos);
    let plus = (pos & w_pos) | (neg & w_neg);
    (plus.popcount(), minus.popcount())
}
