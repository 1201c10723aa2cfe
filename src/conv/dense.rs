use crate::quantization::{bnn_disagreements, channel_mask, tbn_counts, tnn_counts, BitPlane, PackedWord, TernaryPlanes};

use super::fill_rows;

pub(crate) fn linear_fp(input: &[f32], weights: &[f32], output: &mut [f32]) {
    let n = input.len();
    fill_rows(output, 1, |o, out| {
        let row = &weights[o * n..(o + 1) * n];
        out[0] = input.iter().zip(row).map(|(x, w)| x * w).sum();
    });
}

/// `in_features - 2 * disagreements` for every output neuron.
pub(crate) fn linear_bnn<W: PackedWord>(input: &BitPlane<W>, weights: &[W], in_features: usize, output: &mut [f32]) {
    let words = input.words;
    fill_rows(output, 1, |o, out| {
        let row = &weights[o * words..(o + 1) * words];
        let cnt_minus_one: i64 = row
            .iter()
            .enumerate()
            .map(|(g, &w)| bnn_disagreements(input.word(g, 0), w, channel_mask::<W>(in_features, g)) as i64)
            .sum();
        let cnt_one = in_features as i64 - cnt_minus_one;
        out[0] = (cnt_one - cnt_minus_one) as f32;
    });
}

pub(crate) fn linear_tbn<W: PackedWord>(input: &TernaryPlanes<W>, weights: &[W], output: &mut [f32]) {
    let words = input.words;
    fill_rows(output, 1, |o, out| {
        let row = &weights[o * words..(o + 1) * words];
        let mut acc = 0i64;
        for (g, &w) in row.iter().enumerate() {
            let (pos, neg) = input.word(g, 0);
            let (plus, minus) = tbn_counts(pos, neg, w);
            acc += plus as i64 - minus as i64;
        }
        out[0] = acc as f32;
    });
}

pub(crate) fn linear_tnn<W: PackedWord>(input: &TernaryPlanes<W>, w_pos: &[W], w_neg: &[W], output: &mut [f32]) {
    let words = input.words;
    fill_rows(output, 1, |o, out| {
        let base = o * words;
        let mut acc = 0i64;
        for g in 0..words {
            let (pos, neg) = input.word(g, 0);
            let (plus, minus) = tnn_counts(pos, neg, w_pos[base + g], w_neg[base + g]);
            acc += plus as i64 - minus as i64;
        }
        out[0] = acc as f32;
    });
}
