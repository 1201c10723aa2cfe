use crate::quantization::{bnn_disagreements, channel_mask, tbn_counts, tnn_counts, BitPlane, PackedWord, TernaryPlanes};

use super::{fill_rows, Window};

/// Binary convolution.
///
/// Disagreements are counted with XOR + popcount. Taps in the padding are
/// counted separately so that, per output element,
/// `cnt_one = (kernel_area - cnt_zero) * bits_per_tap - cnt_minus_one`, where
/// `bits_per_tap` is the number of real input channels.
pub(crate) fn conv_bnn<W: PackedWord>(
    window: &Window,
    input: &BitPlane<W>,
    weights: &[W],
    bits_per_tap: usize,
    output: &mut [f32],
) {
    let words = input.words;
    let taps = window.kernel_area();
    let (out_h, out_w, kw) = (window.out_h, window.out_w, window.kernel_w);
    let masks: Vec<W> = (0..words).map(|g| channel_mask(bits_per_tap, g)).collect();

    fill_rows(output, out_w, |r, row| {
        let (co, y) = (r / out_h, r % out_h);
        let ys = window.rows.at(y);
        let w_base = co * words * taps;
        for (x, out) in row.iter_mut().enumerate() {
            let xs = window.cols.at(x);
            let mut cnt_minus_one = 0usize;
            let mut cnt_zero = 0usize;
            for (ky, iy) in ys.iter().enumerate() {
                for (kx, ix) in xs.iter().enumerate() {
                    let (Some(iy), Some(ix)) = (*iy, *ix) else {
                        cnt_zero += 1;
                        continue;
                    };
                    let pos = iy * window.in_w + ix;
                    let tap = ky * kw + kx;
                    for g in 0..words {
                        let weight = weights[w_base + g * taps + tap];
                        cnt_minus_one += bnn_disagreements(input.word(g, pos), weight, masks[g]) as usize;
                    }
                }
            }
            let cnt_minus_one = cnt_minus_one as i64;
            let cnt_one = ((taps - cnt_zero) * bits_per_tap) as i64 - cnt_minus_one;
            *out = (cnt_one - cnt_minus_one) as f32;
        }
    });
}

/// Ternary-input, binary-weight convolution. Padding taps add nothing.
pub(crate) fn conv_tbn<W: PackedWord>(window: &Window, input: &TernaryPlanes<W>, weights: &[W], output: &mut [f32]) {
    let words = input.words;
    let taps = window.kernel_area();
    let (out_h, out_w, kw) = (window.out_h, window.out_w, window.kernel_w);

    fill_rows(output, out_w, |r, row| {
        let (co, y) = (r / out_h, r % out_h);
        let ys = window.rows.at(y);
        let w_base = co * words * taps;
        for (x, out) in row.iter_mut().enumerate() {
            let xs = window.cols.at(x);
            let mut cnt_one = 0i64;
            let mut cnt_minus_one = 0i64;
            for (ky, iy) in ys.iter().enumerate() {
                let Some(iy) = *iy else { continue };
                for (kx, ix) in xs.iter().enumerate() {
                    let Some(ix) = *ix else { continue };
                    let pos = iy * window.in_w + ix;
                    let tap = ky * kw + kx;
                    for g in 0..words {
                        let (bit_1, bit_0) = input.word(g, pos);
                        let (plus, minus) = tbn_counts(bit_1, bit_0, weights[w_base + g * taps + tap]);
                        cnt_one += plus as i64;
                        cnt_minus_one += minus as i64;
                    }
                }
            }
            *out = (cnt_one - cnt_minus_one) as f32;
        }
    });
}

/// Ternary convolution against two-plane weights. Padding taps add nothing.
pub(crate) fn conv_tnn<W: PackedWord>(
    window: &Window,
    input: &TernaryPlanes<W>,
    w_pos: &[W],
    w_neg: &[W],
    output: &mut [f32],
) {
    let words = input.words;
    let taps = window.kernel_area();
    let (out_h, out_w, kw) = (window.out_h, window.out_w, window.kernel_w);

    fill_rows(output, out_w, |r, row| {
        let (co, y) = (r / out_h, r % out_h);
        let ys = window.rows.at(y);
        let w_base = co * words * taps;
        for (x, out) in row.iter_mut().enumerate() {
            let xs = window.cols.at(x);
            let mut cnt_one = 0i64;
            let mut cnt_minus_one = 0i64;
            for (ky, iy) in ys.iter().enumerate() {
                let Some(iy) = *iy else { continue };
                for (kx, ix) in xs.iter().enumerate() {
                    let Some(ix) = *ix else { continue };
                    let pos = iy * window.in_w + ix;
                    let tap = ky * kw + kx;
                    for g in 0..words {
                        let (bit_1, bit_0) = input.word(g, pos);
                        let idx = w_base + g * taps + tap;
                        let (plus, minus) = tnn_counts(bit_1, bit_0, w_pos[idx], w_neg[idx]);
                        cnt_one += plus as i64;
                        cnt_minus_one += minus as i64;
                    }
                }
            }
            *out = (cnt_one - cnt_minus_one) as f32;
        }
    });
}
