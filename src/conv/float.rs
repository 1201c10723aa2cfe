use super::{fill_rows, Window};

/// FP reference convolution. Padding taps are skipped, never multiplied.
pub(crate) fn conv_fp(window: &Window, input: &[f32], in_channels: usize, weights: &[f32], output: &mut [f32]) {
    let in_plane = window.in_plane();
    let taps = window.kernel_area();
    let (out_h, out_w, kw) = (window.out_h, window.out_w, window.kernel_w);

    fill_rows(output, out_w, |r, row| {
        let (co, y) = (r / out_h, r % out_h);
        let ys = window.rows.at(y);
        let w_base = co * in_channels * taps;
        for (x, out) in row.iter_mut().enumerate() {
            let xs = window.cols.at(x);
            let mut sum = 0.0f32;
            for ic in 0..in_channels {
                let in_off = ic * in_plane;
                let w_off = w_base + ic * taps;
                for (ky, iy) in ys.iter().enumerate() {
                    let Some(iy) = *iy else { continue };
                    for (kx, ix) in xs.iter().enumerate() {
                        let Some(ix) = *ix else { continue };
                        sum += input[in_off + iy * window.in_w + ix] * weights[w_off + ky * kw + kx];
                    }
                }
            }
            *out = sum;
        }
    });
}
