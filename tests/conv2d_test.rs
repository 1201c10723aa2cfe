mod common;

use bitconv::{Conv2d, ConvParams, Error, PackedWord, QuantMode, Tensor, Weights};
use common::{assert_approx_eq, signs, trits};

fn conv<W: PackedWord>(
    mode: QuantMode,
    in_c: usize,
    out_c: usize,
    params: ConvParams,
    logical: &[f32],
    threshold: f32,
) -> Conv2d<W> {
    let taps = params.kernel_size * params.kernel_size;
    let mut layer = Conv2d::<W>::new(in_c, out_c, params, mode).unwrap().with_threshold(threshold);
    layer
        .set_weights(Weights::from_logical(mode, logical, out_c, in_c, taps).unwrap())
        .unwrap();
    layer
}

/// Embed `data` (`[c, h, w]`) in a zero border of width `pad`.
fn zero_border(data: &[f32], c: usize, h: usize, w: usize, pad: usize) -> Tensor {
    let (ph, pw) = (h + 2 * pad, w + 2 * pad);
    let mut out = Tensor::new(c, ph, pw);
    for ch in 0..c {
        for y in 0..h {
            for x in 0..w {
                out.set(ch, y + pad, x + pad, data[(ch * h + y) * w + x]);
            }
        }
    }
    out
}

#[test]
fn fp_ones_kernel_on_ones() {
    let mut layer = Conv2d::<u64>::new(1, 1, ConvParams::kernel(3), QuantMode::Fp).unwrap();
    layer.set_weights(Weights::Fp(vec![1.0; 9])).unwrap();
    let mut input = Tensor::new(1, 4, 4);
    input.fill(1.0);
    let out = layer.forward(input).unwrap();
    assert_eq!((out.c(), out.h(), out.w()), (1, 2, 2));
    assert_eq!(out.as_slice(), &[9.0; 4]);
}

#[test]
fn padded_corners_see_fewer_taps() {
    let params = ConvParams::kernel(3).with_padding(1);
    for mode in QuantMode::ALL {
        let layer = conv::<u64>(mode, 1, 1, params, &[1.0; 9], 0.0);
        let mut input = Tensor::new(1, 4, 4);
        input.fill(1.0);
        let out = layer.forward(input).unwrap();
        assert_eq!((out.h(), out.w()), (4, 4), "{}", mode);
        assert_eq!(out.get(0, 0, 0), 4.0, "{} corner", mode);
        assert_eq!(out.get(0, 0, 1), 6.0, "{} edge", mode);
        assert_eq!(out.get(0, 1, 1), 9.0, "{} interior", mode);
    }
}

#[test]
fn output_shape_follows_stride_and_dilation() {
    let cases = [
        (ConvParams::kernel(3).with_stride(2), 5, 5, (2, 2)),
        (ConvParams::kernel(3).with_dilation(2), 7, 9, (3, 5)),
        (ConvParams::kernel(11).with_stride(4).with_padding(2), 224, 224, (55, 55)),
        (ConvParams::kernel(5).with_padding(2), 27, 27, (27, 27)),
    ];
    for (params, h, w, expected) in cases {
        for mode in QuantMode::ALL {
            let layer = Conv2d::<u32>::new(3, 2, params, mode).unwrap();
            assert_eq!(layer.output_shape(h, w).unwrap(), expected);
            if h < 50 {
                let out = layer.forward(Tensor::new(3, h, w)).unwrap();
                assert_eq!((out.c(), out.h(), out.w()), (2, expected.0, expected.1), "{} {:?}", mode, params);
            }
        }
    }
}

#[test]
fn bnn_and_tbn_match_fp_on_signs() {
    let (in_c, out_c, h, w) = (37, 3, 6, 7);
    let params = ConvParams::kernel(3).with_padding(1).with_stride(2);
    let weights = signs(out_c * in_c * 9, 1);
    let data = signs(in_c * h * w, 2);
    let input = Tensor::from_vec(in_c, h, w, data).unwrap();

    let expected = conv::<u64>(QuantMode::Fp, in_c, out_c, params, &weights, 0.0)
        .forward(input.clone())
        .unwrap();
    for mode in [QuantMode::Bnn, QuantMode::Tbn] {
        let out32 = conv::<u32>(mode, in_c, out_c, params, &weights, 0.0).forward(input.clone()).unwrap();
        let out64 = conv::<u64>(mode, in_c, out_c, params, &weights, 0.0).forward(input.clone()).unwrap();
        assert_approx_eq(out32.as_slice(), expected.as_slice(), 1e-4, &format!("{} u32", mode));
        assert_approx_eq(out64.as_slice(), expected.as_slice(), 1e-4, &format!("{} u64", mode));
    }
}

#[test]
fn tnn_matches_fp_on_trits() {
    let (in_c, out_c, h, w) = (70, 2, 5, 5);
    let params = ConvParams::kernel(3).with_padding(1).with_dilation(2);
    let weights = trits(out_c * in_c * 9, 3);
    let input = Tensor::from_vec(in_c, h, w, trits(in_c * h * w, 4)).unwrap();

    let expected = conv::<u64>(QuantMode::Fp, in_c, out_c, params, &weights, 0.0)
        .forward(input.clone())
        .unwrap();
    let out = conv::<u64>(QuantMode::Tnn, in_c, out_c, params, &weights, 0.5).forward(input).unwrap();
    assert_approx_eq(out.as_slice(), expected.as_slice(), 1e-4, "tnn");
}

#[test]
fn padding_matches_explicit_zero_border() {
    let (in_c, out_c, h, w, pad) = (5, 2, 4, 5, 2);
    let data = trits(in_c * h * w, 7);
    let weights = trits(out_c * in_c * 9, 8);
    let padded = ConvParams::kernel(3).with_padding(pad);
    let plain = ConvParams::kernel(3);

    // BNN maps zero to +1, so only modes with a dead zone qualify.
    for mode in [QuantMode::Fp, QuantMode::Tbn, QuantMode::Tnn] {
        let a = conv::<u64>(mode, in_c, out_c, padded, &weights, 0.5)
            .forward(Tensor::from_vec(in_c, h, w, data.clone()).unwrap())
            .unwrap();
        let b = conv::<u64>(mode, in_c, out_c, plain, &weights, 0.5)
            .forward(zero_border(&data, in_c, h, w, pad))
            .unwrap();
        assert_eq!((a.h(), a.w()), (b.h(), b.w()));
        assert_approx_eq(a.as_slice(), b.as_slice(), 1e-4, &format!("{}", mode));
    }
}

#[test]
fn bnn_ignores_weight_bits_past_in_channels() {
    let mut layer = Conv2d::<u64>::new(3, 1, ConvParams::kernel(1), QuantMode::Bnn).unwrap();
    layer.set_weights(Weights::Bnn(vec![!0u64 << 3])).unwrap();
    let mut input = Tensor::new(3, 1, 1);
    input.fill(1.0);
    assert_eq!(layer.forward(input).unwrap().as_slice(), &[3.0]);

    // padded taps still count as zero on a masked layer
    let mut layer = Conv2d::<u32>::new(3, 1, ConvParams::kernel(3).with_padding(1), QuantMode::Bnn).unwrap();
    layer.set_weights(Weights::Bnn(vec![!0u32 << 3; 9])).unwrap();
    let mut input = Tensor::new(3, 1, 1);
    input.fill(1.0);
    assert_eq!(layer.forward(input).unwrap().as_slice(), &[3.0]);
}

#[test]
fn oversized_kernel_is_an_error() {
    let layer = Conv2d::<u64>::new(1, 1, ConvParams::kernel(3).with_dilation(3), QuantMode::Bnn).unwrap();
    assert!(matches!(layer.forward(Tensor::new(1, 6, 6)), Err(Error::InvalidShape(_))));
    // padding makes it fit
    let layer = Conv2d::<u64>::new(1, 1, ConvParams::kernel(3).with_dilation(3).with_padding(1), QuantMode::Bnn).unwrap();
    assert_eq!(layer.output_shape(6, 6).unwrap(), (2, 2));
}

#[test]
fn weight_memory_shrinks_when_packed() {
    let fp = Conv2d::<u32>::new(64, 64, ConvParams::kernel(3), QuantMode::Fp).unwrap();
    let bnn = Conv2d::<u32>::new(64, 64, ConvParams::kernel(3), QuantMode::Bnn).unwrap();
    let tnn = Conv2d::<u32>::new(64, 64, ConvParams::kernel(3), QuantMode::Tnn).unwrap();
    assert_eq!(fp.weights().memory_bytes(), 64 * 64 * 9 * 4);
    assert_eq!(bnn.weights().memory_bytes(), 64 * 2 * 9 * 4);
    assert_eq!(tnn.weights().memory_bytes(), 2 * 64 * 2 * 9 * 4);
}
