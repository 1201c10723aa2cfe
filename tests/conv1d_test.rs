mod common;

use bitconv::{Conv1d, ConvParams, Error, QuantMode, Tensor, Weights};
use common::{assert_approx_eq, signs, trits};

fn conv1d(mode: QuantMode, in_c: usize, out_c: usize, params: ConvParams, logical: &[f32]) -> Conv1d<u64> {
    let mut layer = Conv1d::new(in_c, out_c, params, mode).unwrap().with_threshold(0.5);
    layer
        .set_weights(Weights::from_logical(mode, logical, out_c, in_c, params.kernel_size).unwrap())
        .unwrap();
    layer
}

#[test]
fn dilated_fp_sum() {
    let layer = conv1d(QuantMode::Fp, 1, 1, ConvParams::kernel(3).with_dilation(2), &[1.0; 3]);
    let input = Tensor::from_vec(1, 1, 5, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let out = layer.forward(input).unwrap();
    assert_eq!((out.c(), out.h(), out.w()), (1, 1, 1));
    assert_eq!(out.as_slice(), &[9.0]);
}

#[test]
fn strided_padded_length() {
    let params = ConvParams::kernel(4).with_stride(3).with_padding(2);
    for mode in QuantMode::ALL {
        let layer = Conv1d::<u32>::new(2, 3, params, mode).unwrap();
        // (20 + 4 - 4) / 3 + 1
        assert_eq!(layer.output_len(20).unwrap(), 7);
        let out = layer.forward(Tensor::new2(2, 20)).unwrap();
        assert_eq!((out.c(), out.h(), out.w()), (3, 1, 7), "{}", mode);
    }
}

#[test]
fn quantized_modes_match_fp() {
    let (in_c, out_c, len) = (48, 4, 17);
    let params = ConvParams::kernel(5).with_padding(2).with_stride(2);
    let sign_weights = signs(out_c * in_c * 5, 11);
    let trit_weights = trits(out_c * in_c * 5, 12);
    let sign_input = Tensor::from_vec(in_c, 1, len, signs(in_c * len, 13)).unwrap();
    let trit_input = Tensor::from_vec(in_c, 1, len, trits(in_c * len, 14)).unwrap();

    let fp_signs = conv1d(QuantMode::Fp, in_c, out_c, params, &sign_weights)
        .forward(sign_input.clone())
        .unwrap();
    let fp_tbn = conv1d(QuantMode::Fp, in_c, out_c, params, &sign_weights)
        .forward(trit_input.clone())
        .unwrap();
    let fp_tnn = conv1d(QuantMode::Fp, in_c, out_c, params, &trit_weights)
        .forward(trit_input.clone())
        .unwrap();

    // BNN needs a threshold of 0 so +1 inputs stay +1.
    let mut bnn = conv1d(QuantMode::Bnn, in_c, out_c, params, &sign_weights);
    bnn.set_threshold(0.0);
    let tbn = conv1d(QuantMode::Tbn, in_c, out_c, params, &sign_weights);
    let tnn = conv1d(QuantMode::Tnn, in_c, out_c, params, &trit_weights);

    assert_approx_eq(bnn.forward(sign_input).unwrap().as_slice(), fp_signs.as_slice(), 1e-4, "bnn");
    assert_approx_eq(tbn.forward(trit_input.clone()).unwrap().as_slice(), fp_tbn.as_slice(), 1e-4, "tbn");
    assert_approx_eq(tnn.forward(trit_input).unwrap().as_slice(), fp_tnn.as_slice(), 1e-4, "tnn");
}

#[test]
fn two_dimensional_input_is_rejected() {
    let layer = Conv1d::<u64>::new(1, 1, ConvParams::kernel(3), QuantMode::Fp).unwrap();
    assert!(matches!(layer.forward(Tensor::new(1, 3, 3)), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn short_sequence_is_invalid_shape() {
    let layer = Conv1d::<u64>::new(1, 1, ConvParams::kernel(5), QuantMode::Tnn).unwrap();
    assert!(matches!(layer.forward(Tensor::new2(1, 4)), Err(Error::InvalidShape(_))));
}
