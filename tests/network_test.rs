use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use bitconv::arc::{alexnet, lenet, lenet_with, qcad, qcad_with, ALEXNET_INPUT, LENET_INPUT};
use bitconv::{Error, Flatten, LayerType, Linear, MaxPool2d, Network, QuantMode, Tensor};

/// Identity FP layer followed by a TNN layer with weights (+1, -1).
fn two_layer_net() -> Network {
    Network::new()
        .with("fc1", Linear::<u32>::new(2, 2, QuantMode::Fp).unwrap())
        .with("fc2", Linear::<u32>::new(2, 1, QuantMode::Tnn).unwrap())
}

fn two_layer_weights() -> Vec<u8> {
    let mut bytes = Vec::new();
    for w in [1.0f32, 0.0, 0.0, 1.0] {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    // TNN: neg plane, then pos plane
    bytes.extend_from_slice(&0b10u32.to_le_bytes());
    bytes.extend_from_slice(&0b01u32.to_le_bytes());
    bytes
}

fn input(values: &[f32]) -> Tensor {
    Tensor::from_vec(values.len(), 1, 1, values.to_vec()).unwrap()
}

#[test]
fn lenet_runs_in_every_mode() {
    let (c, h, w) = LENET_INPUT;
    for mode in QuantMode::ALL {
        let net = lenet(mode).unwrap();
        assert_eq!(net.num_layers(), 8);
        let out = net.predict(Tensor::new(c, h, w)).unwrap();
        assert_eq!((out.c(), out.h(), out.w()), (10, 1, 1), "{}", mode);
    }
}

#[test]
fn zero_fp_weights_give_zero_logits() {
    let (c, h, w) = LENET_INPUT;
    let mut x = Tensor::new(c, h, w);
    x.fill(0.5);
    let out = lenet(QuantMode::Fp).unwrap().predict(x).unwrap();
    assert!(out.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn lenet_stage_order() {
    let net = lenet(QuantMode::Bnn).unwrap();
    let types: Vec<LayerType> = net.layers().map(|(_, t)| t).collect();
    assert_eq!(
        types,
        vec![
            LayerType::Conv2d,
            LayerType::MaxPool2d,
            LayerType::Conv2d,
            LayerType::MaxPool2d,
            LayerType::Flatten,
            LayerType::Linear,
            LayerType::Linear,
            LayerType::Linear,
        ]
    );
    assert_eq!(net.layers().next().map(|(name, _)| name), Some("conv1"));
}

#[test]
fn packed_lenet_uses_less_weight_memory() {
    let fp = lenet_with::<u32>(QuantMode::Fp).unwrap();
    let bnn = lenet_with::<u32>(QuantMode::Bnn).unwrap();
    let tnn = lenet_with::<u32>(QuantMode::Tnn).unwrap();
    // conv1: 6 x 3 x 25 floats vs 6 x 1 x 25 words
    assert_eq!(fp.layer_weight_memory()[0], 6 * 3 * 25 * 4);
    assert_eq!(bnn.layer_weight_memory()[0], 6 * 25 * 4);
    assert_eq!(bnn.layer_weight_memory()[1], 0);
    assert!(bnn.weight_memory_bytes() < tnn.weight_memory_bytes());
    assert!(tnn.weight_memory_bytes() < fp.weight_memory_bytes());
}

#[test]
fn qcad_output_is_two_classes() {
    for mode in QuantMode::ALL {
        let out = qcad(mode, 16, 12).unwrap().predict(Tensor::new(1, 16, 12)).unwrap();
        assert_eq!(out.len(), 2, "{}", mode);
    }
    assert!(matches!(qcad_with::<u64>(QuantMode::Bnn, 3, 16), Err(Error::InvalidConfig(_))));
}

#[test]
fn alexnet_binary_shapes() {
    let (c, h, w) = ALEXNET_INPUT;
    let net = alexnet(QuantMode::Bnn).unwrap();
    let (out, timings) = net.predict_timed(Tensor::new(c, h, w)).unwrap();
    assert_eq!(out.len(), 1000);
    assert_eq!(timings.len(), net.num_layers());
    assert_eq!(timings[0].0, LayerType::Conv2d);
}

#[test]
fn weights_load_layer_by_layer() {
    let mut net = two_layer_net();
    net.load_from(&mut two_layer_weights().as_slice()).unwrap();
    // fc1 passes (3, -2) through; fc2 sees (+1, -1) against (+1, -1)
    let out = net.predict(input(&[3.0, -2.0])).unwrap();
    assert_eq!(out.as_slice(), &[2.0]);
}

#[test]
fn gzipped_weights_load_from_disk() {
    let dir = std::env::temp_dir().join(format!("bitconv-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let raw = dir.join("net.bin");
    std::fs::write(&raw, two_layer_weights()).unwrap();
    let gz = dir.join("net.bin.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&two_layer_weights()).unwrap();
    std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

    for path in [&raw, &gz] {
        let mut net = two_layer_net();
        net.load(path).unwrap();
        assert_eq!(net.predict(input(&[3.0, -2.0])).unwrap().as_slice(), &[2.0], "{}", path.display());
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn truncated_weights_are_io_errors() {
    let bytes = two_layer_weights();
    let mut net = two_layer_net();
    let err = net.load_from(&mut &bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn trailing_bytes_in_weight_file_are_rejected() {
    let path = std::env::temp_dir().join(format!("bitconv-trailing-{}.bin", std::process::id()));
    let mut bytes = two_layer_weights();
    bytes.push(0);
    std::fs::write(&path, &bytes).unwrap();
    let mut net = two_layer_net();
    let result = net.load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn missing_file_is_io_error() {
    let mut net = two_layer_net();
    assert!(matches!(net.load("/nonexistent/bitconv/weights.bin"), Err(Error::Io(_))));
}

#[test]
fn stages_without_weights_read_nothing() {
    let mut net = Network::new()
        .with("pool", MaxPool2d::Fixed)
        .with("flatten", Flatten)
        .with("fc", Linear::<u64>::new(4, 1, QuantMode::Bnn).unwrap());
    // one u64 word: channel 0 weight is -1
    net.load_from(&mut &1u64.to_le_bytes()[..]).unwrap();
    let x = Tensor::from_vec(4, 2, 2, vec![1.0; 16]).unwrap();
    // channels (+1,+1,+1,+1) against (-1,+1,+1,+1)
    assert_eq!(net.predict(x).unwrap().as_slice(), &[2.0]);
}

#[test]
fn errors_stop_the_pipeline() {
    let net = Network::new().with("fc", Linear::<u64>::new(3, 1, QuantMode::Fp).unwrap());
    assert!(matches!(net.predict(input(&[1.0, 2.0])), Err(Error::ShapeMismatch { .. })));
}
