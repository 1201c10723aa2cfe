use crate::conv::ConvParams;
use crate::error::Result;
use crate::network::{Conv2d, Flatten, Linear, MaxPool2d, Network};
use crate::quantization::{DefaultWord, PackedWord, QuantMode};

/// Input shape of [`lenet`]: 3x32x32.
pub const LENET_INPUT: (usize, usize, usize) = (3, 32, 32);

/// Build LeNet-5 with every weighted layer in `mode` (10-class output).
///
/// 3x32x32 -> conv5 -> 6x28x28 -> pool -> conv5 -> 16x10x10 -> pool ->
/// 400 -> 120 -> 84 -> 10.
pub fn lenet(mode: QuantMode) -> Result<Network> {
    lenet_with::<DefaultWord>(mode)
}

/// [`lenet`] with an explicit word type.
pub fn lenet_with<W: PackedWord>(mode: QuantMode) -> Result<Network> {
    let (channels, _, _) = LENET_INPUT;
    let mut net = Network::new();
    net.add("conv1", Conv2d::<W>::new(channels, 6, ConvParams::kernel(5), mode)?);
    net.add("pool1", MaxPool2d::Fixed);
    net.add("conv2", Conv2d::<W>::new(6, 16, ConvParams::kernel(5), mode)?);
    net.add("pool2", MaxPool2d::Fixed);
    net.add("flatten", Flatten);
    net.add("linear1", Linear::<W>::new(16 * 5 * 5, 120, mode)?);
    net.add("linear2", Linear::<W>::new(120, 84, mode)?);
    net.add("linear3", Linear::<W>::new(84, 10, mode)?);
    Ok(net)
}
