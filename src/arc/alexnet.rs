use crate::conv::ConvParams;
use crate::error::Result;
use crate::network::{Conv2d, Flatten, Linear, MaxPool2d, Network};
use crate::quantization::{DefaultWord, PackedWord, QuantMode};

/// Input shape of [`alexnet`]: 3x224x224.
pub const ALEXNET_INPUT: (usize, usize, usize) = (3, 224, 224);

/// Build AlexNet (1000-class output) with every weighted layer in `mode`.
pub fn alexnet(mode: QuantMode) -> Result<Network> {
    alexnet_with::<DefaultWord>(mode)
}

/// [`alexnet`] with an explicit word type.
pub fn alexnet_with<W: PackedWord>(mode: QuantMode) -> Result<Network> {
    let same3 = ConvParams::kernel(3).with_padding(1);
    let mut net = Network::new();
    // 224 -> 55 -> 27
    net.add("conv1", Conv2d::<W>::new(3, 64, ConvParams::kernel(11).with_stride(4).with_padding(2), mode)?);
    net.add("pool1", MaxPool2d::new(3, 2));
    // 27 -> 27 -> 13
    net.add("conv2", Conv2d::<W>::new(64, 192, ConvParams::kernel(5).with_padding(2), mode)?);
    net.add("pool2", MaxPool2d::new(3, 2));
    net.add("conv3", Conv2d::<W>::new(192, 384, same3, mode)?);
    net.add("conv4", Conv2d::<W>::new(384, 256, same3, mode)?);
    net.add("conv5", Conv2d::<W>::new(256, 256, same3, mode)?);
    // 13 -> 6
    net.add("pool3", MaxPool2d::new(3, 2));
    net.add("flatten", Flatten);
    net.add("linear1", Linear::<W>::new(256 * 6 * 6, 4096, mode)?);
    net.add("linear2", Linear::<W>::new(4096, 4096, mode)?);
    net.add("linear3", Linear::<W>::new(4096, 1000, mode)?);
    Ok(net)
}
