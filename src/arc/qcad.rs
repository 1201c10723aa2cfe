use crate::conv::ConvParams;
use crate::error::{Error, Result};
use crate::network::{Conv2d, Flatten, Linear, MaxPool2d, Network};
use crate::quantization::{DefaultWord, PackedWord, QuantMode};

/// Build the two-class QCAD detector for single-channel `height` x `width`
/// inputs.
pub fn qcad(mode: QuantMode, height: usize, width: usize) -> Result<Network> {
    qcad_with::<DefaultWord>(mode, height, width)
}

/// [`qcad`] with an explicit word type.
pub fn qcad_with<W: PackedWord>(mode: QuantMode, height: usize, width: usize) -> Result<Network> {
    let (pooled_h, pooled_w) = (height / 4, width / 4);
    if pooled_h == 0 || pooled_w == 0 {
        return Err(Error::InvalidConfig(format!(
            "qcad input must be at least 4x4, got {}x{}",
            height, width
        )));
    }
    let same = ConvParams::kernel(3).with_padding(1);
    let mut net = Network::new();
    net.add("conv1", Conv2d::<W>::new(1, 64, same, mode)?);
    net.add("pool1", MaxPool2d::Fixed);
    net.add("conv2", Conv2d::<W>::new(64, 64, same, mode)?);
    net.add("pool2", MaxPool2d::Fixed);
    net.add("flatten", Flatten);
    net.add("linear1", Linear::<W>::new(64 * pooled_h * pooled_w, 128, mode)?);
    net.add("linear2", Linear::<W>::new(128, 2, mode)?);
    Ok(net)
}
