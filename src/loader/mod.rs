//! Binary weight files.
//!
//! Weights are stored little-endian, layer after layer in network order.
//! FP layers hold `out * in * taps` f32 values, BNN/TBN layers hold
//! `out * words * taps` packed words and TNN layers hold the `neg` plane
//! followed by the `pos` plane. Files ending in `.gz` are gunzipped on the fly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Result;
use crate::network::Weights;
use crate::quantization::{words_for, PackedWord, QuantMode};
use crate::tensor::try_filled;

/// Open a weight file, transparently decompressing `.gz`.
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn Read>> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

pub fn read_f32s(reader: &mut dyn Read, count: usize) -> Result<Vec<f32>> {
    let mut buf = try_filled("weight bytes", count * 4, 0u8)?;
    reader.read_exact(&mut buf)?;
    Ok(buf
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub fn read_words<W: PackedWord>(reader: &mut dyn Read, count: usize) -> Result<Vec<W>> {
    let mut buf = try_filled("weight bytes", count * W::BYTES, 0u8)?;
    reader.read_exact(&mut buf)?;
    Ok(buf.chunks_exact(W::BYTES).map(W::from_le_slice).collect())
}

/// Read one layer's weights for `mode` and shape `[out, in, taps]`.
pub fn read_weights<W: PackedWord>(
    reader: &mut dyn Read,
    mode: QuantMode,
    out_channels: usize,
    in_channels: usize,
    taps: usize,
) -> Result<Weights<W>> {
    let packed = out_channels * words_for::<W>(in_channels) * taps;
    Ok(match mode {
        QuantMode::Fp => Weights::Fp(read_f32s(reader, out_channels * in_channels * taps)?),
        QuantMode::Bnn => Weights::Bnn(read_words(reader, packed)?),
        QuantMode::Tbn => Weights::Tbn(read_words(reader, packed)?),
        QuantMode::Tnn => {
            let neg = read_words(reader, packed)?;
            let pos = read_words(reader, packed)?;
            Weights::Tnn { pos, neg }
        }
    })
}
