use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor, Not};

use super::popcount::{popcount_u32, popcount_u64};

/// An unsigned machine word holding one bit per input channel.
///
/// Layers and codecs are generic over the word so the packing granularity is
/// picked once, at the type level, rather than by a crate-wide switch.
pub trait PackedWord:
    Copy
    + Default
    + Eq
    + Debug
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitOrAssign
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Channels per word.
    const BITS: usize;
    /// Bytes per word in a weight file.
    const BYTES: usize;
    const ZERO: Self;

    /// A word with only bit `index` set.
    fn bit(index: usize) -> Self;

    /// A word with the lowest `bits` bits set, all bits when `bits >= BITS`.
    fn low_mask(bits: usize) -> Self;

    fn popcount(self) -> u32;

    /// Decode a little-endian word; `bytes` holds exactly [`Self::BYTES`] bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_packed_word {
    ($ty:ty, $popcount:ident) => {
        impl PackedWord for $ty {
            const BITS: usize = <$ty>::BITS as usize;
            const BYTES: usize = std::mem::size_of::<$ty>();
            const ZERO: Self = 0;

            #[inline(always)]
            fn bit(index: usize) -> Self {
                1 << index
            }

            #[inline(always)]
            fn low_mask(bits: usize) -> Self {
                if bits >= <Self as PackedWord>::BITS {
                    !0
                } else {
                    (1 << bits) - 1
                }
            }

            #[inline(always)]
            fn popcount(self) -> u32 {
                $popcount(self)
            }

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }
        }
    };
}

impl_packed_word!(u32, popcount_u32);
impl_packed_word!(u64, popcount_u64);

/// Word type used by the model builders, chosen at build time.
#[cfg(not(feature = "word32"))]
pub type DefaultWord = u64;

#[cfg(feature = "word32")]
pub type DefaultWord = u32;

/// Number of words needed to hold `channels` bits.
pub fn words_for<W: PackedWord>(channels: usize) -> usize {
    channels.div_ceil(W::BITS)
}

/// Mask of the channels actually present in word `group` of a
/// `channels`-wide packing. Only the final word can be partial.
#[inline(always)]
pub fn channel_mask<W: PackedWord>(channels: usize, group: usize) -> W {
    W::low_mask(channels.saturating_sub(group * W::BITS))
}
