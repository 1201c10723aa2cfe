//! Population count with a hardware fast path and SWAR fallbacks.
//!
//! `count_ones` lowers to a single `popcnt`/`cnt` instruction only when the
//! target advertises it; otherwise the compiler emits a generic routine, so the
//! SWAR version below is used directly.

// ── 32-bit ──

#[cfg(any(target_feature = "popcnt", target_arch = "aarch64"))]
#[inline(always)]
pub fn popcount_u32(x: u32) -> u32 {
    x.count_ones()
}

#[cfg(not(any(target_feature = "popcnt", target_arch = "aarch64")))]
#[inline(always)]
pub fn popcount_u32(x: u32) -> u32 {
    swar_u32(x)
}

/// Parallel bit summation: pairs, nibbles, bytes, then a multiply to fold the
/// byte sums into the top byte.
#[inline(always)]
pub fn swar_u32(x: u32) -> u32 {
    let x = x - ((x >> 1) & 0x5555_5555);
    let x = (x & 0x3333_3333) + ((x >> 2) & 0x3333_3333);
    let x = (x + (x >> 4)) & 0x0f0f_0f0f;
    x.wrapping_mul(0x0101_0101) >> 24
}

// ── 64-bit ──

#[cfg(any(target_feature = "popcnt", target_arch = "aarch64"))]
#[inline(always)]
pub fn popcount_u64(x: u64) -> u32 {
    x.count_ones()
}

#[cfg(not(any(target_feature = "popcnt", target_arch = "aarch64")))]
#[inline(always)]
pub fn popcount_u64(x: u64) -> u32 {
    swar_u64(x)
}

#[inline(always)]
pub fn swar_u64(x: u64) -> u32 {
    let x = x - ((x >> 1) & 0x5555_5555_5555_5555);
    let x = (x & 0x3333_3333_3333_3333) + ((x >> 2) & 0x3333_3333_3333_3333);
    let x = (x + (x >> 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    (x.wrapping_mul(0x0101_0101_0101_0101) >> 56) as u32
}
