// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::ops::BitAnd;

/// Trait for common number operations.
pub trait NumExt: BitAnd<Output = Self> + Copy + PartialEq + Default {
    /// Convert to u32
    fn u32(self) -> u32;
    /// Convert to u64
    fn u64(self) -> u64;
    /// Convert to usize
    fn us(self) -> usize;

    /// Convert from u64, truncating.
    fn from_u64(from: u64) -> Self;

    /// Is this value a multiple of the given power-of-two alignment?
    fn is_aligned(self, align: u32) -> bool;
}

macro_rules! num_ext_impl {
    ($ty:ident) => {
        impl NumExt for $ty {
            #[inline(always)]
            fn u32(self) -> u32 {
                self as u32
            }

            #[inline(always)]
            fn u64(self) -> u64 {
                self as u64
            }

            #[inline(always)]
            fn us(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn from_u64(from: u64) -> Self {
                from as $ty
            }

            #[inline(always)]
            fn is_aligned(self, align: u32) -> bool {
                (self & (align as $ty).wrapping_sub(1)) == 0
            }
        }
    };
}

num_ext_impl!(u8);
num_ext_impl!(u16);
num_ext_impl!(u32);
num_ext_impl!(u64);
num_ext_impl!(usize);

/// Parse an unsigned number the way device properties and scripts accept
/// them: decimal, or hexadecimal with a `0x` prefix.
pub fn parse_u64(text: &str) -> Option<u64> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => text.replace('_', "").parse().ok(),
    }
}
