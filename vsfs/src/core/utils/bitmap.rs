// SPDX-License-Identifier: MIT

//! Bitmap operations on byte slices.
//!
//! Shared by the on-disk allocation bitmaps and the in-memory reachability
//! tracker, so both agree on bit placement.

/// Extension trait for bitmap operations on byte slices.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8`, LSB first:
/// - Bit 0 is the LSB of byte 0
/// - Bit 7 is the MSB of byte 0
/// - Bit 8 is the LSB of byte 1, etc.
pub trait BitmapOps {
    /// Sets or clears a bit at the given position.
    ///
    /// Does nothing if `bit` is out of bounds.
    fn set_bit(&mut self, bit: usize, value: bool);

    /// Gets the value of a bit at the given position.
    ///
    /// Returns `false` if `bit` is out of bounds.
    fn get_bit(&self, bit: usize) -> bool;

    /// Counts the set bits in `[0, bits)`.
    fn count_ones_below(&self, bits: usize) -> usize;

    /// Counts the total number of set bits in the entire bitmap.
    fn count_ones(&self) -> usize;
}

impl BitmapOps for [u8] {
    #[inline]
    fn set_bit(&mut self, bit: usize, value: bool) {
        if let Some(byte) = self.get_mut(bit / 8) {
            let mask = 1u8 << (bit % 8);
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    #[inline]
    fn get_bit(&self, bit: usize) -> bool {
        self.get(bit / 8)
            .is_some_and(|b| (b & (1 << (bit % 8))) != 0)
    }

    fn count_ones_below(&self, bits: usize) -> usize {
        (0..bits).filter(|&i| self.get_bit(i)).count()
    }

    fn count_ones(&self) -> usize {
        self.iter().map(|b| b.count_ones() as usize).sum()
    }
}
