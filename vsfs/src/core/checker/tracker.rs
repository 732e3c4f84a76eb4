// SPDX-License-Identifier: MIT

//! Reachability tracker for pointer-graph walks.
//!
//! A compact bit set over a contiguous range of units (blocks or inodes),
//! addressed by raw unit numbers.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::core::utils::bitmap::BitmapOps;

/// Tracks which units were reached during a walk.
///
/// Uses 1 bit per unit and handles the base unit offset internally, so
/// callers mark raw unit numbers. Bit `i` stands for unit `base_unit + i`,
/// which is also the layout of an on-disk allocation bitmap starting at
/// `base_unit`.
///
/// # Example
/// ```ignore
/// use vsfs::core::checker::ReachabilityTracker;
///
/// // Data blocks 8..=63
/// let mut tracker = ReachabilityTracker::new(8, 56);
/// tracker.mark(12);
/// assert!(tracker.is_marked(12));
/// assert!(!tracker.is_marked(7));
/// ```
#[derive(Debug, Clone)]
pub struct ReachabilityTracker {
    bitmap: Vec<u8>,
    base_unit: u32,
    count: usize,
}

impl ReachabilityTracker {
    /// Creates a tracker for `count` units starting at `base_unit`.
    pub fn new(base_unit: u32, count: usize) -> Self {
        Self {
            bitmap: vec![0u8; count.div_ceil(8)],
            base_unit,
            count,
        }
    }

    #[inline]
    fn index(&self, unit: u32) -> Option<usize> {
        let idx = unit.checked_sub(self.base_unit)? as usize;
        (idx < self.count).then_some(idx)
    }

    /// Marks a unit as reached.
    ///
    /// Returns `true` if the unit was not marked before. Units out of range
    /// are ignored and return `false`.
    #[inline]
    pub fn mark(&mut self, unit: u32) -> bool {
        match self.index(unit) {
            Some(idx) => {
                let fresh = !self.bitmap.get_bit(idx);
                self.bitmap.set_bit(idx, true);
                fresh
            }
            None => false,
        }
    }

    /// Checks if a unit is marked.
    #[inline]
    pub fn is_marked(&self, unit: u32) -> bool {
        self.index(unit).is_some_and(|idx| self.bitmap.get_bit(idx))
    }

    /// Unmarks every unit.
    pub fn clear(&mut self) {
        self.bitmap.fill(0);
    }

    /// Returns the raw bitmap for comparison with on-disk bitmaps.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bitmap
    }

    /// Returns the number of tracked units.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the base unit offset.
    pub fn base_unit(&self) -> u32 {
        self.base_unit
    }

    /// Number of marked units.
    pub fn marked(&self) -> usize {
        self.bitmap.count_ones()
    }

    /// Calls `f` for every orphan unit: set in `on_disk` but not marked here.
    ///
    /// Bits of `on_disk` beyond `count` are ignored.
    pub fn for_each_orphan<F>(&self, on_disk: &[u8], mut f: F)
    where
        F: FnMut(u32),
    {
        for idx in 0..self.count {
            if on_disk.get_bit(idx) && !self.bitmap.get_bit(idx) {
                f(self.base_unit + idx as u32);
            }
        }
    }

    /// Calls `f` for every missing unit: marked here but clear in `on_disk`.
    pub fn for_each_missing<F>(&self, on_disk: &[u8], mut f: F)
    where
        F: FnMut(u32),
    {
        for idx in 0..self.count {
            if self.bitmap.get_bit(idx) && !on_disk.get_bit(idx) {
                f(self.base_unit + idx as u32);
            }
        }
    }
}
