// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::core::checker::*;
use crate::core::errors::FsRepairResult;
use crate::core::utils::bitmap::BitmapOps;
use crate::fs::vsfs::{
    meta::VsfsMeta,
    utils,
    walker::{PointerKind, PointerRef, PointerWalker, Step},
};
use vsio::prelude::*;

/// Per-data-block reference flags built from one scan of the inode table.
///
/// Both data blocks and in-range indirect blocks count as referenced.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    any: ReachabilityTracker,
    valid: ReachabilityTracker,
}

impl ReferenceTable {
    fn new(meta: &VsfsMeta) -> Self {
        Self {
            any: ReachabilityTracker::new(meta.first_data_block, meta.data_block_count()),
            valid: ReachabilityTracker::new(meta.first_data_block, meta.data_block_count()),
        }
    }

    fn mark(&mut self, block: u32, by_valid: bool) {
        self.any.mark(block);
        if by_valid {
            self.valid.mark(block);
        }
    }

    pub fn referenced_by_any(&self, block: u32) -> bool {
        self.any.is_marked(block)
    }

    pub fn referenced_by_valid(&self, block: u32) -> bool {
        self.valid.is_marked(block)
    }

    pub fn any(&self) -> &ReachabilityTracker {
        &self.any
    }

    pub fn valid(&self) -> &ReachabilityTracker {
        &self.valid
    }
}

/// Result of the data bitmap check, consumed by [`repair`].
///
/// Only [`check`] builds one, so a repair always acts on the reference table
/// derived from the image state it is applied to.
#[derive(Debug, Clone)]
pub struct DataBitmapReconciliation {
    refs: ReferenceTable,
    bitmap: Vec<u8>,
    over_allocated: Vec<u32>,
    under_allocated: Vec<u32>,
    held_by_invalid: Vec<u32>,
}

impl DataBitmapReconciliation {
    pub fn references(&self) -> &ReferenceTable {
        &self.refs
    }

    /// Blocks allocated in the bitmap that no inode references.
    pub fn over_allocated(&self) -> &[u32] {
        &self.over_allocated
    }

    /// Referenced blocks missing from the bitmap.
    pub fn under_allocated(&self) -> &[u32] {
        &self.under_allocated
    }

    /// Allocated blocks referenced only by invalid inodes. Left allocated.
    pub fn held_by_invalid(&self) -> &[u32] {
        &self.held_by_invalid
    }

    pub fn defects(&self) -> usize {
        self.over_allocated.len() + self.under_allocated.len()
    }
}

/// Walks every inode and marks each in-range data or indirect block it references.
///
/// Out-of-range pointers are reported as `WALK.RANGE` warnings and not followed.
pub fn build_references<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<ReferenceTable> {
    let mut refs = ReferenceTable::new(meta);
    let mut walker = PointerWalker::new(io, meta);

    walker.walk_table(false, |r: &PointerRef| {
        if !r.in_range {
            let what = match r.kind {
                PointerKind::Data => "data block",
                PointerKind::Indirect { .. } => "indirect block",
            };
            rep.push(Finding::warn(
                "WALK.RANGE",
                format!(
                    "Inode {}: bad {what} pointer {} in {}, out of valid data range",
                    r.inode, r.block, r.origin
                ),
            ));
            return Step::Skip;
        }
        refs.mark(r.block, r.inode_valid);
        Step::Descend
    })?;

    Ok(refs)
}

pub fn check<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<DataBitmapReconciliation> {
    let refs = build_references(io, meta, rep)?;
    let bitmap = utils::read_bitmap(io, meta, meta.data_bitmap_block)?;

    // Rule A: every allocated block must be referenced by a valid inode
    let mut over_allocated = Vec::new();
    let mut held_by_invalid = Vec::new();
    refs.valid.for_each_orphan(&bitmap, |block| {
        if refs.any.is_marked(block) {
            held_by_invalid.push(block);
        } else {
            over_allocated.push(block);
        }
    });

    // Rule B: every referenced block must be allocated
    let mut under_allocated = Vec::new();
    refs.any
        .for_each_missing(&bitmap, |block| under_allocated.push(block));

    for &block in &over_allocated {
        rep.push(Finding::err(
            "DBM.RULE_A",
            format!(
                "Block {block} (bitmap bit {}) is used in bitmap, but not referenced by any valid inode",
                bit_of(meta, block)
            ),
        ));
    }
    for &block in &held_by_invalid {
        rep.push(Finding::warn(
            "DBM.STALE",
            format!(
                "Block {block} (bitmap bit {}) is referenced only by invalid inodes, left allocated",
                bit_of(meta, block)
            ),
        ));
    }
    for &block in &under_allocated {
        rep.push(Finding::err(
            "DBM.RULE_B",
            format!(
                "Block {block} (bitmap bit {}) is referenced by an inode, but not marked used in data bitmap",
                bit_of(meta, block)
            ),
        ));
    }

    if over_allocated.is_empty() && under_allocated.is_empty() {
        rep.push(Finding::info(
            "DBM.OK",
            format!(
                "{} of {} data block(s) in use, bitmap consistent",
                bitmap.count_ones_below(meta.data_block_count()),
                meta.data_block_count()
            ),
        ));
    }

    Ok(DataBitmapReconciliation {
        refs,
        bitmap,
        over_allocated,
        under_allocated,
        held_by_invalid,
    })
}

fn bit_of(meta: &VsfsMeta, block: u32) -> usize {
    meta.data_bit(block).unwrap_or_default()
}

/// Flips exactly the bits listed by [`check`] and writes the bitmap once.
///
/// Does not rescan the inode table.
pub fn repair<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rec: DataBitmapReconciliation,
    rep: &mut VerifyReport,
) -> FsRepairResult {
    let DataBitmapReconciliation {
        mut bitmap,
        over_allocated,
        under_allocated,
        ..
    } = rec;

    for bit in over_allocated.iter().filter_map(|&b| meta.data_bit(b)) {
        bitmap.set_bit(bit, false);
    }
    for bit in under_allocated.iter().filter_map(|&b| meta.data_bit(b)) {
        bitmap.set_bit(bit, true);
    }

    utils::write_bitmap(io, meta, meta.data_bitmap_block, &bitmap)?;
    io.flush()?;
    rep.push(Finding::fixed(
        "DBM.FIXED",
        format!(
            "Data bitmap: cleared {} orphaned bit(s), set {} missing bit(s)",
            over_allocated.len(),
            under_allocated.len()
        ),
    ));
    Ok(())
}
