// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::core::checker::*;
use crate::core::errors::FsRepairResult;
use crate::core::utils::bitmap::BitmapOps;
use crate::fs::vsfs::{meta::VsfsMeta, utils};
use vsio::prelude::*;

/// Inode bitmap as read, plus the bits that disagree with inode validity.
#[derive(Debug, Clone)]
pub struct InodeBitmapReconciliation {
    bitmap: Vec<u8>,
    to_clear: Vec<u32>,
    to_set: Vec<u32>,
}

impl InodeBitmapReconciliation {
    /// Inodes marked in the bitmap but invalid.
    pub fn to_clear(&self) -> &[u32] {
        &self.to_clear
    }

    /// Valid inodes missing from the bitmap.
    pub fn to_set(&self) -> &[u32] {
        &self.to_set
    }

    pub fn defects(&self) -> usize {
        self.to_clear.len() + self.to_set.len()
    }
}

pub fn check<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<InodeBitmapReconciliation> {
    let bitmap = utils::read_bitmap(io, meta, meta.inode_bitmap_block)?;
    let mut to_clear = Vec::new();
    let mut to_set = Vec::new();
    let mut in_use = 0usize;

    let per_block = meta.inodes_per_block();
    for (index, block) in meta.inode_table().enumerate() {
        let table = utils::read_inode_block(io, meta, block)?;
        for (slot, inode) in table.inodes.iter().enumerate() {
            let ino = index as u32 * per_block + slot as u32;
            let valid = inode.is_valid();
            let marked = bitmap.get_bit(ino as usize);
            in_use += valid as usize;

            match (marked, valid) {
                (true, false) => {
                    rep.push(Finding::err(
                        "IBM.RULE_A",
                        format!(
                            "Inode {ino} is marked in bitmap but invalid (links={}, dtime={})",
                            inode.links, inode.dtime
                        ),
                    ));
                    to_clear.push(ino);
                }
                (false, true) => {
                    rep.push(Finding::err(
                        "IBM.RULE_B",
                        format!("Valid inode {ino} (links={}) not marked in bitmap", inode.links),
                    ));
                    to_set.push(ino);
                }
                _ => {}
            }
        }
    }

    if to_clear.is_empty() && to_set.is_empty() {
        rep.push(Finding::info(
            "IBM.OK",
            format!(
                "{in_use} of {} inode(s) in use, bitmap consistent",
                meta.inode_count
            ),
        ));
    }

    Ok(InodeBitmapReconciliation {
        bitmap,
        to_clear,
        to_set,
    })
}

/// Applies exactly the corrections found by [`check`] and writes the bitmap once.
pub fn repair<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rec: InodeBitmapReconciliation,
    rep: &mut VerifyReport,
) -> FsRepairResult {
    let InodeBitmapReconciliation {
        mut bitmap,
        to_clear,
        to_set,
    } = rec;

    for &ino in &to_clear {
        bitmap.set_bit(ino as usize, false);
    }
    for &ino in &to_set {
        bitmap.set_bit(ino as usize, true);
    }

    utils::write_bitmap(io, meta, meta.inode_bitmap_block, &bitmap)?;
    io.flush()?;
    rep.push(Finding::fixed(
        "IBM.FIXED",
        format!(
            "Inode bitmap: cleared {} bit(s), set {} bit(s)",
            to_clear.len(),
            to_set.len()
        ),
    ));
    Ok(())
}
