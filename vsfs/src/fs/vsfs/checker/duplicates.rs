// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};

use crate::core::checker::*;
use crate::fs::vsfs::{
    meta::VsfsMeta,
    walker::{PointerRef, PointerWalker, Step},
};
use vsio::prelude::*;

/// Reference counts over every block of the device, with the claiming inodes.
#[derive(Debug, Clone)]
pub struct DuplicateTable {
    owners: Vec<Vec<u32>>,
}

impl DuplicateTable {
    fn new(total_blocks: usize) -> Self {
        Self {
            owners: vec![Vec::new(); total_blocks],
        }
    }

    fn count(&mut self, block: u32, ino: u32) {
        if let Some(owners) = self.owners.get_mut(block as usize) {
            owners.push(ino);
        }
    }

    /// Number of references to `block`.
    pub fn references(&self, block: u32) -> usize {
        self.owners.get(block as usize).map_or(0, Vec::len)
    }

    /// Distinct inodes claiming `block`, in inode order.
    pub fn owners(&self, block: u32) -> Vec<u32> {
        let mut owners = self.owners.get(block as usize).cloned().unwrap_or_default();
        owners.dedup();
        owners
    }

    /// `(block, count)` for every block referenced more than once.
    pub fn duplicates(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, o)| o.len() > 1)
            .map(|(b, o)| (b as u32, o.len()))
    }
}

/// Counts one reference per in-range pointer of every valid inode.
///
/// Indirect blocks count like data blocks. An indirect block reached twice
/// within one inode is counted twice but expanded once.
pub fn count_references<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
) -> FsCheckerResult<DuplicateTable> {
    let mut table = DuplicateTable::new(meta.total_blocks as usize);
    let mut walker = PointerWalker::new(io, meta);

    walker.walk_table(true, |r: &PointerRef| {
        if !r.in_range {
            return Step::Skip;
        }
        table.count(r.block, r.inode);
        Step::Descend
    })?;

    Ok(table)
}

/// Reports every block claimed more than once. Never repairs.
pub fn check<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<DuplicateTable> {
    let table = count_references(io, meta)?;

    let mut found = 0usize;
    for (block, count) in table.duplicates() {
        let inodes = table
            .owners(block)
            .iter()
            .map(|ino| format!("{ino}"))
            .collect::<Vec<String>>()
            .join(", ");
        rep.push(Finding::err(
            "DUP.BLOCK",
            format!("Block {block} referenced {count} times (inodes: {inodes})"),
        ));
        found += 1;
    }

    if found == 0 {
        rep.push(Finding::info("DUP.OK", "No block claimed more than once"));
    } else {
        rep.push(Finding::warn(
            "DUP.MANUAL",
            format!("{found} cross-linked block(s) need manual resolution"),
        ));
    }
    Ok(table)
}
