// SPDX-License-Identifier: MIT

//! Pointer graph walker.
//!
//! Visits every non-zero pointer of an inode: the 12 direct pointers, then the
//! single, double and triple indirect trees, depth first in slot order. A
//! visitor decides for each pointer whether to follow it, skip it or null it.
//!
//! A block reached at several indirection levels is expanded once per level,
//! each time reading its slots as pointers of that level.

use vsio::prelude::*;

use crate::core::checker::ReachabilityTracker;
use crate::fs::vsfs::{
    constant::*,
    meta::VsfsMeta,
    types::{InodePointer, VsfsInode},
    utils,
};

/// What a pointer addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// A leaf data block.
    Data,
    /// A pointer block at `level` (1 = single indirect).
    Indirect { level: u8 },
}

/// Where a pointer is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOrigin {
    Inode(InodePointer),
    Indirect { container: u32, slot: usize },
}

impl core::fmt::Display for PointerOrigin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PointerOrigin::Inode(field) => write!(f, "{field}"),
            PointerOrigin::Indirect { container, slot } => {
                write!(f, "block {container} slot {slot}")
            }
        }
    }
}

/// One non-zero pointer as seen by a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerRef {
    pub inode: u32,
    pub inode_valid: bool,
    pub block: u32,
    pub kind: PointerKind,
    /// `block` lies inside the data region.
    pub in_range: bool,
    pub origin: PointerOrigin,
    /// The indirect block was already expanded at this level earlier in
    /// this inode's walk.
    pub revisit: bool,
}

/// A visitor's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Follow an indirect block. Same as `Skip` for data blocks.
    Descend,
    Skip,
    /// Null the slot holding the pointer.
    Clear,
}

/// Counters of one walk over the inode table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub inodes_walked: usize,
    pub pointers_visited: usize,
    pub pointers_cleared: usize,
    pub inode_blocks_written: usize,
    pub indirect_blocks_read: usize,
    pub indirect_blocks_written: usize,
}

pub struct PointerWalker<'a, IO: VsIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a VsfsMeta,
    /// Indirect blocks expanded during the current inode walk, by level - 1.
    expanded: [ReachabilityTracker; VSFS_MAX_INDIRECT_LEVEL as usize],
    summary: WalkSummary,
}

impl<'a, IO: VsIO + ?Sized> PointerWalker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a VsfsMeta) -> Self {
        Self {
            io,
            meta,
            expanded: core::array::from_fn(|_| {
                ReachabilityTracker::new(meta.first_data_block, meta.data_block_count())
            }),
            summary: WalkSummary::default(),
        }
    }

    pub fn summary(&self) -> WalkSummary {
        self.summary
    }

    /// Walks every inode of the table, or only the valid ones.
    ///
    /// An inode-table block is written back only if one of its inodes had a
    /// pointer cleared.
    pub fn walk_table<F>(&mut self, valid_only: bool, mut visit: F) -> VsIOResult<WalkSummary>
    where
        F: FnMut(&PointerRef) -> Step,
    {
        let meta = self.meta;
        let per_block = meta.inodes_per_block();

        for (index, block) in meta.inode_table().enumerate() {
            let mut table = utils::read_inode_block(self.io, meta, block)?;
            let mut dirty = false;

            for (slot, inode) in table.inodes.iter_mut().enumerate() {
                let ino = index as u32 * per_block + slot as u32;
                if ino >= meta.inode_count || (valid_only && !inode.is_valid()) {
                    continue;
                }
                dirty |= self.walk_inode(ino, inode, &mut visit)?;
            }

            if dirty {
                utils::write_inode_block(self.io, meta, block, &table)?;
                self.summary.inode_blocks_written += 1;
            }
        }

        Ok(self.summary)
    }

    /// Walks one inode's pointer graph.
    ///
    /// Cleared slots inside indirect blocks are persisted here; cleared inode
    /// fields are only applied to `inode`, and the return value tells the
    /// caller whether it must persist the inode.
    pub fn walk_inode<F>(&mut self, ino: u32, inode: &mut VsfsInode, visit: &mut F) -> VsIOResult<bool>
    where
        F: FnMut(&PointerRef) -> Step,
    {
        self.expanded.iter_mut().for_each(ReachabilityTracker::clear);
        self.summary.inodes_walked += 1;
        let inode_valid = inode.is_valid();
        let mut modified = false;

        for i in 0..VSFS_DIRECT_POINTERS {
            let field = InodePointer::Direct(i);
            let block = inode.pointer(field);
            if block == 0 {
                continue;
            }
            let r = PointerRef {
                inode: ino,
                inode_valid,
                block,
                kind: PointerKind::Data,
                in_range: self.meta.is_data_block(block),
                origin: PointerOrigin::Inode(field),
                revisit: false,
            };
            self.summary.pointers_visited += 1;
            if visit(&r) == Step::Clear {
                inode.set_pointer(field, 0);
                self.summary.pointers_cleared += 1;
                modified = true;
            }
        }

        for field in VsfsInode::INDIRECT_FIELDS {
            let block = inode.pointer(field);
            if block == 0 {
                continue;
            }
            let origin = PointerOrigin::Inode(field);
            if self.visit_indirect(ino, inode_valid, block, field.level(), origin, visit)? {
                inode.set_pointer(field, 0);
                self.summary.pointers_cleared += 1;
                modified = true;
            }
        }

        Ok(modified)
    }

    /// Offers an indirect pointer to the visitor and expands it if asked.
    ///
    /// Returns `true` if the visitor asked to clear the pointer itself.
    fn visit_indirect<F>(
        &mut self,
        ino: u32,
        inode_valid: bool,
        block: u32,
        level: u8,
        origin: PointerOrigin,
        visit: &mut F,
    ) -> VsIOResult<bool>
    where
        F: FnMut(&PointerRef) -> Step,
    {
        let in_range = self.meta.is_data_block(block);
        let expanded = usize::from(level - 1);
        let revisit = in_range && self.expanded[expanded].is_marked(block);
        let r = PointerRef {
            inode: ino,
            inode_valid,
            block,
            kind: PointerKind::Indirect { level },
            in_range,
            origin,
            revisit,
        };
        self.summary.pointers_visited += 1;

        match visit(&r) {
            Step::Clear => return Ok(true),
            Step::Skip => return Ok(false),
            Step::Descend => {}
        }
        // Never read outside the data region, never expand twice at one level.
        if !in_range || revisit {
            return Ok(false);
        }
        self.expanded[expanded].mark(block);

        let mut ib = utils::read_indirect(self.io, self.meta, block)?;
        self.summary.indirect_blocks_read += 1;
        let mut dirty = false;

        for slot in 0..VSFS_POINTERS_PER_BLOCK {
            let child = ib.slots[slot];
            if child == 0 {
                continue;
            }
            let origin = PointerOrigin::Indirect {
                container: block,
                slot,
            };
            let clear = if level == 1 {
                let r = PointerRef {
                    inode: ino,
                    inode_valid,
                    block: child,
                    kind: PointerKind::Data,
                    in_range: self.meta.is_data_block(child),
                    origin,
                    revisit: false,
                };
                self.summary.pointers_visited += 1;
                visit(&r) == Step::Clear
            } else {
                self.visit_indirect(ino, inode_valid, child, level - 1, origin, visit)?
            };

            if clear {
                ib.slots[slot] = 0;
                self.summary.pointers_cleared += 1;
                dirty = true;
            }
        }

        if dirty {
            utils::write_indirect(self.io, self.meta, block, &ib)?;
            self.summary.indirect_blocks_written += 1;
        }
        Ok(false)
    }
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;
    use crate::fs::vsfs::types::IndirectBlock;

    fn image() -> Vec<u8> {
        vec![0u8; VSFS_IMAGE_SIZE as usize]
    }

    fn put_indirect(io: &mut MemVsIO<'_>, meta: &VsfsMeta, block: u32, slots: &[(usize, u32)]) {
        let mut ib = IndirectBlock::default();
        for &(slot, value) in slots {
            ib.slots[slot] = value;
        }
        utils::write_indirect(io, meta, block, &ib).unwrap();
    }

    #[test]
    fn test_visits_all_levels_in_order() {
        let meta = VsfsMeta::new();
        let mut img = image();
        let mut io = MemVsIO::new(&mut img);

        // single 20 -> [21]; double 30 -> [31 -> [32]]; triple 40 -> [41 -> [42 -> [43]]]
        put_indirect(&mut io, &meta, 20, &[(0, 21)]);
        put_indirect(&mut io, &meta, 30, &[(5, 31)]);
        put_indirect(&mut io, &meta, 31, &[(1023, 32)]);
        put_indirect(&mut io, &meta, 40, &[(0, 41)]);
        put_indirect(&mut io, &meta, 41, &[(0, 42)]);
        put_indirect(&mut io, &meta, 42, &[(7, 43)]);

        let mut inode = VsfsInode {
            links: 1,
            single_indirect: 20,
            double_indirect: 30,
            triple_indirect: 40,
            ..VsfsInode::default()
        };
        inode.direct[3] = 9;

        let mut seen = Vec::new();
        let mut walker = PointerWalker::new(&mut io, &meta);
        let modified = walker
            .walk_inode(0, &mut inode, &mut |r: &PointerRef| {
                seen.push((r.block, r.kind));
                Step::Descend
            })
            .unwrap();

        assert!(!modified);
        let data = PointerKind::Data;
        let ind = |level| PointerKind::Indirect { level };
        assert_eq!(
            seen,
            vec![
                (9, data),
                (20, ind(1)),
                (21, data),
                (30, ind(2)),
                (31, ind(1)),
                (32, data),
                (40, ind(3)),
                (41, ind(2)),
                (42, ind(1)),
                (43, data),
            ]
        );
        assert_eq!(walker.summary().indirect_blocks_read, 6);
    }

    #[test]
    fn test_out_of_range_indirect_never_read() {
        let meta = VsfsMeta::new();
        let mut img = image();
        let mut io = MemVsIO::new(&mut img);

        let mut inode = VsfsInode {
            links: 1,
            single_indirect: 500,
            double_indirect: 2,
            ..VsfsInode::default()
        };

        let mut seen = Vec::new();
        let mut walker = PointerWalker::new(&mut io, &meta);
        walker
            .walk_inode(0, &mut inode, &mut |r: &PointerRef| {
                seen.push((r.block, r.in_range));
                Step::Descend
            })
            .unwrap();

        assert_eq!(seen, vec![(500, false), (2, false)]);
        assert_eq!(walker.summary().indirect_blocks_read, 0);
    }

    #[test]
    fn test_same_level_revisit_is_not_expanded() {
        let meta = VsfsMeta::new();
        let mut img = image();
        let mut io = MemVsIO::new(&mut img);

        // Double indirect block 50 names single indirect 51 twice
        put_indirect(&mut io, &meta, 50, &[(0, 51), (1, 51)]);
        put_indirect(&mut io, &meta, 51, &[(0, 52)]);

        let mut inode = VsfsInode {
            links: 1,
            double_indirect: 50,
            ..VsfsInode::default()
        };

        let mut seen = Vec::new();
        let mut walker = PointerWalker::new(&mut io, &meta);
        walker
            .walk_inode(0, &mut inode, &mut |r: &PointerRef| {
                seen.push((r.block, r.revisit));
                Step::Descend
            })
            .unwrap();

        assert_eq!(seen, vec![(50, false), (51, false), (52, false), (51, true)]);
        assert_eq!(walker.summary().indirect_blocks_read, 2);
    }

    #[test]
    fn test_block_is_expanded_once_per_level() {
        let meta = VsfsMeta::new();
        let mut img = image();
        let mut io = MemVsIO::new(&mut img);

        // 30 is both the single and the double indirect block
        put_indirect(&mut io, &meta, 30, &[(0, 31)]);
        put_indirect(&mut io, &meta, 31, &[(0, 9999), (1, 45)]);

        let mut inode = VsfsInode {
            links: 1,
            single_indirect: 30,
            double_indirect: 30,
            ..VsfsInode::default()
        };

        let mut seen = Vec::new();
        let mut walker = PointerWalker::new(&mut io, &meta);
        walker
            .walk_inode(0, &mut inode, &mut |r: &PointerRef| {
                seen.push((r.block, r.kind, r.revisit));
                Step::Descend
            })
            .unwrap();

        let data = PointerKind::Data;
        let ind = |level| PointerKind::Indirect { level };
        assert_eq!(
            seen,
            vec![
                (30, ind(1), false),
                (31, data, false),
                (30, ind(2), false),
                (31, ind(1), false),
                (9999, data, false),
                (45, data, false),
            ]
        );
        assert_eq!(walker.summary().indirect_blocks_read, 3);
    }

    #[test]
    fn test_clear_writes_only_the_container() {
        let meta = VsfsMeta::new();
        let mut img = image();
        {
            let mut io = MemVsIO::new(&mut img);
            put_indirect(&mut io, &meta, 20, &[(0, 21), (1, 99)]);
            put_indirect(&mut io, &meta, 22, &[(0, 23)]);
        }
        let mut io = MemVsIO::new(&mut img);

        let mut inode = VsfsInode {
            links: 1,
            single_indirect: 20,
            ..VsfsInode::default()
        };
        inode.direct[0] = 70;

        let mut walker = PointerWalker::new(&mut io, &meta);
        let modified = walker
            .walk_inode(0, &mut inode, &mut |r: &PointerRef| {
                if r.in_range { Step::Descend } else { Step::Clear }
            })
            .unwrap();

        assert!(modified, "direct[0] was cleared");
        assert_eq!(inode.direct[0], 0);
        assert_eq!(inode.single_indirect, 20);
        let s = walker.summary();
        assert_eq!(s.pointers_cleared, 2);
        assert_eq!(s.indirect_blocks_written, 1);

        let ib = utils::read_indirect(&mut io, &meta, 20).unwrap();
        assert_eq!(&ib.slots[..2], &[21, 0]);
    }
}
