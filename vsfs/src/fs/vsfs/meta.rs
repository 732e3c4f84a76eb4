// SPDX-License-Identifier: MIT

use crate::{core::traits::FsMeta, fs::vsfs::constant::*};

/// Canonical VSFS geometry.
///
/// VSFS admits exactly one layout, so every pass addresses the image through
/// this model rather than through the (possibly corrupted) on-disk superblock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsfsMeta {
    pub block_size: u32,
    pub total_blocks: u32,
    pub inode_bitmap_block: u32,
    pub data_bitmap_block: u32,
    pub inode_table_start: u32,
    pub inode_table_blocks: u32,
    pub first_data_block: u32,
    pub last_data_block: u32,
    pub inode_count: u32,
}

impl Default for VsfsMeta {
    fn default() -> Self {
        Self::new()
    }
}

impl VsfsMeta {
    pub const fn new() -> Self {
        Self {
            block_size: VSFS_BLOCK_SIZE,
            total_blocks: VSFS_TOTAL_BLOCKS,
            inode_bitmap_block: VSFS_INODE_BITMAP_BLOCK,
            data_bitmap_block: VSFS_DATA_BITMAP_BLOCK,
            inode_table_start: VSFS_INODE_TABLE_START,
            inode_table_blocks: VSFS_INODE_TABLE_BLOCKS,
            first_data_block: VSFS_FIRST_DATA_BLOCK,
            last_data_block: VSFS_LAST_DATA_BLOCK,
            inode_count: VSFS_INODE_COUNT,
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size as usize
    }

    #[inline]
    pub fn block_offset(&self, block: u32) -> u64 {
        block as u64 * self.block_size as u64
    }

    #[inline]
    pub fn is_data_block(&self, block: u32) -> bool {
        self.is_valid_unit(block)
    }

    /// Number of data blocks, and of meaningful bits in the data bitmap.
    #[inline]
    pub fn data_block_count(&self) -> usize {
        (self.last_data_block - self.first_data_block + 1) as usize
    }

    #[inline]
    pub fn inodes_per_block(&self) -> u32 {
        self.block_size / VSFS_INODE_SIZE
    }

    /// Data-bitmap bit of a data block, `None` outside the data region.
    #[inline]
    pub fn data_bit(&self, block: u32) -> Option<usize> {
        self.is_data_block(block)
            .then(|| (block - self.first_data_block) as usize)
    }

    /// Data block addressed by a data-bitmap bit.
    #[inline]
    pub fn data_block(&self, bit: usize) -> u32 {
        self.first_data_block + bit as u32
    }

    /// Inode-table block holding inode `ino` and its slot in that block.
    #[inline]
    pub fn inode_location(&self, ino: u32) -> (u32, usize) {
        let per_block = self.inodes_per_block();
        (
            self.inode_table_start + ino / per_block,
            (ino % per_block) as usize,
        )
    }

    /// Inode-table blocks, in order.
    pub fn inode_table(&self) -> core::ops::Range<u32> {
        self.inode_table_start..self.inode_table_start + self.inode_table_blocks
    }
}

impl FsMeta<u32> for VsfsMeta {
    fn unit_size(&self) -> usize {
        self.block_size as usize
    }

    fn unit_offset(&self, unit: u32) -> u64 {
        self.block_offset(unit)
    }

    fn first_data_unit(&self) -> u32 {
        self.first_data_block
    }

    fn last_data_unit(&self) -> u32 {
        self.last_data_block
    }

    fn total_units(&self) -> usize {
        self.total_blocks as usize
    }

    fn size_bytes(&self) -> u64 {
        self.block_offset(self.total_blocks)
    }
}
