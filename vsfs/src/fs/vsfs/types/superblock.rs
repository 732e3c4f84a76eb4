// SPDX-License-Identifier: MIT
//! VSFS superblock

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::core::errors::{FsParsingError, FsParsingResult};
use crate::fs::vsfs::constant::*;

/// On-disk superblock, block 0 (4096 bytes).
///
/// The two bytes after `magic` keep the following `u32` fields 4-byte aligned;
/// they are always written as zero.
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VsfsSuperblock {
    pub magic: u16,
    pub _pad: [u8; 2],
    pub block_size: u32,
    pub total_blocks: u32,
    pub inode_bitmap_block: u32,
    pub data_bitmap_block: u32,
    pub inode_table_start: u32,
    pub first_data_block: u32,
    pub inode_size: u32,
    pub inode_count: u32,
    pub reserved: [u8; 4060],
}

const _: () = assert!(core::mem::size_of::<VsfsSuperblock>() == VSFS_BLOCK_SIZE as usize);

impl Default for VsfsSuperblock {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

/// The nine checked superblock fields, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperblockField {
    Magic,
    BlockSize,
    TotalBlocks,
    InodeBitmapBlock,
    DataBitmapBlock,
    InodeTableStart,
    FirstDataBlock,
    InodeSize,
    InodeCount,
}

impl SuperblockField {
    pub const ALL: [SuperblockField; 9] = [
        SuperblockField::Magic,
        SuperblockField::BlockSize,
        SuperblockField::TotalBlocks,
        SuperblockField::InodeBitmapBlock,
        SuperblockField::DataBitmapBlock,
        SuperblockField::InodeTableStart,
        SuperblockField::FirstDataBlock,
        SuperblockField::InodeSize,
        SuperblockField::InodeCount,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SuperblockField::Magic => "SB.MAGIC",
            SuperblockField::BlockSize => "SB.BSIZE",
            SuperblockField::TotalBlocks => "SB.BLOCKS",
            SuperblockField::InodeBitmapBlock => "SB.IBMAP",
            SuperblockField::DataBitmapBlock => "SB.DBMAP",
            SuperblockField::InodeTableStart => "SB.ITABLE",
            SuperblockField::FirstDataBlock => "SB.FIRST",
            SuperblockField::InodeSize => "SB.ISIZE",
            SuperblockField::InodeCount => "SB.ICOUNT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SuperblockField::Magic => "magic number",
            SuperblockField::BlockSize => "block size",
            SuperblockField::TotalBlocks => "total number of blocks",
            SuperblockField::InodeBitmapBlock => "inode bitmap block number",
            SuperblockField::DataBitmapBlock => "data bitmap block number",
            SuperblockField::InodeTableStart => "inode table start block number",
            SuperblockField::FirstDataBlock => "first data block number",
            SuperblockField::InodeSize => "inode size",
            SuperblockField::InodeCount => "inode count",
        }
    }

    pub fn expected(self) -> u32 {
        match self {
            SuperblockField::Magic => VSFS_MAGIC as u32,
            SuperblockField::BlockSize => VSFS_BLOCK_SIZE,
            SuperblockField::TotalBlocks => VSFS_TOTAL_BLOCKS,
            SuperblockField::InodeBitmapBlock => VSFS_INODE_BITMAP_BLOCK,
            SuperblockField::DataBitmapBlock => VSFS_DATA_BITMAP_BLOCK,
            SuperblockField::InodeTableStart => VSFS_INODE_TABLE_START,
            SuperblockField::FirstDataBlock => VSFS_FIRST_DATA_BLOCK,
            SuperblockField::InodeSize => VSFS_INODE_SIZE,
            SuperblockField::InodeCount => VSFS_INODE_COUNT,
        }
    }
}

/// One superblock field that disagrees with the format constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperblockMismatch {
    pub field: SuperblockField,
    pub expected: u32,
    pub actual: u32,
}

impl VsfsSuperblock {
    /// The only valid superblock: every field canonical, padding and reserved zeroed.
    pub fn canonical() -> Self {
        Self {
            magic: VSFS_MAGIC,
            _pad: [0; 2],
            block_size: VSFS_BLOCK_SIZE,
            total_blocks: VSFS_TOTAL_BLOCKS,
            inode_bitmap_block: VSFS_INODE_BITMAP_BLOCK,
            data_bitmap_block: VSFS_DATA_BITMAP_BLOCK,
            inode_table_start: VSFS_INODE_TABLE_START,
            first_data_block: VSFS_FIRST_DATA_BLOCK,
            inode_size: VSFS_INODE_SIZE,
            inode_count: VSFS_INODE_COUNT,
            reserved: [0; 4060],
        }
    }

    /// Decodes a superblock from a raw block.
    pub fn parse(block: &[u8]) -> FsParsingResult<Self> {
        Self::read_from_bytes(block)
            .map_err(|_| FsParsingError::Invalid("superblock: buffer is not one block"))
    }

    pub fn field(&self, field: SuperblockField) -> u32 {
        match field {
            SuperblockField::Magic => self.magic as u32,
            SuperblockField::BlockSize => self.block_size,
            SuperblockField::TotalBlocks => self.total_blocks,
            SuperblockField::InodeBitmapBlock => self.inode_bitmap_block,
            SuperblockField::DataBitmapBlock => self.data_bitmap_block,
            SuperblockField::InodeTableStart => self.inode_table_start,
            SuperblockField::FirstDataBlock => self.first_data_block,
            SuperblockField::InodeSize => self.inode_size,
            SuperblockField::InodeCount => self.inode_count,
        }
    }

    /// Fields that disagree with the format constants, in on-disk order.
    pub fn mismatches(&self) -> impl Iterator<Item = SuperblockMismatch> + '_ {
        SuperblockField::ALL.into_iter().filter_map(|field| {
            let actual = self.field(field);
            let expected = field.expected();
            (actual != expected).then_some(SuperblockMismatch {
                field,
                expected,
                actual,
            })
        })
    }

    pub fn is_canonical(&self) -> bool {
        self.mismatches().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_offsets() {
        let sb = VsfsSuperblock::canonical();
        let bytes = sb.as_bytes();

        assert_eq!(&bytes[0..2], &VSFS_MAGIC.to_le_bytes());
        assert_eq!(&bytes[2..4], &[0, 0]);
        assert_eq!(&bytes[4..8], &VSFS_BLOCK_SIZE.to_le_bytes());
        assert_eq!(&bytes[8..12], &VSFS_TOTAL_BLOCKS.to_le_bytes());
        assert_eq!(&bytes[20..24], &VSFS_INODE_TABLE_START.to_le_bytes());
        assert_eq!(&bytes[32..36], &VSFS_INODE_COUNT.to_le_bytes());
        assert!(bytes[36..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_mismatches() {
        let mut sb = VsfsSuperblock::canonical();
        assert!(sb.is_canonical());

        sb.magic = 0x1234;
        sb.inode_count = 81;
        let found: [SuperblockMismatch; 2] = {
            let mut it = sb.mismatches();
            [it.next().unwrap(), it.next().unwrap()]
        };
        assert_eq!(found[0].field, SuperblockField::Magic);
        assert_eq!(found[0].expected, 0xD34D);
        assert_eq!(found[0].actual, 0x1234);
        assert_eq!(found[1].field, SuperblockField::InodeCount);
        assert_eq!(sb.mismatches().count(), 2);
    }

    #[test]
    fn test_parse_rejects_short_buffer() {
        assert!(VsfsSuperblock::parse(&[0u8; 100]).is_err());
        let sb = VsfsSuperblock::parse(VsfsSuperblock::canonical().as_bytes()).unwrap();
        assert!(sb.is_canonical());
    }
}
