// SPDX-License-Identifier: MIT

// === Geometry ===

pub const VSFS_BLOCK_SIZE: u32 = 4096;
pub const VSFS_TOTAL_BLOCKS: u32 = 64;

/// Exact size of a well-formed image.
pub const VSFS_IMAGE_SIZE: u64 = VSFS_BLOCK_SIZE as u64 * VSFS_TOTAL_BLOCKS as u64;

// === Fixed block locations ===

pub const VSFS_SUPERBLOCK_BLOCK: u32 = 0;
pub const VSFS_INODE_BITMAP_BLOCK: u32 = 1;
pub const VSFS_DATA_BITMAP_BLOCK: u32 = 2;
pub const VSFS_INODE_TABLE_START: u32 = 3;
pub const VSFS_INODE_TABLE_BLOCKS: u32 = 5;

// === Data region ===

pub const VSFS_FIRST_DATA_BLOCK: u32 = 8;
pub const VSFS_LAST_DATA_BLOCK: u32 = 63;
pub const VSFS_DATA_BLOCK_COUNT: usize =
    (VSFS_LAST_DATA_BLOCK - VSFS_FIRST_DATA_BLOCK + 1) as usize;

// === Inodes ===

pub const VSFS_INODE_SIZE: u32 = 256;
pub const VSFS_INODES_PER_BLOCK: u32 = VSFS_BLOCK_SIZE / VSFS_INODE_SIZE;
pub const VSFS_INODE_COUNT: u32 = VSFS_INODE_TABLE_BLOCKS * VSFS_INODES_PER_BLOCK;

pub const VSFS_DIRECT_POINTERS: usize = 12;
pub const VSFS_POINTERS_PER_BLOCK: usize = VSFS_BLOCK_SIZE as usize / 4;

/// Deepest indirection level (triple indirect).
pub const VSFS_MAX_INDIRECT_LEVEL: u8 = 3;

// === Superblock ===

pub const VSFS_MAGIC: u16 = 0xD34D;

const _: () = assert!(VSFS_INODE_COUNT == 80);
const _: () = assert!(VSFS_DATA_BLOCK_COUNT == 56);
const _: () = assert!(VSFS_INODE_TABLE_START + VSFS_INODE_TABLE_BLOCKS == VSFS_FIRST_DATA_BLOCK);
