// SPDX-License-Identifier: MIT

//! Block-level accessors for the VSFS metadata regions.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use vsio::prelude::*;

use crate::core::FsParsingResult;
use crate::fs::vsfs::{
    constant::*,
    meta::VsfsMeta,
    types::{IndirectBlock, InodeTableBlock, VsfsInode, VsfsSuperblock},
};

pub fn read_superblock<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
) -> FsParsingResult<VsfsSuperblock> {
    let mut buf = vec![0u8; meta.block_size()];
    io.read_block(VSFS_SUPERBLOCK_BLOCK, meta.block_size(), &mut buf)?;
    VsfsSuperblock::parse(&buf)
}

pub fn write_superblock<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    sb: &VsfsSuperblock,
) -> VsIOResult {
    io.write_struct(meta.block_offset(VSFS_SUPERBLOCK_BLOCK), sb)
}

/// Reads a whole bitmap block.
pub fn read_bitmap<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    block: u32,
) -> VsIOResult<Vec<u8>> {
    let mut buf = vec![0u8; meta.block_size()];
    io.read_block(block, meta.block_size(), &mut buf)?;
    Ok(buf)
}

pub fn write_bitmap<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    block: u32,
    bitmap: &[u8],
) -> VsIOResult {
    io.write_block(block, meta.block_size(), bitmap)
}

pub fn read_inode_block<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    block: u32,
) -> VsIOResult<InodeTableBlock> {
    io.read_struct(meta.block_offset(block))
}

pub fn write_inode_block<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    block: u32,
    table: &InodeTableBlock,
) -> VsIOResult {
    io.write_struct(meta.block_offset(block), table)
}

pub fn read_inode<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    ino: u32,
) -> VsIOResult<VsfsInode> {
    if ino >= meta.inode_count {
        return Err(VsIOError::Invalid("inode number out of range"));
    }
    let (block, slot) = meta.inode_location(ino);
    io.read_struct(meta.block_offset(block) + (slot as u64 * VSFS_INODE_SIZE as u64))
}

/// Writes a single inode in place, leaving its neighbours untouched.
pub fn write_inode<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    ino: u32,
    inode: &VsfsInode,
) -> VsIOResult {
    if ino >= meta.inode_count {
        return Err(VsIOError::Invalid("inode number out of range"));
    }
    let (block, slot) = meta.inode_location(ino);
    io.write_struct(
        meta.block_offset(block) + (slot as u64 * VSFS_INODE_SIZE as u64),
        inode,
    )
}

pub fn read_indirect<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    block: u32,
) -> VsIOResult<IndirectBlock> {
    io.read_struct(meta.block_offset(block))
}

pub fn write_indirect<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    block: u32,
    ib: &IndirectBlock,
) -> VsIOResult {
    io.write_struct(meta.block_offset(block), ib)
}
