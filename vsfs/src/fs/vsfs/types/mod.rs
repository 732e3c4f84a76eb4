// SPDX-License-Identifier: MIT

pub mod indirect;
pub mod inode;
pub mod superblock;

pub use indirect::IndirectBlock;
pub use inode::{InodePointer, InodeTableBlock, VsfsInode};
pub use superblock::{SuperblockField, SuperblockMismatch, VsfsSuperblock};
