// SPDX-License-Identifier: MIT

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::fs::vsfs::constant::*;

/// A pointer block: 1024 block numbers, 0 meaning unallocated.
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct IndirectBlock {
    pub slots: [u32; VSFS_POINTERS_PER_BLOCK],
}

const _: () = assert!(core::mem::size_of::<IndirectBlock>() == VSFS_BLOCK_SIZE as usize);

impl Default for IndirectBlock {
    fn default() -> Self {
        Self::new_zeroed()
    }
}
