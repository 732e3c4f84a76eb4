// SPDX-License-Identifier: MIT
//! VSFS inode and inode-table block

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::fs::vsfs::constant::*;

/// On-disk inode (256 bytes, 16 per block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VsfsInode {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
    pub atime: u32,
    pub ctime: u32,
    pub mtime: u32,
    /// Deletion time (0 if not deleted)
    pub dtime: u32,
    /// Hard link count
    pub links: u32,
    /// Allocated block count
    pub blocks: u32,
    pub direct: [u32; VSFS_DIRECT_POINTERS],
    pub single_indirect: u32,
    pub double_indirect: u32,
    pub triple_indirect: u32,
    pub reserved: [u8; 156],
}

const _: () = assert!(core::mem::size_of::<VsfsInode>() == VSFS_INODE_SIZE as usize);

impl Default for VsfsInode {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

/// A pointer field stored in the inode itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodePointer {
    Direct(usize),
    Single,
    Double,
    Triple,
}

impl InodePointer {
    /// Indirection level of the tree rooted at this field (0 for direct).
    pub fn level(self) -> u8 {
        match self {
            InodePointer::Direct(_) => 0,
            InodePointer::Single => 1,
            InodePointer::Double => 2,
            InodePointer::Triple => 3,
        }
    }
}

impl core::fmt::Display for InodePointer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InodePointer::Direct(i) => write!(f, "direct[{i}]"),
            InodePointer::Single => f.write_str("single indirect"),
            InodePointer::Double => f.write_str("double indirect"),
            InodePointer::Triple => f.write_str("triple indirect"),
        }
    }
}

impl VsfsInode {
    pub const INDIRECT_FIELDS: [InodePointer; 3] =
        [InodePointer::Single, InodePointer::Double, InodePointer::Triple];

    /// A live inode has at least one link and no deletion time.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.links > 0 && self.dtime == 0
    }

    pub fn pointer(&self, field: InodePointer) -> u32 {
        match field {
            InodePointer::Direct(i) => self.direct.get(i).copied().unwrap_or(0),
            InodePointer::Single => self.single_indirect,
            InodePointer::Double => self.double_indirect,
            InodePointer::Triple => self.triple_indirect,
        }
    }

    pub fn set_pointer(&mut self, field: InodePointer, block: u32) {
        match field {
            InodePointer::Direct(i) => {
                if let Some(slot) = self.direct.get_mut(i) {
                    *slot = block;
                }
            }
            InodePointer::Single => self.single_indirect = block,
            InodePointer::Double => self.double_indirect = block,
            InodePointer::Triple => self.triple_indirect = block,
        }
    }
}

/// One block of the inode table.
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct InodeTableBlock {
    pub inodes: [VsfsInode; VSFS_INODES_PER_BLOCK as usize],
}

const _: () = assert!(core::mem::size_of::<InodeTableBlock>() == VSFS_BLOCK_SIZE as usize);

impl Default for InodeTableBlock {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        let mut inode = VsfsInode::default();
        assert!(!inode.is_valid());

        inode.links = 1;
        assert!(inode.is_valid());

        inode.dtime = 1_700_000_000;
        assert!(!inode.is_valid(), "deleted inode is never valid");
    }

    #[test]
    fn test_pointer_fields_layout() {
        let mut inode = VsfsInode::default();
        inode.set_pointer(InodePointer::Direct(0), 8);
        inode.set_pointer(InodePointer::Direct(11), 19);
        inode.set_pointer(InodePointer::Triple, 63);
        inode.set_pointer(InodePointer::Direct(12), 99);

        let bytes = inode.as_bytes();
        assert_eq!(&bytes[40..44], &8u32.to_le_bytes());
        assert_eq!(&bytes[84..88], &19u32.to_le_bytes());
        assert_eq!(&bytes[96..100], &63u32.to_le_bytes());
        assert!(bytes[100..].iter().all(|&b| b == 0));
        assert_eq!(inode.pointer(InodePointer::Direct(12)), 0);
    }
}
