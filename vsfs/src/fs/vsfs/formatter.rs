// SPDX-License-Identifier: MIT

use vsio::prelude::*;

use crate::core::formatter::{FsFormatter, zero_data_region};
use crate::core::{FsFormatterError, FsFormatterResult};
use crate::fs::vsfs::{constant::*, meta::VsfsMeta, types::VsfsSuperblock, utils};

/// Lays down an empty, consistent VSFS image.
pub struct VsfsFormatter<'a, IO: VsIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a VsfsMeta,
}

impl<'a, IO: VsIO + ?Sized> FsFormatter for VsfsFormatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        crate::ensure!(
            *self.meta == VsfsMeta::new(),
            FsFormatterError::Invalid("VSFS only supports its canonical geometry")
        );

        utils::write_superblock(self.io, self.meta, &VsfsSuperblock::canonical())?;
        Self::write_bitmaps(self.io, self.meta)?;
        Self::write_inode_table(self.io, self.meta)?;
        if full_format {
            zero_data_region(self.io, self.meta)?;
        }

        self.io.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> FsFormatterResult {
        self.io.flush()?;
        Ok(())
    }
}

impl<'a, IO: VsIO + ?Sized> VsfsFormatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a VsfsMeta) -> Self {
        Self { io, meta }
    }

    fn write_bitmaps(io: &mut IO, meta: &VsfsMeta) -> FsFormatterResult {
        let empty = vec![0u8; meta.block_size()];
        utils::write_bitmap(io, meta, meta.inode_bitmap_block, &empty)?;
        utils::write_bitmap(io, meta, meta.data_bitmap_block, &empty)?;
        Ok(())
    }

    fn write_inode_table(io: &mut IO, meta: &VsfsMeta) -> FsFormatterResult {
        io.zero_fill(
            meta.block_offset(meta.inode_table_start),
            meta.inode_table_blocks as usize * VSFS_BLOCK_SIZE as usize,
        )?;
        Ok(())
    }
}
