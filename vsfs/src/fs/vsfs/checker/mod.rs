// SPDX-License-Identifier: MIT

pub use crate::core::checker::*;
use crate::fs::vsfs::meta::VsfsMeta;
use vsio::prelude::*;

mod data_bitmap;
mod duplicates;
mod inode_bitmap;
mod pointers;
mod superblock;

pub use data_bitmap::{DataBitmapReconciliation, ReferenceTable, build_references};
pub use duplicates::{DuplicateTable, count_references};
pub use inode_bitmap::InodeBitmapReconciliation;

#[derive(Clone, Debug)]
pub struct VsfsCheckOptions {
    pub phases: VerifyPhases,
    /// Write corrections back to the image
    pub repair: bool,
    /// Stop after the first phase that reported a defect
    pub fail_fast: bool,
}

impl Default for VsfsCheckOptions {
    fn default() -> Self {
        Self {
            phases: VerifyPhases::ALL,
            repair: true,
            fail_fast: false,
        }
    }
}

impl VsfsCheckOptions {
    /// Same phases, nothing written.
    pub fn read_only() -> Self {
        Self {
            repair: false,
            ..Self::default()
        }
    }
}

impl VerifierOptionsLike for VsfsCheckOptions {
    fn phases(&self) -> VerifyPhases {
        self.phases
    }
    fn fail_fast(&self) -> bool {
        self.fail_fast
    }
    fn repair(&self) -> bool {
        self.repair
    }
}

/// Runs the five VSFS passes over one device handle.
///
/// Every pass derives its state from the image itself, so a repair made by
/// an earlier pass is always visible to the later ones.
pub struct VsfsChecker<'a, IO: VsIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a VsfsMeta,
}

impl<'a, IO: VsIO + ?Sized> VsfsChecker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a VsfsMeta) -> Self {
        Self { io, meta }
    }
}

impl<'a, IO: VsIO + ?Sized> FsChecker for VsfsChecker<'a, IO> {
    type Options = VsfsCheckOptions;

    fn check_superblock(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let defects = superblock::check(self.io, self.meta, rep)?;
        if defects > 0 && opt.repair() {
            superblock::repair(self.io, self.meta, rep)?;
        }
        Ok(())
    }

    fn check_inode_bitmap(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let rec = inode_bitmap::check(self.io, self.meta, rep)?;
        if rec.defects() > 0 && opt.repair() {
            inode_bitmap::repair(self.io, self.meta, rec, rep)?;
        }
        Ok(())
    }

    fn check_data_bitmap(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let rec = data_bitmap::check(self.io, self.meta, rep)?;
        if rec.defects() > 0 && opt.repair() {
            data_bitmap::repair(self.io, self.meta, rec, rep)?;
        }
        Ok(())
    }

    fn check_pointers(&mut self, opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        pointers::sanitize(self.io, self.meta, opt.repair(), rep)?;
        Ok(())
    }

    fn check_duplicates(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        duplicates::check(self.io, self.meta, rep)?;
        Ok(())
    }
}
