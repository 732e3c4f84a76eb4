// SPDX-License-Identifier: MIT
use crate::core::checker::*;
use crate::core::errors::FsRepairResult;
use crate::fs::vsfs::{
    meta::VsfsMeta,
    types::{SuperblockField, VsfsSuperblock},
    utils,
};
use vsio::prelude::*;

/// Compares the nine superblock fields with the format constants.
///
/// Returns the number of mismatching fields.
pub fn check<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<usize> {
    let sb = utils::read_superblock(io, meta)?;

    let mut defects = 0;
    for m in sb.mismatches() {
        let msg = if m.field == SuperblockField::Magic {
            format!(
                "Invalid {}. Expected {:#06X}, got {:#06X}",
                m.field.label(),
                m.expected,
                m.actual
            )
        } else {
            format!(
                "Invalid {}. Expected {}, got {}",
                m.field.label(),
                m.expected,
                m.actual
            )
        };
        rep.push(Finding::err(m.field.code(), msg));
        defects += 1;
    }

    if defects == 0 {
        rep.push(Finding::info("SB.OK", "Superblock matches the format constants"));
    }
    Ok(defects)
}

/// Overwrites block 0 with the canonical superblock.
pub fn repair<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    rep: &mut VerifyReport,
) -> FsRepairResult {
    utils::write_superblock(io, meta, &VsfsSuperblock::canonical())?;
    io.flush()?;
    rep.push(Finding::fixed(
        "SB.FIXED",
        "Superblock rewritten with canonical values",
    ));
    Ok(())
}
