// SPDX-License-Identifier: MIT
use crate::core::checker::*;
use crate::fs::vsfs::{
    meta::VsfsMeta,
    walker::{PointerKind, PointerRef, PointerWalker, Step},
};
use vsio::prelude::*;

/// Nulls every pointer outside the data region, at every indirection level.
///
/// With `repair` off the same traversal runs but every pointer is left in
/// place. Returns the number of out-of-range pointers found.
pub fn sanitize<IO: VsIO + ?Sized>(
    io: &mut IO,
    meta: &VsfsMeta,
    repair: bool,
    rep: &mut VerifyReport,
) -> FsCheckerResult<usize> {
    let (first, last) = (meta.first_data_block, meta.last_data_block);
    let mut defects = 0usize;

    let summary = {
        let mut walker = PointerWalker::new(io, meta);
        walker.walk_table(false, |r: &PointerRef| {
            if r.in_range {
                return Step::Descend;
            }
            defects += 1;
            let what = match r.kind {
                PointerKind::Data => "data",
                PointerKind::Indirect { level: 1 } => "single indirect",
                PointerKind::Indirect { level: 2 } => "double indirect",
                PointerKind::Indirect { .. } => "triple indirect",
            };
            rep.push(Finding::err(
                "PTR.RANGE",
                format!(
                    "Inode {}: {what} pointer {} in {} outside data range [{first}, {last}]",
                    r.inode, r.block, r.origin
                ),
            ));
            if repair { Step::Clear } else { Step::Skip }
        })?
    };

    if defects == 0 {
        rep.push(Finding::info(
            "PTR.OK",
            format!(
                "{} pointer(s) in {} inode(s) within data range",
                summary.pointers_visited, summary.inodes_walked
            ),
        ));
    } else if repair {
        io.flush()?;
        rep.push(Finding::fixed(
            "PTR.FIXED",
            format!(
                "Nulled {} pointer(s); rewrote {} inode-table block(s), {} indirect block(s)",
                summary.pointers_cleared,
                summary.inode_blocks_written,
                summary.indirect_blocks_written
            ),
        ));
    } else {
        rep.push(Finding::warn(
            "PTR.KEPT",
            format!("{defects} out-of-range pointer(s) left in place, repair disabled"),
        ));
    }

    Ok(defects)
}
