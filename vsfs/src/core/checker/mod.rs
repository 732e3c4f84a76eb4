// SPDX-License-Identifier: MIT

mod tracker;
mod types;

pub use tracker::ReachabilityTracker;
pub use types::{
    Finding, PhaseSummary, ReportDisplay, ReportDisplayOpts, Severity, VerifierOptionsLike,
    VerifyPhases, VerifyReport,
};

pub use crate::core::errors::{FsCheckerError, FsCheckerResult};

/// Trait for verifying (and optionally repairing) the integrity of a filesystem.
///
/// Phases run in a fixed order; each one pushes its findings into the report
/// and is closed with a [`PhaseSummary`]. With `fail_fast`, the run stops after
/// the first phase that reported a defect.
pub trait FsChecker {
    type Options: VerifierOptionsLike + Default;

    fn check_with(&mut self, opt: &Self::Options) -> FsCheckerResult<VerifyReport> {
        let mut rep = VerifyReport::default();
        let _completed = self.run_phase(
            opt,
            &mut rep,
            VerifyPhases::SUPERBLOCK,
            "Superblock",
            Self::check_superblock,
        )? && self.run_phase(
            opt,
            &mut rep,
            VerifyPhases::INODE_BITMAP,
            "Inode bitmap",
            Self::check_inode_bitmap,
        )? && self.run_phase(
            opt,
            &mut rep,
            VerifyPhases::DATA_BITMAP,
            "Data bitmap",
            Self::check_data_bitmap,
        )? && self.run_phase(
            opt,
            &mut rep,
            VerifyPhases::POINTERS,
            "Block pointers",
            Self::check_pointers,
        )? && self.run_phase(
            opt,
            &mut rep,
            VerifyPhases::DUPLICATES,
            "Duplicate blocks",
            Self::check_duplicates,
        )?;
        Ok(rep)
    }

    fn check_all(&mut self) -> FsCheckerResult<VerifyReport> {
        self.check_with(&Self::Options::default())
    }

    fn check_superblock(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_inode_bitmap(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_data_bitmap(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_pointers(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_duplicates(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }

    /// Runs `f` if `phase` is selected and closes its summary.
    ///
    /// Returns `false` when the run must stop here.
    fn run_phase<F>(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
        phase: VerifyPhases,
        title: &'static str,
        f: F,
    ) -> FsCheckerResult<bool>
    where
        F: Fn(&mut Self, &Self::Options, &mut VerifyReport) -> FsCheckerResult<()>,
    {
        if !opt.phases().contains(phase) {
            return Ok(true);
        }
        let start = rep.findings.len();
        f(self, opt, rep)?;
        let summary = rep.close_phase(phase, title, start);
        Ok(!(opt.fail_fast() && summary.defects > 0))
    }
}
