// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};
use core::cmp::Ordering;
use core::fmt;
use core::ops::Range;

use bitflags::bitflags;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    /// A correction written back to the image.
    Fixed,
    Warn,
    Error,
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        use Severity::*;
        fn rank(s: Severity) -> u8 {
            match s {
                Info => 0,
                Fixed => 1,
                Warn => 2,
                Error => 3,
            }
        }
        rank(*self).cmp(&rank(*other))
    }
}

#[derive(Clone, Debug)]
pub struct Finding {
    pub sev: Severity,
    pub code: &'static str,
    pub msg: String,
}
impl Finding {
    pub fn info(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Info,
            code,
            msg: msg.into(),
        }
    }
    pub fn fixed(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Fixed,
            code,
            msg: msg.into(),
        }
    }
    pub fn warn(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Warn,
            code,
            msg: msg.into(),
        }
    }
    pub fn err(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Error,
            code,
            msg: msg.into(),
        }
    }
}

/// Outcome of one pass: its defects, its repairs and the findings it pushed.
#[derive(Clone, Debug)]
pub struct PhaseSummary {
    pub phase: VerifyPhases,
    pub title: &'static str,
    pub defects: usize,
    pub repairs: usize,
    pub findings: Range<usize>,
}

impl PhaseSummary {
    pub fn is_clean(&self) -> bool {
        self.defects == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    pub findings: Vec<Finding>,
    pub phases: Vec<PhaseSummary>,
}

impl VerifyReport {
    pub fn has_error(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f.sev, Severity::Error))
    }

    pub fn ok(&self) -> bool {
        !self.has_error()
    }

    pub fn push(&mut self, f: Finding) {
        self.findings.push(f)
    }

    pub fn count(&self, s: Severity) -> usize {
        self.findings.iter().filter(|f| f.sev == s).count()
    }

    /// Number of findings with the given code.
    pub fn count_code(&self, code: &str) -> usize {
        self.findings.iter().filter(|f| f.code == code).count()
    }

    /// Total defects over all phases.
    pub fn defects(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Total corrections written over all phases.
    pub fn repairs(&self) -> usize {
        self.count(Severity::Fixed)
    }

    /// Closes the phase whose findings start at index `start`.
    pub fn close_phase(
        &mut self,
        phase: VerifyPhases,
        title: &'static str,
        start: usize,
    ) -> &PhaseSummary {
        let range = start..self.findings.len();
        let slice = &self.findings[range.clone()];
        let defects = slice.iter().filter(|f| f.sev == Severity::Error).count();
        let repairs = slice.iter().filter(|f| f.sev == Severity::Fixed).count();
        self.phases.push(PhaseSummary {
            phase,
            title,
            defects,
            repairs,
            findings: range,
        });
        &self.phases[self.phases.len() - 1]
    }

    /// Findings pushed while the given phase ran.
    pub fn phase_findings(&self, summary: &PhaseSummary) -> &[Finding] {
        &self.findings[summary.findings.clone()]
    }

    pub fn phase(&self, phase: VerifyPhases) -> Option<&PhaseSummary> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Display with options (filtering, prefix, summary...)
    pub fn display_with(&self, opts: ReportDisplayOpts) -> ReportDisplay<'_> {
        ReportDisplay::new(self, opts)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ReportDisplayOpts {
    pub min_level: Severity,
    pub prefix: &'static str,
    pub show_summary: bool,
    pub pad_code: usize,
}

impl Default for ReportDisplayOpts {
    fn default() -> Self {
        Self {
            min_level: Severity::Info,
            prefix: "",
            show_summary: false,
            pad_code: 12,
        }
    }
}

pub struct ReportDisplay<'a> {
    rep: &'a VerifyReport,
    opts: ReportDisplayOpts,
}

impl<'a> ReportDisplay<'a> {
    pub fn new(rep: &'a VerifyReport, opts: ReportDisplayOpts) -> Self {
        Self { rep, opts }
    }
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n_info = 0usize;
        let mut n_fixed = 0usize;
        let mut n_warn = 0usize;
        let mut n_err = 0usize;

        for it in &self.rep.findings {
            if it.sev < self.opts.min_level {
                continue;
            }
            let tag = match it.sev {
                Severity::Info => "INFO",
                Severity::Fixed => "FIX ",
                Severity::Warn => "WARN",
                Severity::Error => "ERR ",
            };
            match it.sev {
                Severity::Info => n_info += 1,
                Severity::Fixed => n_fixed += 1,
                Severity::Warn => n_warn += 1,
                Severity::Error => n_err += 1,
            }

            writeln!(
                f,
                "{}{tag}: {:<width$} {}",
                self.opts.prefix,
                it.code,
                it.msg,
                width = self.opts.pad_code
            )?;
        }

        if self.opts.show_summary {
            writeln!(
                f,
                "{}Summary: errors={}  fixed={}  warns={}  infos={}",
                self.opts.prefix, n_err, n_fixed, n_warn, n_info
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ReportDisplay::new(self, ReportDisplayOpts::default()).fmt(f)
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct VerifyPhases: u32 {
        const SUPERBLOCK   = 1 << 0;
        const INODE_BITMAP = 1 << 1;
        const DATA_BITMAP  = 1 << 2;
        const POINTERS     = 1 << 3;
        const DUPLICATES   = 1 << 4;
        const ALL = Self::SUPERBLOCK.bits()
            | Self::INODE_BITMAP.bits()
            | Self::DATA_BITMAP.bits()
            | Self::POINTERS.bits()
            | Self::DUPLICATES.bits();
    }
}

/// Generic options that the FS can encapsulate/extend.
pub trait VerifierOptionsLike {
    fn phases(&self) -> VerifyPhases {
        VerifyPhases::ALL
    }
    fn fail_fast(&self) -> bool {
        false
    }
    /// Whether phases may write corrections back to the image.
    fn repair(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_close_phase_counts_only_its_range() {
        let mut rep = VerifyReport::default();
        rep.push(Finding::err("A", "before"));

        let start = rep.findings.len();
        rep.push(Finding::err("B", "one"));
        rep.push(Finding::err("B", "two"));
        rep.push(Finding::fixed("B.FIXED", "done"));
        rep.push(Finding::info("B.OK", "note"));
        let s = rep.close_phase(VerifyPhases::INODE_BITMAP, "Inode bitmap", start);

        assert_eq!(s.defects, 2);
        assert_eq!(s.repairs, 1);
        assert_eq!(s.findings, 1..5);
        assert_eq!(rep.defects(), 3);
        assert_eq!(rep.count_code("B"), 2);
    }

    #[test]
    fn test_display_filters_by_level() {
        let mut rep = VerifyReport::default();
        rep.push(Finding::info("X.OK", "fine"));
        rep.push(Finding::warn("X.RANGE", "odd"));
        rep.push(Finding::err("X.BAD", "broken"));

        let text = rep
            .display_with(ReportDisplayOpts {
                min_level: Severity::Warn,
                show_summary: true,
                ..ReportDisplayOpts::default()
            })
            .to_string();

        assert!(!text.contains("fine"));
        assert!(text.contains("WARN: X.RANGE"));
        assert!(text.contains("ERR : X.BAD"));
        assert!(text.contains("errors=1  fixed=0  warns=1  infos=0"));
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(
            VerifyPhases::from_name("DATA_BITMAP"),
            Some(VerifyPhases::DATA_BITMAP)
        );
        assert!(VerifyPhases::ALL.contains(VerifyPhases::DUPLICATES));
        assert_eq!(VerifyPhases::ALL.iter().count(), 5);
    }
}
