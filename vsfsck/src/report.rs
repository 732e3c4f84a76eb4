// SPDX-License-Identifier: MIT

use colored::*;
use vsfs::vsfs::{Finding, PhaseSummary, Severity, VerifyReport, VsfsCheckOptions};
use vsio::prelude::IoStats;

use crate::{log_info, log_normal, log_verbose};

const RULE: &str = "---------------------------------";

fn marker(sev: Severity) -> ColoredString {
    match sev {
        Severity::Info => "·".dimmed(),
        Severity::Fixed => "✓".green(),
        Severity::Warn => "!".yellow(),
        Severity::Error => "✗".red(),
    }
}

fn line(f: &Finding) -> String {
    let code = format!("[{}]", f.code);
    match f.sev {
        Severity::Info => format!("  {} {} {}", marker(f.sev), code.dimmed(), f.msg.dimmed()),
        Severity::Fixed => format!("  {} {} {}", marker(f.sev), code.green(), f.msg),
        Severity::Warn => format!("  {} {} {}", marker(f.sev), code.yellow(), f.msg),
        Severity::Error => format!("  {} {} {}", marker(f.sev), code.red(), f.msg.red()),
    }
}

fn verdict(p: &PhaseSummary) -> String {
    if p.defects == 0 {
        format!("{} validation successful. No errors found.", p.title)
    } else if p.repairs > 0 {
        format!("{} validation failed. {} error(s), fixed.", p.title, p.defects)
    } else {
        format!("{} validation failed. {} error(s).", p.title, p.defects)
    }
}

fn print_phase(rep: &VerifyReport, p: &PhaseSummary) {
    log_info!("{}", format!("Validating {}", p.title).bold());
    log_info!("{RULE}");
    for f in rep.phase_findings(p) {
        if f.sev == Severity::Info {
            log_verbose!("{}", line(f));
        } else {
            log_info!("{}", line(f));
        }
    }
    let verdict = verdict(p);
    if p.is_clean() {
        log_info!("{}", verdict.green());
    } else {
        log_info!("{}", verdict.red());
    }
    log_info!("{RULE}");
}

/// Prints every phase that ran, then the overall result.
pub fn print(rep: &VerifyReport, opt: &VsfsCheckOptions) {
    for p in &rep.phases {
        print_phase(rep, p);
    }

    let selected = opt.phases.bits().count_ones() as usize;
    if rep.phases.len() < selected {
        if let Some(last) = rep.phases.last() {
            log_info!(
                "{} Stopped after {} (fail-fast), {} phase(s) skipped",
                "!".yellow(),
                last.title,
                selected - rep.phases.len()
            );
        }
    }

    let defects = rep.defects();
    let repairs = rep.repairs();
    if defects == 0 {
        log_normal!("{}", "✓ Image is consistent.".green().bold());
    } else if repairs > 0 {
        log_normal!(
            "{} {} inconsistenc(ies) found, {} repair(s) written. Please rerun the checker to verify.",
            "✗".red().bold(),
            defects.to_string().yellow(),
            repairs
        );
    } else {
        log_normal!(
            "{} {} inconsistenc(ies) found, image left unchanged.",
            "✗".red().bold(),
            defects.to_string().yellow()
        );
    }
    let warns = rep.count(Severity::Warn);
    if warns > 0 {
        log_info!("{} {} warning(s)", "!".yellow(), warns);
    }
}

pub fn print_io_stats(stats: &IoStats) {
    log_verbose!(
        "I/O: {} read(s) / {} bytes, {} write(s) / {} bytes, {} flush(es), {} unaligned",
        stats.reads,
        stats.read_bytes,
        stats.writes,
        stats.write_bytes,
        stats.flushes,
        stats.unaligned_reads + stats.unaligned_writes
    );
}
