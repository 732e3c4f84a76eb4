// SPDX-License-Identifier: MIT

mod config;
mod report;
mod utils;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use vsfs::vsfs::*;

use crate::config::FsckConfig;
use crate::utils::{LogLevel, set_log_level};

#[derive(Parser)]
#[command(
    name = "vsfsck",
    version,
    about = "Check and repair a VSFS disk image",
    long_about = None
)]
struct Cli {
    /// Image to check
    image: PathBuf,

    /// Report only, open the image read-only
    #[arg(long)]
    no_repair: bool,

    /// Stop after the first phase that finds a defect
    #[arg(long)]
    fail_fast: bool,

    /// TOML file with repair, fail_fast, phases and log_level keys
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print passing checks and I/O statistics
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print the final result
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn options(&self) -> anyhow::Result<(VsfsCheckOptions, LogLevel)> {
        let mut opt = VsfsCheckOptions::default();
        let mut level = LogLevel::Normal;

        if let Some(path) = &self.config {
            let config = FsckConfig::from_file(path)?;
            config.apply(&mut opt)?;
            if let Some(l) = config.log_level {
                level = l;
            }
        }

        if self.no_repair {
            opt.repair = false;
        }
        if self.fail_fast {
            opt.fail_fast = true;
        }
        if self.verbose {
            level = LogLevel::Verbose;
        } else if self.quiet {
            level = LogLevel::Quiet;
        }
        Ok((opt, level))
    }
}

fn usage() {
    let bin = std::env::args().next().unwrap_or_else(|| "vsfsck".into());
    println!("Incorrect Usage.\nCorrect Format = {bin} <FILE.img>");
}

fn check_image(path: &Path, opt: &VsfsCheckOptions) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(opt.repair)
        .open(path)
        .with_context(|| format!("cannot open image {}", path.display()))?;

    let len = file
        .metadata()
        .with_context(|| format!("cannot stat image {}", path.display()))?
        .len();
    if len < VSFS_IMAGE_SIZE {
        anyhow::bail!(
            "image {} is {len} bytes, a VSFS image needs at least {VSFS_IMAGE_SIZE}",
            path.display()
        );
    }

    crate::log_info!(
        "Checking {} ({}){}",
        path.display(),
        if opt.repair { "repair" } else { "read-only" },
        if opt.fail_fast { ", fail-fast" } else { "" }
    );

    let meta = VsfsMeta::new();
    let mut std_io = StdVsIO::new(&mut file);
    let mut io = IOCounter::with_align(&mut std_io, VSFS_BLOCK_SIZE as u64);

    let rep = VsfsChecker::new(&mut io, &meta)
        .check_with(opt)
        .with_context(|| format!("check of {} aborted", path.display()))?;

    report::print(&rep, opt);
    report::print_io_stats(&io.snapshot());
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(_) => {
            usage();
            return Ok(ExitCode::FAILURE);
        }
    };

    let (opt, level) = cli.options()?;
    set_log_level(level);

    check_image(&cli.image, &opt)?;
    Ok(ExitCode::SUCCESS)
}
