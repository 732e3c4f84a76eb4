// SPDX-License-Identifier: MIT

use core::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use vsfs::vsfs::{VerifyPhases, VsfsCheckOptions};

use crate::utils::LogLevel;

/// Optional `--config` file. Unset keys keep the defaults.
///
/// ```toml
/// repair = false
/// fail_fast = true
/// phases = ["superblock", "data-bitmap"]
/// log_level = "verbose"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsckConfig {
    pub repair: Option<bool>,
    pub fail_fast: Option<bool>,
    pub phases: Option<Vec<String>>,
    pub log_level: Option<LogLevel>,
}

#[derive(Debug)]
pub enum ConfigError {
    UnknownPhase(String),
    NoPhases,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownPhase(name) => write!(
                f,
                "unknown phase '{name}' (expected superblock, inode_bitmap, data_bitmap, pointers, duplicates or all)"
            ),
            ConfigError::NoPhases => write!(f, "phase list is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl FsckConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: FsckConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.selected_phases()?;
        Ok(config)
    }

    /// Parses the phase list; names are case-insensitive, `-` and `_` are equivalent.
    pub fn selected_phases(&self) -> Result<Option<VerifyPhases>, ConfigError> {
        let Some(names) = &self.phases else {
            return Ok(None);
        };
        if names.is_empty() {
            return Err(ConfigError::NoPhases);
        }
        names
            .iter()
            .try_fold(VerifyPhases::empty(), |acc, name| {
                let flag = name.trim().to_ascii_uppercase().replace('-', "_");
                VerifyPhases::from_name(&flag)
                    .map(|p| acc | p)
                    .ok_or_else(|| ConfigError::UnknownPhase(name.clone()))
            })
            .map(Some)
    }

    /// Overlays the keys set in this file onto `opt`.
    pub fn apply(&self, opt: &mut VsfsCheckOptions) -> Result<(), ConfigError> {
        if let Some(repair) = self.repair {
            opt.repair = repair;
        }
        if let Some(fail_fast) = self.fail_fast {
            opt.fail_fast = fail_fast;
        }
        if let Some(phases) = self.selected_phases()? {
            opt.phases = phases;
        }
        Ok(())
    }
}
