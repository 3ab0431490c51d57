// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `--config-file` (`§6.1`): a TOML file mirroring the CLI's long options,
//! loaded underneath whatever the CLI flags already set. Flags left at
//! their clap default are treated as unset and backfilled from the file;
//! an explicitly-passed flag always wins.

use crate::args::Cli;
use crate::error::ReprotestError;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub source_root: Option<String>,
    pub build_command: Option<String>,
    pub artifact_pattern: Option<String>,
    pub source_pattern: Option<String>,
    pub store_dir: Option<String>,
    pub variations: Option<String>,
    pub vary: Option<Vec<String>>,
    pub host_distro: Option<String>,
    pub no_diffoscope: Option<bool>,
    pub diffoscope_arg: Option<Vec<String>>,
    pub testbed_pre: Option<String>,
    pub testbed_init: Option<String>,
    pub no_clean_on_error: Option<bool>,
    pub verbosity: Option<u8>,
}

pub fn load(path: &str) -> Result<FileConfig, ReprotestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReprotestError::ConfigRead { path: path.to_string(), source })?;
    toml::from_str(&content).map_err(|source| ReprotestError::ConfigParse { path: path.to_string(), source })
}

/// Backfill `cli`'s still-at-default fields from `config`. CLI flags that
/// differ from their clap default are never overwritten.
pub fn merge(cli: &mut Cli, config: &FileConfig) {
    if cli.source_root_flag.is_none() {
        cli.source_root_flag = config.source_root.clone();
    }
    if cli.build_command_flag.is_none() {
        cli.build_command_flag = config.build_command.clone();
    }
    if cli.artifact_pattern.is_none() {
        cli.artifact_pattern = config.artifact_pattern.clone();
    }
    if cli.source_pattern.is_none() {
        cli.source_pattern = config.source_pattern.clone();
    }
    if cli.store_dir.is_none() {
        cli.store_dir = config.store_dir.clone();
    }
    if cli.variations == "+all" {
        if let Some(v) = &config.variations {
            cli.variations = v.clone();
        }
    }
    if cli.vary.is_empty() {
        if let Some(v) = &config.vary {
            cli.vary = v.clone();
        }
    }
    if cli.host_distro == "debian" {
        if let Some(v) = &config.host_distro {
            cli.host_distro = v.clone();
        }
    }
    if !cli.no_diffoscope {
        if let Some(v) = config.no_diffoscope {
            cli.no_diffoscope = v;
        }
    }
    if cli.diffoscope_arg.is_empty() {
        if let Some(v) = &config.diffoscope_arg {
            cli.diffoscope_arg = v.clone();
        }
    }
    if cli.testbed_pre.is_none() {
        cli.testbed_pre = config.testbed_pre.clone();
    }
    if cli.testbed_init.is_none() {
        cli.testbed_init = config.testbed_init.clone();
    }
    if !cli.no_clean_on_error {
        if let Some(v) = config.no_clean_on_error {
            cli.no_clean_on_error = v;
        }
    }
    if cli.verbosity == 0 {
        if let Some(v) = config.verbosity {
            cli.verbosity = v;
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
