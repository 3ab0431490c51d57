// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clap-derive CLI surface (`§6.1`).

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "reprotest",
    version,
    about = "Build a source tree twice, varying the build environment, and diff the results"
)]
pub struct Cli {
    /// Either `source_root` or `build_command`, disambiguated by filesystem
    /// existence and the literal `auto` (`§6.1`).
    pub source_root_or_build_command: Option<String>,
    pub artifact_pattern: Option<String>,
    /// Extra args after `--`, forwarded to the testbed backend.
    #[arg(last = true)]
    pub virtual_server_args: Vec<String>,

    #[arg(short = 'f', long = "config-file")]
    pub config_file: Option<String>,

    #[arg(long = "verbosity", default_value_t = 0)]
    pub verbosity: u8,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long = "host-distro", default_value = "debian")]
    pub host_distro: String,

    #[arg(short = 's', long = "source-root")]
    pub source_root_flag: Option<String>,
    #[arg(long = "source-pattern")]
    pub source_pattern: Option<String>,
    #[arg(short = 'c', long = "build-command")]
    pub build_command_flag: Option<String>,
    #[arg(long = "store-dir")]
    pub store_dir: Option<String>,

    #[arg(long = "variations", default_value = "+all")]
    pub variations: String,
    #[arg(long = "vary")]
    pub vary: Vec<String>,
    /// Deprecated sugar for `--vary=-<name>`.
    #[arg(long = "dont-vary")]
    pub dont_vary: Vec<String>,

    #[arg(long = "extra-build")]
    pub extra_build: Vec<String>,
    #[arg(long = "auto-build")]
    pub auto_build: bool,

    #[arg(long = "diffoscope-arg")]
    pub diffoscope_arg: Vec<String>,
    #[arg(long = "no-diffoscope")]
    pub no_diffoscope: bool,

    #[arg(long = "testbed-pre", value_name = "COMMANDS")]
    pub testbed_pre: Option<String>,
    #[arg(long = "testbed-init", value_name = "COMMANDS")]
    pub testbed_init: Option<String>,

    #[arg(long = "no-clean-on-error")]
    pub no_clean_on_error: bool,
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// The positional `source_root`/`build_command` pair, disambiguated per the
/// upstream CLI's resolution rules: a literal `auto` or an existing path is
/// a `source_root`, anything else (with `-c`/`-s` present to disambiguate, or
/// by elimination) is a `build_command`.
pub struct ResolvedPositionals {
    pub source_root: String,
    pub build_command: String,
    pub artifact_pattern: Option<String>,
}

pub fn resolve_positionals(cli: &Cli) -> ResolvedPositionals {
    let mut build_command = cli.build_command_flag.clone();
    let mut source_root = cli.source_root_flag.clone();
    let mut artifact_pattern = cli.artifact_pattern.clone();

    if let Some(first) = &cli.source_root_or_build_command {
        match (cli.build_command_flag.is_some(), cli.source_root_flag.is_some()) {
            (true, true) => {
                tracing::warn!(%first, "positional argument ignored: both -c and -s given");
            }
            (true, false) => source_root = Some(first.clone()),
            (false, true) => build_command = Some(first.clone()),
            (false, false) => {
                if first == "auto" || std::path::Path::new(first).exists() {
                    source_root = Some(first.clone());
                } else {
                    build_command = Some(first.clone());
                }
            }
        }
    }

    let build_command = build_command.unwrap_or_else(|| "auto".to_string());
    let source_root = source_root.unwrap_or_else(|| ".".to_string());
    if artifact_pattern.is_none() {
        artifact_pattern = None;
    }

    ResolvedPositionals { source_root, build_command, artifact_pattern }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
