// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool-presence preflight: which optional external tools the variation
//! transforms may shell out to (`disorderfs`, `unshare`, `linux32`/`linux64`,
//! `faketime`, `sudo`) are actually on `PATH`. Grounded in the same
//! directory-scan idiom as `reprotest_adapters::testbed::discovery`.

use std::collections::HashSet;

const PROBED_TOOLS: &[&str] = &["disorderfs", "unshare", "linux32", "linux64", "faketime", "sudo"];

pub fn discover_available_tools() -> HashSet<String> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return HashSet::new();
    };

    let mut found = HashSet::new();
    for dir in std::env::split_paths(&path_var) {
        for &tool in PROBED_TOOLS {
            if found.contains(tool) {
                continue;
            }
            if dir.join(tool).is_file() {
                found.insert(tool.to_string());
            }
        }
    }
    found
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
