// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend discovery: testbed backends are external executables on `PATH`
//! whose name begins with a fixed prefix (`§4.6`, "the registry of backends
//! is dynamic (discovered on disk)").

use std::path::PathBuf;

pub const BACKEND_PREFIX: &str = "reprotest-testbed-";

/// List every backend name found on `PATH`, stripped of [`BACKEND_PREFIX`].
pub fn discover_backends() -> Vec<String> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return Vec::new();
    };
    let mut found = Vec::new();
    for dir in std::env::split_paths(&path_var) {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(name) = file_name.strip_prefix(BACKEND_PREFIX) {
                if !found.contains(&name.to_string()) {
                    found.push(name.to_string());
                }
            }
        }
    }
    found
}

/// Resolve a backend name to its executable path on `PATH`, if present.
pub fn resolve_backend(name: &str) -> Option<PathBuf> {
    let exe = format!("{BACKEND_PREFIX}{name}");
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(&exe))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
