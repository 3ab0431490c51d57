// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BuildContext`: per-build scratch identity (`§3`). One instance lives for
//! the duration of a single copydown → build → copyup cycle; `testbed_*`
//! paths are owned by the testbed, `local_dist` by the orchestrator.

use crate::variation::Variations;
use std::path::{Path, PathBuf};

/// Per-build scratch identity. `variations` is shared across every build in
/// a run (the full schedule), not just the one this context names.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub testbed_root: PathBuf,
    pub local_dist_root: PathBuf,
    pub local_src: PathBuf,
    pub build_name: String,
    pub variations: Variations,
}

impl BuildContext {
    pub fn new(
        testbed_root: impl Into<PathBuf>,
        local_dist_root: impl Into<PathBuf>,
        local_src: impl Into<PathBuf>,
        build_name: impl Into<String>,
        variations: Variations,
    ) -> Self {
        BuildContext {
            testbed_root: testbed_root.into(),
            local_dist_root: local_dist_root.into(),
            local_src: local_src.into(),
            build_name: build_name.into(),
            variations,
        }
    }

    /// `testbed_root/build-<name>/`
    pub fn testbed_src(&self) -> PathBuf {
        self.testbed_root.join(format!("build-{}", self.build_name))
    }

    /// `testbed_root/artifacts-<name>/`
    pub fn testbed_dist(&self) -> PathBuf {
        self.testbed_root.join(format!("artifacts-{}", self.build_name))
    }

    /// `local_dist_root/<name>`
    pub fn local_dist(&self) -> PathBuf {
        self.local_dist_root.join(&self.build_name)
    }

    pub fn local_src(&self) -> &Path {
        &self.local_src
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
