// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator-level errors (`§7`), with the exit-code mapping the CLI
//! surfaces directly.

use reprotest_adapters::TestbedError;
use reprotest_core::PlanError;
use reprotest_shell::SanitizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("usage error: {0}")]
    Usage(String),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
    #[error(transparent)]
    Testbed(#[from] TestbedError),
    #[error("build {name:?} failed: {message}")]
    BuildFailure { name: String, message: String },
    #[error("diff tool exited {0}, treated as fatal")]
    DiffError(i32),
    #[error("duplicate build name: {0}")]
    DuplicateName(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error(transparent)]
    Store(#[from] reprotest_storage::StoreError),
}

impl OrchestratorError {
    /// `§6.1`: `0` reproducible, `1` differences detected, `2` usage error,
    /// `125` harness error. This type never represents "reproducible" or
    /// "differences detected" (those are verdicts, not errors), so only `2`
    /// and `125` are reachable here.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::Usage(_) | OrchestratorError::Sanitize(_) | OrchestratorError::Plan(_) => 2,
            _ => 125,
        }
    }
}
