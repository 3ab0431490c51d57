// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level CLI error, aggregating every lower-layer error kind and mapping
//! each to the exit code `§6.1` specifies.

use reprotest_engine::OrchestratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReprotestError {
    #[error("usage error: {0}")]
    Usage(String),
    #[error("failed to read config file {path}: {source}")]
    ConfigRead { path: String, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse { path: String, source: toml::de::Error },
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

impl ReprotestError {
    /// `0` reproducible, `1` differences detected, `2` usage error, `125`
    /// harness error (`§6.1`). This type never represents a verdict, so the
    /// caller decides `0`/`1` separately; only `2`/`125` originate here.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReprotestError::Usage(_) | ReprotestError::ConfigRead { .. } | ReprotestError::ConfigParse { .. } => 2,
            ReprotestError::Orchestrator(e) => e.exit_code(),
        }
    }
}
