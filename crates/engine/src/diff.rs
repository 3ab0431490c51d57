// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The diff tool: a black-box subprocess (`diffoscope` or plain `diff -ru`)
//! whose exit code is interpreted ternary-wise (`§4.7`, `§7`).

use crate::error::OrchestratorError;
use std::path::Path;
use tokio::process::Command;

/// The verdict for a single control/experiment artifact-tree comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Exit code 0: byte-identical.
    Identical,
    /// Exit code 1: differences found; carries the tool's combined output.
    Different { output: String },
}

/// Runs either `diffoscope` (default) or plain `diff -ru`, forwarding any
/// extra diffoscope arguments verbatim.
pub struct DiffTool {
    use_diffoscope: bool,
    diffoscope_args: Vec<String>,
}

impl DiffTool {
    pub fn new(use_diffoscope: bool, diffoscope_args: Vec<String>) -> Self {
        DiffTool { use_diffoscope, diffoscope_args }
    }

    pub async fn compare(&self, control: &Path, experiment: &Path) -> Result<DiffOutcome, OrchestratorError> {
        let mut cmd = if self.use_diffoscope {
            let mut cmd = Command::new("diffoscope");
            cmd.args(&self.diffoscope_args);
            cmd
        } else {
            let mut cmd = Command::new("diff");
            cmd.arg("-ru");
            cmd
        };
        cmd.arg(control).arg(experiment);

        let output = cmd.output().await.map_err(|e| OrchestratorError::Io(e.to_string()))?;
        match output.status.code() {
            Some(0) => Ok(DiffOutcome::Identical),
            Some(1) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                Ok(DiffOutcome::Different { output: combined })
            }
            Some(code) => Err(OrchestratorError::DiffError(code)),
            None => Err(OrchestratorError::DiffError(-1)),
        }
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
