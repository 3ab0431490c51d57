// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The null testbed backend: runs everything directly on the local
//! filesystem with no isolation. Used for dry runs and tests where sandbox
//! fidelity doesn't matter.

use super::{ExecKind, ExecOutput, TestbedAdapter, TestbedError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

const EXECUTE_TIMEOUT: Duration = Duration::from_secs(3600);

/// A testbed backend that does no sandboxing at all: `open` allocates a
/// plain temp directory, `copydown`/`copyup` are recursive filesystem
/// copies, and `execute` runs the given argv as a local subprocess.
#[derive(Clone)]
pub struct NullTestbedAdapter {
    scratch: Arc<Mutex<Option<PathBuf>>>,
}

impl Default for NullTestbedAdapter {
    fn default() -> Self {
        NullTestbedAdapter { scratch: Arc::new(Mutex::new(None)) }
    }
}

impl NullTestbedAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TestbedAdapter for NullTestbedAdapter {
    async fn start(&self) -> Result<(), TestbedError> {
        Ok(())
    }

    async fn open(&self) -> Result<PathBuf, TestbedError> {
        let dir = std::env::temp_dir().join(format!("reprotest-null-{}", std::process::id()));
        std::fs::create_dir_all(&dir).map_err(|e| TestbedError::Io(e.to_string()))?;
        *self.scratch.lock() = Some(dir.clone());
        Ok(dir)
    }

    async fn copydown(&self, src_local: &Path, dst_testbed: &Path) -> Result<(), TestbedError> {
        copy_tree(src_local, dst_testbed).map_err(|e| TestbedError::Io(e.to_string()))
    }

    async fn copyup(&self, src_testbed: &Path, dst_local: &Path) -> Result<(), TestbedError> {
        copy_tree(src_testbed, dst_local).map_err(|e| TestbedError::Io(e.to_string()))
    }

    async fn execute(&self, argv: &[String], xenv: &[(String, String)], _kind: ExecKind) -> Result<ExecOutput, TestbedError> {
        let [program, args @ ..] = argv else {
            return Err(TestbedError::CommandFailed("empty argv".to_string()));
        };
        let mut cmd = Command::new(program);
        cmd.args(args);
        for (name, value) in xenv {
            cmd.env(name, value);
        }
        let output = match tokio::time::timeout(EXECUTE_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(io_err)) => return Err(TestbedError::CommandFailed(io_err.to_string())),
            Err(_elapsed) => return Err(TestbedError::CommandFailed(format!("{} timed out after {}s", program, EXECUTE_TIMEOUT.as_secs()))),
        };
        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn stop(&self) -> Result<(), TestbedError> {
        if let Some(dir) = self.scratch.lock().take() {
            std::fs::remove_dir_all(&dir).map_err(|e| TestbedError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

/// Recursive copy preserving directory structure. `dst` is created if
/// missing; existing files at the destination are overwritten.
fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        std::fs::create_dir_all(dst)?;
        for entry in std::fs::read_dir(src)? {
            let entry = entry?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else if src.is_file() {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(src, dst)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "null_tests.rs"]
mod tests;
