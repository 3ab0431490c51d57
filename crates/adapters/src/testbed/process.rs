// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A generic driver for external testbed backends (`§6.2`): spawns the
//! backend executable once and speaks a newline-delimited JSON
//! request/response protocol over its stdin/stdout.

use super::discovery::resolve_backend;
use super::{ExecKind, ExecOutput, TestbedAdapter, TestbedError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

#[derive(Serialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
enum Request<'a> {
    Open,
    Copydown { src_local: &'a Path, dst_testbed: &'a Path },
    Copyup { src_testbed: &'a Path, dst_local: &'a Path },
    Execute { argv: &'a [String], xenv: &'a [(String, String)], kind: &'a str },
    Stop,
}

#[derive(Deserialize)]
struct Response {
    ok: bool,
    message: Option<String>,
    scratch: Option<PathBuf>,
    exit_code: Option<i32>,
    stdout: Option<String>,
    stderr: Option<String>,
}

struct ProcessState {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Drives an external backend executable (resolved via [`super::discovery`])
/// by name, speaking the line protocol described in `§6.2`.
#[derive(Clone)]
pub struct ProcessTestbedAdapter {
    backend_name: String,
    virtual_server_args: Vec<String>,
    state: Arc<Mutex<Option<ProcessState>>>,
}

impl ProcessTestbedAdapter {
    pub fn new(backend_name: impl Into<String>, virtual_server_args: Vec<String>) -> Self {
        ProcessTestbedAdapter {
            backend_name: backend_name.into(),
            virtual_server_args,
            state: Arc::new(Mutex::new(None)),
        }
    }

    async fn request(&self, req: Request<'_>) -> Result<Response, TestbedError> {
        let line = serde_json::to_string(&req).map_err(|e| TestbedError::CommandFailed(e.to_string()))? + "\n";

        // Hold the child's stdin/stdout across the await by taking them out
        // of the mutex for the duration of this one round-trip; nothing
        // else touches this adapter's process concurrently because the
        // orchestrator drives it as a single-threaded coroutine (`§5`).
        let mut taken = {
            let mut guard = self.state.lock();
            guard.take().ok_or_else(|| TestbedError::CommandFailed("testbed process not started".to_string()))?
        };

        let result = async {
            taken.stdin.write_all(line.as_bytes()).await.map_err(|e| TestbedError::Io(e.to_string()))?;
            let mut response_line = String::new();
            taken.stdout.read_line(&mut response_line).await.map_err(|e| TestbedError::Io(e.to_string()))?;
            if response_line.is_empty() {
                return Err(TestbedError::CommandFailed("backend closed its stdout".to_string()));
            }
            serde_json::from_str::<Response>(&response_line).map_err(|e| TestbedError::CommandFailed(e.to_string()))
        }
        .await;

        *self.state.lock() = Some(taken);
        result
    }
}

#[async_trait]
impl TestbedAdapter for ProcessTestbedAdapter {
    async fn start(&self) -> Result<(), TestbedError> {
        let exe = resolve_backend(&self.backend_name).ok_or_else(|| TestbedError::BackendNotFound(self.backend_name.clone()))?;
        let mut child = Command::new(exe)
            .args(&self.virtual_server_args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| TestbedError::StartFailed(e.to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| TestbedError::StartFailed("no stdin pipe".to_string()))?;
        let stdout = BufReader::new(child.stdout.take().ok_or_else(|| TestbedError::StartFailed("no stdout pipe".to_string()))?);
        *self.state.lock() = Some(ProcessState { child, stdin, stdout });
        Ok(())
    }

    async fn open(&self) -> Result<PathBuf, TestbedError> {
        let resp = self.request(Request::Open).await?;
        if !resp.ok {
            return Err(TestbedError::CommandFailed(resp.message.unwrap_or_default()));
        }
        resp.scratch.ok_or_else(|| TestbedError::CommandFailed("open did not return a scratch path".to_string()))
    }

    async fn copydown(&self, src_local: &Path, dst_testbed: &Path) -> Result<(), TestbedError> {
        let resp = self.request(Request::Copydown { src_local, dst_testbed }).await?;
        require_ok(resp)
    }

    async fn copyup(&self, src_testbed: &Path, dst_local: &Path) -> Result<(), TestbedError> {
        let resp = self.request(Request::Copyup { src_testbed, dst_local }).await?;
        require_ok(resp)
    }

    async fn execute(&self, argv: &[String], xenv: &[(String, String)], kind: ExecKind) -> Result<ExecOutput, TestbedError> {
        let resp = self.request(Request::Execute { argv, xenv, kind: &kind.to_string() }).await?;
        if !resp.ok {
            return Err(TestbedError::CommandFailed(resp.message.unwrap_or_default()));
        }
        Ok(ExecOutput {
            exit_code: resp.exit_code.unwrap_or(-1),
            stdout: resp.stdout.unwrap_or_default(),
            stderr: resp.stderr.unwrap_or_default(),
        })
    }

    async fn stop(&self) -> Result<(), TestbedError> {
        let resp = self.request(Request::Stop).await;
        if let Some(mut taken) = self.state.lock().take() {
            let _ = taken.child.kill().await;
        }
        require_ok(resp?)
    }
}

fn require_ok(resp: Response) -> Result<(), TestbedError> {
    if resp.ok {
        Ok(())
    } else {
        Err(TestbedError::CommandFailed(resp.message.unwrap_or_default()))
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
