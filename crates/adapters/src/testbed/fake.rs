// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake testbed adapter for testing the orchestrator without a real backend.

use super::{ExecKind, ExecOutput, TestbedAdapter, TestbedError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded testbed call.
#[derive(Debug, Clone)]
pub enum TestbedCall {
    Start,
    Open,
    Copydown { src_local: PathBuf, dst_testbed: PathBuf },
    Copyup { src_testbed: PathBuf, dst_local: PathBuf },
    Execute { argv: Vec<String>, xenv: Vec<(String, String)>, kind: ExecKind },
    Stop,
}

struct FakeState {
    calls: Vec<TestbedCall>,
    scratch: PathBuf,
    /// Queued responses for `execute`, consumed in order; once exhausted,
    /// further calls succeed with exit code 0 and empty output.
    exec_responses: Vec<Result<ExecOutput, TestbedError>>,
    copied_files: Vec<(PathBuf, PathBuf)>,
}

/// Fake testbed adapter for testing.
#[derive(Clone)]
pub struct FakeTestbedAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeTestbedAdapter {
    fn default() -> Self {
        FakeTestbedAdapter {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                scratch: PathBuf::from("/fake-scratch"),
                exec_responses: Vec::new(),
                copied_files: Vec::new(),
            })),
        }
    }
}

impl FakeTestbedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TestbedCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_scratch(&self, scratch: impl Into<PathBuf>) {
        self.inner.lock().scratch = scratch.into();
    }

    /// Queue the next `execute` call's result. Responses are consumed FIFO.
    pub fn push_exec_result(&self, result: Result<ExecOutput, TestbedError>) {
        self.inner.lock().exec_responses.push(result);
    }

    pub fn push_exec_success(&self, stdout: impl Into<String>) {
        self.push_exec_result(Ok(ExecOutput { exit_code: 0, stdout: stdout.into(), stderr: String::new() }));
    }
}

#[async_trait]
impl TestbedAdapter for FakeTestbedAdapter {
    async fn start(&self) -> Result<(), TestbedError> {
        self.inner.lock().calls.push(TestbedCall::Start);
        Ok(())
    }

    async fn open(&self) -> Result<PathBuf, TestbedError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TestbedCall::Open);
        Ok(inner.scratch.clone())
    }

    async fn copydown(&self, src_local: &Path, dst_testbed: &Path) -> Result<(), TestbedError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TestbedCall::Copydown { src_local: src_local.to_path_buf(), dst_testbed: dst_testbed.to_path_buf() });
        inner.copied_files.push((src_local.to_path_buf(), dst_testbed.to_path_buf()));
        Ok(())
    }

    async fn copyup(&self, src_testbed: &Path, dst_local: &Path) -> Result<(), TestbedError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TestbedCall::Copyup { src_testbed: src_testbed.to_path_buf(), dst_local: dst_local.to_path_buf() });
        inner.copied_files.push((src_testbed.to_path_buf(), dst_local.to_path_buf()));
        Ok(())
    }

    async fn execute(&self, argv: &[String], xenv: &[(String, String)], kind: ExecKind) -> Result<ExecOutput, TestbedError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TestbedCall::Execute { argv: argv.to_vec(), xenv: xenv.to_vec(), kind });
        if inner.exec_responses.is_empty() {
            Ok(ExecOutput::default())
        } else {
            inner.exec_responses.remove(0)
        }
    }

    async fn stop(&self) -> Result<(), TestbedError> {
        self.inner.lock().calls.push(TestbedCall::Stop);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
