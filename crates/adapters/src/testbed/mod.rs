// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Testbed driver facade (`§4.6`): a generic "virtual server" abstraction
//! over an external sandbox backend (null/chroot/schroot/container/VM). The
//! orchestrator depends only on the verbs defined here.

mod discovery;
pub mod null;
pub mod process;

pub use discovery::{discover_backends, resolve_backend, BACKEND_PREFIX};
pub use null::NullTestbedAdapter;
pub use process::ProcessTestbedAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTestbedAdapter, TestbedCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which log channel an `execute`/`bomb` call belongs to (`§4.6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecKind {
    /// A short, incidental command (tool-presence probe, mkdir, ...).
    Short,
    /// The actual build script.
    Build,
}

impl std::fmt::Display for ExecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExecKind::Short => "short",
            ExecKind::Build => "build",
        })
    }
}

/// The result of one `execute` call.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Errors raised by a testbed backend.
#[derive(Debug, Error, Clone)]
pub enum TestbedError {
    #[error("testbed backend not found: {0}")]
    BackendNotFound(String),
    #[error("failed to start testbed: {0}")]
    StartFailed(String),
    #[error("testbed command failed: {0}")]
    CommandFailed(String),
    #[error("{argv:?} exited {exit_code}: {stderr}")]
    NonZeroExit { argv: Vec<String>, exit_code: i32, stderr: String },
    #[error("{kind}: {message}")]
    Bomb { message: String, kind: ExecKind },
    #[error("I/O error: {0}")]
    Io(String),
}

/// Abstracts a "virtual server" testbed backend. Only the verbs used by the
/// orchestrator (`§4.6`) are exposed; everything else about a concrete
/// backend (chroot, schroot, container, VM) is opaque.
#[async_trait]
pub trait TestbedAdapter: Clone + Send + Sync + 'static {
    /// Provision resources (start the backend process, boot a container, ...).
    async fn start(&self) -> Result<(), TestbedError>;

    /// Make the testbed ready to accept commands; returns a scratch path
    /// inside the testbed that the orchestrator treats as its working root.
    async fn open(&self) -> Result<PathBuf, TestbedError>;

    /// Copy `src_local` into the testbed at `dst_testbed`. Both paths are
    /// expected to carry a trailing separator when they denote directories.
    async fn copydown(&self, src_local: &Path, dst_testbed: &Path) -> Result<(), TestbedError>;

    /// Copy `src_testbed` out of the testbed to `dst_local`.
    async fn copyup(&self, src_testbed: &Path, dst_local: &Path) -> Result<(), TestbedError>;

    /// Run `argv` inside the testbed with `xenv` overlaid on its ambient
    /// environment, logging to the channel named by `kind`.
    async fn execute(&self, argv: &[String], xenv: &[(String, String)], kind: ExecKind) -> Result<ExecOutput, TestbedError>;

    /// `execute`, but a non-zero exit becomes a fatal [`TestbedError`].
    async fn check_exec(&self, argv: &[String], xenv: &[(String, String)], kind: ExecKind) -> Result<ExecOutput, TestbedError> {
        let out = self.execute(argv, xenv, kind).await?;
        if out.exit_code != 0 {
            return Err(TestbedError::NonZeroExit {
                argv: argv.to_vec(),
                exit_code: out.exit_code,
                stderr: out.stderr,
            });
        }
        Ok(out)
    }

    /// Release all resources held by the testbed.
    async fn stop(&self) -> Result<(), TestbedError>;

    /// Raise a terminal error marked by `kind`, without running anything.
    fn bomb(&self, message: &str, kind: ExecKind) -> TestbedError {
        TestbedError::Bomb { message: message.to_string(), kind }
    }
}
