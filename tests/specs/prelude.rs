//! Test helpers for black-box end-to-end specifications.
//!
//! Drives the `reprotest` binary through a fluent CLI DSL against toy
//! fixture source trees, exercising the null testbed backend (no sandboxing
//! required) end to end.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself.
    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where reprotest is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn reprotest_binary() -> PathBuf {
    binary_path("reprotest")
}

/// Returns a Command configured to run the reprotest binary.
pub fn reprotest_cmd() -> Command {
    Command::new(reprotest_binary())
}

/// Create a CLI builder for reprotest commands.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new(), dir: None }
    }

    /// Add CLI arguments.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory.
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Build the command without running it.
    pub fn command(self) -> Command {
        let mut cmd = reprotest_cmd();
        cmd.args(&self.args);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run and expect success (exit code 0).
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code).
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    /// Get stdout as string.
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string.
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Get the process exit code, or panic if the process was signaled.
    pub fn code(&self) -> i32 {
        self.output.status.code().expect("process should exit normally, not via signal")
    }

    /// Assert the exact exit code.
    pub fn exit_code(self, expected: i32) -> Self {
        assert_eq!(
            self.output.status.code(),
            Some(expected),
            "stdout: {}\nstderr: {}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{}'\nstdout: {}", expected, stdout);
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{}'\nstderr: {}", expected, stderr);
        self
    }
}

// =============================================================================
// Project
// =============================================================================

/// A throwaway source tree plus an unused, empty store directory, scoped to
/// one `reprotest` invocation.
pub struct Project {
    source_dir: tempfile::TempDir,
    store_dir: tempfile::TempDir,
}

impl Project {
    /// Create an empty source tree with a fresh store directory alongside.
    pub fn empty() -> Self {
        Self { source_dir: tempfile::tempdir().unwrap(), store_dir: tempfile::tempdir().unwrap() }
    }

    /// The source tree path, used as `reprotest`'s implicit source_root
    /// (the working directory).
    pub fn path(&self) -> &Path {
        self.source_dir.path()
    }

    /// A `CliBuilder` rooted at this project, with a fresh `--store-dir` and
    /// `--no-diffoscope` (so `diff -ru` is used instead of requiring a real
    /// `diffoscope` install) already applied.
    pub fn reprotest(&self) -> CliBuilder {
        let store_dir = self.store_dir.path().to_string_lossy().into_owned();
        cli().pwd(self.path()).args(&["--no-diffoscope", "--store-dir", store_dir.as_str()])
    }
}
