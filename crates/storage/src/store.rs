// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted state layout (`§6.4`):
//!
//! ```text
//! <store>/control/source-root/<artifact-files>
//! <store>/experiment-<i>/source-root/<artifact-files>
//! <store>/diffoscope.out           # iff a diff occurred
//! <store>/SHA256SUMS                # iff reproducible
//! ```
//!
//! Byte-identical experiment directories are collapsed into a relative
//! symlink to `control/`.

use crate::error::StoreError;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

pub const CONTROL_NAME: &str = "control";
pub const SOURCE_ROOT_NAME: &str = "source-root";
pub const SHA256SUMS_NAME: &str = "SHA256SUMS";
pub const DIFFOSCOPE_OUT_NAME: &str = "diffoscope.out";

/// A single reprotest invocation's persisted directory tree.
#[derive(Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Create a store at `root`, which must be empty or nonexistent.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if root.exists() {
            let mut entries = fs::read_dir(&root)?;
            if entries.next().is_some() {
                return Err(StoreError::NotEmpty(root));
            }
        } else {
            fs::create_dir_all(&root)?;
        }
        Ok(Store { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<store>/control/`
    pub fn control_dir(&self) -> PathBuf {
        self.root.join(CONTROL_NAME)
    }

    /// `<store>/experiment-<name>/`; `name` is an opaque build identifier,
    /// e.g. `"1"`.
    pub fn experiment_dir(&self, name: &str) -> PathBuf {
        self.root.join(format!("experiment-{name}"))
    }

    /// `<build-dir>/source-root/`
    pub fn source_root_of(build_dir: &Path) -> PathBuf {
        build_dir.join(SOURCE_ROOT_NAME)
    }

    /// Replace an experiment's directory with a relative symlink to
    /// `control/`, because its artifacts were byte-identical.
    pub fn collapse_to_control(&self, experiment_name: &str) -> Result<(), StoreError> {
        let dir = self.experiment_dir(experiment_name);
        if dir.is_symlink() || dir.is_dir() {
            fs::remove_dir_all(&dir).or_else(|e| if dir.is_symlink() { fs::remove_file(&dir) } else { Err(e) })?;
        }
        symlink(CONTROL_NAME, &dir)?;
        Ok(())
    }

    /// Write `<store>/SHA256SUMS`: one `<hex digest>  <relative path>` line
    /// per file, atomically (write to a temp file, then rename).
    pub fn write_sha256sums(&self, files: &[(PathBuf, String)]) -> Result<(), StoreError> {
        let path = self.root.join(SHA256SUMS_NAME);
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for (absolute, relative) in files {
                let digest = sha256_file(absolute)?;
                writeln!(writer, "{digest}  {relative}")?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Write `<store>/diffoscope.out`, atomically.
    pub fn write_diffoscope_out(&self, content: &str) -> Result<(), StoreError> {
        let path = self.root.join(DIFFOSCOPE_OUT_NAME);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

fn sha256_file(path: &Path) -> Result<String, StoreError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
