// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Build` value: everything a variation transform can add to, and the
//! planner's sole unit of composition.

use indexmap::IndexMap;
use reprotest_shell::{AndList, Command, List};
use std::path::PathBuf;

/// An immutable build plan under construction.
///
/// Every transform in the variation registry takes ownership of a `Build`
/// and returns a new one (`fn(ctx, build, vary) -> Build`); there is no
/// in-place mutation method on this type. Because `setup`/`cleanup`/`env`
/// are plain owned collections rather than shared/reference-counted ones,
/// moving a `Build` into a transform and returning a freshly-built one
/// already rules out the aliasing the upstream implementation has to guard
/// against explicitly — there is no handle left behind to alias.
#[derive(Debug, Clone)]
pub struct Build {
    /// The user's build line, e.g. `sh -ec "<cmd>"`, progressively wrapped
    /// by variation transforms (`sudo ...`, `linux64 --uname-2.6`, `faketime
    /// <spec>`, ...).
    pub build_command: Command,
    /// Commands run before the build. Failure of any aborts the build.
    pub setup: AndList,
    /// Commands run after the build, success or failure alike, each run
    /// regardless of whether an earlier one failed.
    pub cleanup: List,
    /// Read-only env var overlay, applied on top of the testbed's own
    /// environment when executing `build_command`. `Some(value)` sets the
    /// variable; `None` explicitly unsets it (distinct from simply not
    /// mentioning it, which leaves the testbed's ambient value alone).
    pub env: IndexMap<String, Option<String>>,
    /// Path to the source root inside the testbed.
    pub tree: PathBuf,
    /// Scratch directory reserved for the core (mounts, helper binaries,
    /// namespace files). Created in setup, removed in cleanup.
    pub aux_tree: PathBuf,
}

impl Build {
    /// A fresh `Build` for a given build command, source tree, and aux
    /// scratch directory, with empty setup/cleanup/env.
    pub fn new(build_command: Command, tree: PathBuf, aux_tree: PathBuf) -> Self {
        Build {
            build_command,
            setup: AndList::new(),
            cleanup: List::new(),
            env: IndexMap::new(),
            tree,
            aux_tree,
        }
    }

    /// Set an environment variable, consuming and returning `self` so
    /// transforms can chain `build.set_env(..).set_env(..)`.
    pub fn set_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), Some(value.into()));
        self
    }

    /// Explicitly unset an environment variable.
    pub fn unset_env(mut self, name: impl Into<String>) -> Self {
        self.env.insert(name.into(), None);
        self
    }

    /// Append a command to `setup`.
    pub fn append_setup(mut self, cmd: Command) -> Self {
        self.setup.push(cmd);
        self
    }

    /// Insert a command at the front of `setup` (runs before everything
    /// already scheduled).
    pub fn prepend_setup(mut self, cmd: Command) -> Self {
        self.setup.push_front(cmd);
        self
    }

    /// Insert a command at the front of `cleanup`, so it undoes the most
    /// recently added setup step first (LIFO).
    pub fn prepend_cleanup(mut self, cmd: Command) -> Self {
        self.cleanup.push_front(cmd);
        self
    }

    /// Wrap `build_command` in an outer command (`sudo ...`, `linux64
    /// --uname-2.6`, `faketime <spec>`, ...).
    pub fn wrap_build_command(mut self, prefix: impl IntoIterator<Item = reprotest_shell::ast::Word>) -> Self {
        self.build_command = self.build_command.wrap(prefix);
        self
    }

    /// Render the assembled setup/build/cleanup triple into the final
    /// `sh -ec` script text.
    pub fn render_script(&self, clean_on_error: bool) -> String {
        reprotest_shell::emit::render_script(
            &self.setup,
            &self.build_command,
            &self.cleanup,
            clean_on_error,
        )
    }

    /// Path to the source tree with a guaranteed trailing separator, as
    /// required by the copydown/copyup verbs (`§4.6`).
    pub fn tree_with_sep(&self) -> String {
        let mut s = self.tree.to_string_lossy().into_owned();
        if !s.ends_with('/') {
            s.push('/');
        }
        s
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
