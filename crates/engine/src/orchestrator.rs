// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestrator (`§4.7`): owns the outer build lifecycle as a
//! cooperative, single-threaded driver. The caller decides build names and
//! specs one at a time (`build()`), which is what makes auto-bisection
//! possible — the next probe depends on the previous result.

use crate::error::OrchestratorError;
use reprotest_adapters::{ExecKind, TestbedAdapter};
use reprotest_core::dsl::apply_dynamic_defaults;
use reprotest_core::planner::plan;
use reprotest_core::{Build, BuildContext, PlanContext, VariationConfig, VariationSpec, Variations};
use reprotest_shell::ast::{Command as ShellCommand, Word};
use reprotest_storage::Store;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// `REPROTEST_UMASK` value the build preamble re-applies (`§6.3`), mirroring
/// the literal control/vary umasks the `umask` transform itself uses.
const CONTROL_UMASK: &str = "0022";
const VARY_UMASK: &str = "0002";

pub struct Orchestrator<A: TestbedAdapter> {
    testbed: A,
    plan_ctx: PlanContext,
    store: Store,
    build_command: String,
    effective_source_root: PathBuf,
    artifact_words: Vec<String>,
    testbed_init_script: Option<String>,
    testbed_root: Option<PathBuf>,
    testbed_init_done: bool,
    seen_names: HashSet<String>,
    schedule: Variations,
    no_clean_on_error: bool,
    had_error: bool,
}

impl<A: TestbedAdapter> Orchestrator<A> {
    /// `artifact_pattern` is sanitized here; construction fails fast
    /// (`SanitizeError`, exit 2) before any testbed resource is touched.
    pub fn new(
        testbed: A,
        store: Store,
        plan_ctx: PlanContext,
        build_command: impl Into<String>,
        source_root: impl Into<PathBuf>,
        artifact_pattern: &str,
        testbed_init_script: Option<String>,
        no_clean_on_error: bool,
    ) -> Result<Self, OrchestratorError> {
        let sanitized = reprotest_shell::sanitize(artifact_pattern, true)?;
        Ok(Orchestrator {
            testbed,
            plan_ctx,
            store,
            build_command: build_command.into(),
            effective_source_root: source_root.into(),
            artifact_words: sanitized.words,
            testbed_init_script,
            testbed_root: None,
            testbed_init_done: false,
            seen_names: HashSet::new(),
            schedule: Variations::default(),
            no_clean_on_error,
            had_error: false,
        })
    }

    /// Apply an optional `source_pattern`/`testbed_pre` hook locally
    /// (outside the testbed), narrowing `effective_source_root` to the
    /// hook's output directory, then start the testbed.
    pub async fn start(
        &mut self,
        scratch: &Path,
        source_pattern: Option<&str>,
        testbed_pre: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        if source_pattern.is_some() || testbed_pre.is_some() {
            if let Some(pattern) = source_pattern {
                reprotest_shell::sanitize(pattern, true)?;
            }
            let pre_dir = scratch.join("testbed_pre");
            std::fs::create_dir_all(&pre_dir).map_err(|e| OrchestratorError::Io(e.to_string()))?;
            copy_matching(&self.effective_source_root, &pre_dir, source_pattern).map_err(|e| OrchestratorError::Io(e.to_string()))?;
            if let Some(hook) = testbed_pre {
                let status = tokio::process::Command::new("sh")
                    .arg("-ec")
                    .arg(hook)
                    .current_dir(&pre_dir)
                    .status()
                    .await
                    .map_err(|e| OrchestratorError::Io(e.to_string()))?;
                if !status.success() {
                    return Err(OrchestratorError::BuildFailure { name: "testbed_pre".to_string(), message: format!("hook exited {status}") });
                }
            }
            self.effective_source_root = pre_dir;
        }

        self.testbed.start().await?;
        let root = self.testbed.open().await?;
        self.testbed_root = Some(root);
        Ok(())
    }

    /// Plan, run, and collect one build. Rejects a name already seen this
    /// run. Returns the local directory the artifacts were copied into.
    pub async fn build(&mut self, name: impl Into<String>, spec: VariationSpec, verbosity: u8) -> Result<PathBuf, OrchestratorError> {
        let name = name.into();
        if !self.seen_names.insert(name.clone()) {
            return Err(OrchestratorError::DuplicateName(name));
        }
        let testbed_root = self.testbed_root.clone().ok_or_else(|| OrchestratorError::Usage("start() was not called".to_string()))?;

        let resolved_spec = apply_dynamic_defaults(&spec, &self.effective_source_root)?;
        self.schedule.push(name.clone(), resolved_spec.clone(), verbosity);

        let ctx = BuildContext::new(testbed_root, self.store.root(), &self.effective_source_root, name.clone(), self.schedule.clone());

        let base = Build::new(
            ShellCommand::new(Word::raw("sh")).arg(Word::raw("-ec")).arg(Word::literal(self.build_command.clone())),
            ctx.testbed_src(),
            ctx.testbed_src().join(".reprotest-aux"),
        );
        let built = match plan(&self.plan_ctx, base, &resolved_spec) {
            Ok(built) => built,
            Err(e) => {
                self.had_error = true;
                return Err(e.into());
            }
        };

        if !self.testbed_init_done {
            if let Some(init) = &self.testbed_init_script {
                self.testbed.check_exec(&sh(init), &[], ExecKind::Short).await?;
            }
            self.testbed_init_done = true;
        }

        let result = self.run_one(&ctx, &resolved_spec, &built).await;
        if result.is_err() {
            self.had_error = true;
        }
        result
    }

    async fn run_one(&self, ctx: &BuildContext, spec: &VariationSpec, built: &Build) -> Result<PathBuf, OrchestratorError> {
        self.testbed.copydown(&self.effective_source_root, &ctx.testbed_src()).await?;

        let artifact_glob = self.artifact_words.join(" ");
        self.testbed
            .check_exec(&sh(&format!("cd {} && rm -f -- {artifact_glob} 2>/dev/null || true", quote(&ctx.testbed_src()))), &[], ExecKind::Short)
            .await?;

        let captured_umask = match spec.get("umask") {
            Some(VariationConfig::Umask(true)) => VARY_UMASK,
            _ => CONTROL_UMASK,
        };
        let preamble = format!(
            "cd {}; unset REPROTEST_BUILD_PATH; umask {}; unset REPROTEST_UMASK;\n",
            "\"$REPROTEST_BUILD_PATH\"", "\"$REPROTEST_UMASK\""
        );
        let unsets: Vec<&String> = built.env.iter().filter(|(_, v)| v.is_none()).map(|(k, _)| k).collect();
        let unset_prefix = if unsets.is_empty() { String::new() } else { format!("unset {};\n", unsets.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" ")) };
        let script = format!("{preamble}{unset_prefix}{}", built.render_script(true));

        let mut xenv: Vec<(String, String)> = vec![
            ("REPROTEST_BUILD_PATH".to_string(), built.tree_with_sep()),
            ("REPROTEST_UMASK".to_string(), captured_umask.to_string()),
        ];
        for (k, v) in &built.env {
            if let Some(value) = v {
                xenv.push((k.clone(), value.clone()));
            }
        }

        let out = self.testbed.execute(&sh(&script), &xenv, ExecKind::Build).await?;
        if out.exit_code != 0 {
            return Err(OrchestratorError::BuildFailure { name: ctx.build_name.clone(), message: out.stderr });
        }

        let testbed_dist_src = ctx.testbed_dist().join("source-root");
        self.testbed
            .check_exec(
                &sh(&format!(
                    "mkdir -p {0} && cd {1} && cp -a -- {2} {0}/ 2>/dev/null; find {0} -exec touch -d @0 {{}} +",
                    quote(&testbed_dist_src),
                    quote(&ctx.testbed_src()),
                    artifact_glob
                )),
                &[],
                ExecKind::Short,
            )
            .await?;

        self.testbed.copyup(&testbed_dist_src, &ctx.local_dist().join("source-root")).await?;
        info!(build = %ctx.build_name, "build collected");
        Ok(ctx.local_dist())
    }

    /// Release testbed resources. Always called unless `no_clean_on_error`
    /// is set and an error was already observed (`§5`).
    pub async fn finish(self) -> Result<(), OrchestratorError> {
        if self.no_clean_on_error && self.had_error {
            warn!("skipping testbed cleanup: no_clean_on_error set and an error occurred");
            return Ok(());
        }
        self.testbed.stop().await?;
        Ok(())
    }
}

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-ec".to_string(), script.to_string()]
}

/// Minimal POSIX single-quoting for paths we embed into ad-hoc `sh -ec`
/// snippets the orchestrator builds itself (not user input).
fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "'\\''"))
}

fn copy_matching(src: &Path, dst: &Path, pattern: Option<&str>) -> std::io::Result<()> {
    let pattern = pattern.unwrap_or("*");
    let glob_pattern = src.join(pattern);
    let entries = glob::glob(&glob_pattern.to_string_lossy()).map_err(|e| std::io::Error::other(e.to_string()))?;
    for entry in entries {
        let path = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if let Ok(relative) = path.strip_prefix(src) {
            let target = dst.join(relative);
            if path.is_dir() {
                std::fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(&path, &target)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
