// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point (`§6.1`): parse args, resolve config, drive the orchestrator
//! through one control build plus either named extra-builds or the
//! auto-bisector, and report a reproducibility verdict.

mod args;
mod config;
mod error;
mod logging;
mod preflight;
mod presets;

use crate::args::{resolve_positionals, Cli};
use crate::error::ReprotestError;
use async_trait::async_trait;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reprotest_adapters::{resolve_backend, NullTestbedAdapter, ProcessTestbedAdapter, TestbedAdapter};
use reprotest_core::dsl::{apply_spec_str, parse_spec};
use reprotest_core::{PlanContext, VariationSpec};
use reprotest_engine::{bisect, BisectOutcome, DiffOutcome, DiffTool, Orchestrator, OrchestratorError, ReproducibilityOracle};
use reprotest_storage::Store;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("reprotest: {}", format_error(&e));
            e.exit_code()
        }
    };
    std::process::exit(code);
}

/// Chains error sources onto one line, the way the donor CLI's error
/// printer avoids `anyhow`'s doubled "Caused by:" framing.
fn format_error(err: &ReprotestError) -> String {
    use std::error::Error as _;
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        out.push_str(&format!(": {s}"));
        source = s.source();
    }
    out
}

async fn run() -> Result<i32, ReprotestError> {
    let mut cli = Cli::parse();

    if let Some(path) = cli.config_file.clone() {
        let file_config = config::load(&path)?;
        config::merge(&mut cli, &file_config);
    }

    logging::init(cli.verbosity.max(cli.verbose));

    for name in cli.dont_vary.clone() {
        cli.vary.push(format!("-{name}"));
    }

    if !cli.extra_build.is_empty() && cli.auto_build {
        return Err(ReprotestError::Usage("--extra-build and --auto-build are mutually exclusive".to_string()));
    }

    let resolved = resolve_positionals(&cli);
    let source_root = PathBuf::from(&resolved.source_root);

    let (build_command, artifact_pattern, testbed_init) = if resolved.build_command == "auto" {
        let preset = presets::resolve(&cli.host_distro).ok_or_else(|| {
            ReprotestError::Usage(format!(
                "no build preset for --host-distro={}; pass --build-command/-c explicitly",
                cli.host_distro
            ))
        })?;
        let artifact_pattern = resolved.artifact_pattern.clone().unwrap_or_else(|| preset.artifact_pattern.to_string());
        let testbed_init = cli.testbed_init.clone().or_else(|| preset.testbed_init.map(str::to_string));
        (preset.build_command.to_string(), artifact_pattern, testbed_init)
    } else {
        let artifact_pattern = resolved
            .artifact_pattern
            .clone()
            .ok_or_else(|| ReprotestError::Usage("no <artifact_pattern> to test for differences; see --help".to_string()))?;
        (resolved.build_command.clone(), artifact_pattern, cli.testbed_init.clone())
    };

    let mut var_full = parse_spec(&cli.variations).map_err(OrchestratorError::from)?;
    for v in &cli.vary {
        apply_spec_str(&mut var_full, v).map_err(OrchestratorError::from)?;
    }

    if cli.dry_run {
        println!("build_command: {build_command}");
        println!("source_root: {}", source_root.display());
        println!("artifact_pattern: {artifact_pattern}");
        println!("variations: {:?}", var_full.keys().collect::<Vec<_>>());
        println!("mode: {}", if cli.auto_build { "auto-build" } else { "diff" });
        return Ok(0);
    }

    let store_dir = cli
        .store_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(format!("reprotest-{}", std::process::id())));
    let store = Store::create(store_dir).map_err(OrchestratorError::from)?;

    let available_tools = preflight::discover_available_tools();
    let seed = rand::random::<u64>();
    let plan_ctx = PlanContext::new(source_root.clone(), available_tools, seed);
    let diff_tool = DiffTool::new(!cli.no_diffoscope, cli.diffoscope_arg.clone());

    let mut backend_args = cli.virtual_server_args.clone();
    if backend_args.is_empty() {
        let testbed = NullTestbedAdapter::new();
        drive(
            testbed,
            store,
            plan_ctx,
            diff_tool,
            build_command,
            source_root,
            artifact_pattern,
            testbed_init,
            cli.source_pattern.clone(),
            cli.testbed_pre.clone(),
            cli.no_clean_on_error,
            cli.verbosity.max(cli.verbose),
            var_full,
            cli.extra_build.clone(),
            cli.auto_build,
        )
        .await
    } else {
        let backend_name = backend_args.remove(0);
        resolve_backend(&backend_name)
            .ok_or_else(|| ReprotestError::Usage(format!("testbed backend not found on PATH: reprotest-testbed-{backend_name}")))?;
        let testbed = ProcessTestbedAdapter::new(backend_name, backend_args);
        drive(
            testbed,
            store,
            plan_ctx,
            diff_tool,
            build_command,
            source_root,
            artifact_pattern,
            testbed_init,
            cli.source_pattern.clone(),
            cli.testbed_pre.clone(),
            cli.no_clean_on_error,
            cli.verbosity.max(cli.verbose),
            var_full,
            cli.extra_build.clone(),
            cli.auto_build,
        )
        .await
    }
}

#[allow(clippy::too_many_arguments)]
async fn drive<A: TestbedAdapter>(
    testbed: A,
    store: Store,
    plan_ctx: PlanContext,
    diff_tool: DiffTool,
    build_command: String,
    source_root: PathBuf,
    artifact_pattern: String,
    testbed_init: Option<String>,
    source_pattern: Option<String>,
    testbed_pre: Option<String>,
    no_clean_on_error: bool,
    verbosity: u8,
    var_full: VariationSpec,
    extra_build: Vec<String>,
    auto_build: bool,
) -> Result<i32, ReprotestError> {
    let scratch = std::env::temp_dir().join(format!("reprotest-scratch-{}", std::process::id()));
    std::fs::create_dir_all(&scratch).map_err(|e| OrchestratorError::Io(e.to_string()))?;

    let mut orch = Orchestrator::new(
        testbed,
        store.clone(),
        plan_ctx,
        build_command,
        source_root,
        &artifact_pattern,
        testbed_init,
        no_clean_on_error,
    )?;

    orch.start(&scratch, source_pattern.as_deref(), testbed_pre.as_deref()).await?;

    let control_dist = orch.build("control", VariationSpec::new(), verbosity).await?;
    let control_source_root = control_dist.join("source-root");

    let verdict = if auto_build {
        let mut oracle = OrchestratorOracle {
            orch: &mut orch,
            store: &store,
            diff_tool: &diff_tool,
            control_source_root: control_source_root.clone(),
            verbosity,
            probe: 0,
            diff_log: String::new(),
        };
        let mut rng = StdRng::from_entropy();
        let outcome = bisect(&mut oracle, &var_full, &mut rng).await?;
        if outcome.reproducible {
            let files = collect_relative_files(&control_source_root).map_err(|e| OrchestratorError::Io(e.to_string()))?;
            store.write_sha256sums(&files).map_err(OrchestratorError::from)?;
        } else if !oracle.diff_log.is_empty() {
            store.write_diffoscope_out(&oracle.diff_log).map_err(OrchestratorError::from)?;
        }
        report_bisect(&outcome)
    } else {
        let mut experiment_specs: Vec<(String, VariationSpec)> = vec![("1".to_string(), var_full.clone())];
        for (i, extra) in extra_build.iter().enumerate() {
            let spec = parse_spec(extra).map_err(OrchestratorError::from)?;
            experiment_specs.push(((i + 2).to_string(), spec));
        }

        let mut any_diff = false;
        let mut diffoscope_sections = String::new();

        for (short_name, spec) in experiment_specs {
            let dist = orch.build(format!("experiment-{short_name}"), spec, verbosity).await?;
            let exp_source_root = dist.join("source-root");
            match diff_tool.compare(&control_source_root, &exp_source_root).await? {
                DiffOutcome::Identical => {
                    store.collapse_to_control(&short_name).map_err(OrchestratorError::from)?;
                }
                DiffOutcome::Different { output } => {
                    any_diff = true;
                    diffoscope_sections.push_str(&format!("=== experiment-{short_name} vs control ===\n{output}\n"));
                }
            }
        }

        if any_diff {
            store.write_diffoscope_out(&diffoscope_sections).map_err(OrchestratorError::from)?;
            1
        } else {
            let files = collect_relative_files(&control_source_root).map_err(|e| OrchestratorError::Io(e.to_string()))?;
            store.write_sha256sums(&files).map_err(OrchestratorError::from)?;
            0
        }
    };

    orch.finish().await?;
    Ok(verdict)
}

fn report_bisect(outcome: &BisectOutcome) -> i32 {
    if outcome.reproducible {
        println!("reproducible build");
        0
    } else if outcome.witnesses.is_empty() {
        println!("unreproducible: build is not even reproducible under controlled conditions");
        1
    } else {
        println!("unreproducible: culprit variations: {}", outcome.witnesses.join(", "));
        1
    }
}

/// Probes an in-flight [`Orchestrator`] run for the auto-bisector: each call
/// runs one more build under `spec` and diffs it against the already-built
/// control, logging any differences for a final `diffoscope.out`.
struct OrchestratorOracle<'a, A: TestbedAdapter> {
    orch: &'a mut Orchestrator<A>,
    store: &'a Store,
    diff_tool: &'a DiffTool,
    control_source_root: PathBuf,
    verbosity: u8,
    probe: usize,
    diff_log: String,
}

#[async_trait]
impl<'a, A: TestbedAdapter> ReproducibilityOracle for OrchestratorOracle<'a, A> {
    async fn is_reproducible(&mut self, name: &str, spec: &VariationSpec) -> Result<bool, OrchestratorError> {
        self.probe += 1;
        let short_name = self.probe.to_string();
        let dist = self.orch.build(format!("experiment-{short_name}"), spec.clone(), self.verbosity).await?;
        let exp_source_root = dist.join("source-root");
        match self.diff_tool.compare(&self.control_source_root, &exp_source_root).await? {
            DiffOutcome::Identical => {
                self.store.collapse_to_control(&short_name)?;
                Ok(true)
            }
            DiffOutcome::Different { output } => {
                self.diff_log.push_str(&format!("=== probe {name} (experiment-{short_name}) vs control ===\n{output}\n"));
                Ok(false)
            }
        }
    }
}

/// Walks `root` recursively, returning `(absolute, relative-as-string)`
/// pairs for every regular file, for `Store::write_sha256sums`.
fn collect_relative_files(root: &Path) -> std::io::Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                stack.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().into_owned();
                files.push((path, relative));
            }
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}
