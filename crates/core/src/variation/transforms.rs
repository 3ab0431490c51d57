// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The twelve variation transforms (`§4.3`), one function per registry
//! entry. Each has the shape `(ctx, build, vary, config) -> Result<Build>`;
//! `config` always carries the variant matching the transform's own name —
//! the planner resolves it from [`VariationConfig::default_for`] whenever
//! the spec doesn't name the variation explicitly, so every transform can
//! read its own fields unconditionally.

use super::{PlanContext, VariationConfig};
use crate::build::Build;
use crate::env_template::EnvTemplate;
use crate::error::PlanError;
use reprotest_shell::ast::{Command, Word};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn mismatched(name: &str) -> PlanError {
    PlanError::Conflict(format!("{name}: configuration shape does not match variation"))
}

/// Mirrors `os.path.dirname`/`basename` for a path that may carry a
/// trailing separator: normalize first, then split.
fn dirname(p: &Path) -> PathBuf {
    p.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn basename(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn environment(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    config: &VariationConfig,
) -> Result<Build, PlanError> {
    let _ = ctx;
    if !vary {
        return Ok(build);
    }
    let VariationConfig::Environment(templates) = config else {
        return Err(mismatched("environment"));
    };
    let mut build = build;
    for template in templates {
        build = match template {
            EnvTemplate::Capture(name) => {
                let value = std::env::var(name).unwrap_or_default();
                build.set_env(name.clone(), value)
            }
            EnvTemplate::Set(name, value) => build.set_env(name.clone(), value.clone()),
            EnvTemplate::Unset(name) => build.unset_env(name.clone()),
        };
    }
    Ok(build)
}

/// Must run before anything that mounts or namespaces the tree (`§4.3`
/// tie-breaks): moves the tree to a fixed path on the *control* build, so
/// the experiment's differing path is the thing under test.
pub fn build_path(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    let _ = ctx;
    if vary {
        return Ok(build);
    }
    let const_path = dirname(&build.tree).join("const_build_path");
    let old_tree = build.tree.clone();
    let build = build
        .append_setup(mv(&old_tree, &const_path))
        .prepend_cleanup(mv(&const_path, &old_tree));
    Ok(Build {
        tree: const_path,
        ..build
    })
}

fn mv(from: &Path, to: &Path) -> Command {
    Command::new(Word::raw("mv"))
        .arg(Word::literal(from.to_string_lossy()))
        .arg(Word::literal(to.to_string_lossy()))
}

/// Picks a `user[:group]` pair different from the testbed's current
/// identity (when known) and re-enters the build command under it. Must
/// wrap only `build_command`, never `setup`, since setup needs to run as
/// the original user to install the PATH shims (`§4.3` tie-breaks).
pub fn user_group(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    config: &VariationConfig,
) -> Result<Build, PlanError> {
    if !vary {
        return Ok(build);
    }
    let VariationConfig::UserGroup(available) = config else {
        return Err(mismatched("user_group"));
    };
    let candidates: Vec<&String> = available
        .iter()
        .filter(|ug| Some(ug.as_str()) != ctx.current_user_group.as_deref())
        .collect();
    if candidates.is_empty() {
        tracing::warn!("ignoring user_group variation: no usable --user-groups given");
        return Ok(build);
    }
    let chosen = ctx.with_rng(|rng| {
        use rand::seq::SliceRandom;
        (*candidates.choose(rng).expect("non-empty candidates")).clone()
    });
    let (user, group) = match chosen.split_once(':') {
        Some((u, g)) => (u.to_string(), g.to_string()),
        None => (chosen.clone(), chosen.clone()),
    };

    let bin_dir = dirname(&build.tree).join("bin");
    let shim = |tool: &str| {
        Command::new(Word::raw("sh"))
            .arg(Word::raw("-ec"))
            .arg(Word::literal(format!(
                "printf '#!/bin/sh\\nsudo -u \"{user}\" -g \"{group}\" {tool} \"$@\"\\n' > {bin}/{name}; chmod +x {bin}/{name}",
                bin = bin_dir.display(),
                name = tool.rsplit('/').next().unwrap_or(tool),
            )))
    };

    let build = build
        .append_setup(
            Command::new(Word::raw("mkdir"))
                .arg(Word::raw("-p"))
                .arg(Word::literal(bin_dir.to_string_lossy())),
        )
        .append_setup(shim("/usr/bin/disorderfs"))
        .append_setup(shim("/bin/mkdir"))
        .append_setup(shim("/bin/fusermount"))
        .append_setup(Command::new(Word::raw("export")).arg(Word::raw(format!(
            "PATH=\"{}:$PATH\"",
            bin_dir.display()
        ))))
        .append_setup(
            Command::new(Word::raw("sudo"))
                .arg(Word::raw("chown"))
                .arg(Word::raw("-h"))
                .arg(Word::raw("-R"))
                .arg(Word::raw(format!("--from={user}")))
                .arg(Word::raw(&user))
                .arg(Word::literal(build.tree.to_string_lossy())),
        )
        .prepend_cleanup(
            Command::new(Word::raw("sudo"))
                .arg(Word::raw("chown"))
                .arg(Word::raw("-h"))
                .arg(Word::raw("-R"))
                .arg(Word::raw(format!("--from={user}")))
                .arg(Word::raw(ctx.current_user_group.as_deref().unwrap_or(&user)))
                .arg(Word::literal(build.tree.to_string_lossy())),
        )
        .wrap_build_command([
            Word::raw("sudo"),
            Word::raw("-E"),
            Word::raw("-u"),
            Word::raw(user),
            Word::raw("-g"),
            Word::raw(group),
            Word::raw("env"),
            Word::raw("-u"),
            Word::raw("SUDO_COMMAND"),
            Word::raw("-u"),
            Word::raw("SUDO_USER"),
            Word::raw("-u"),
            Word::raw("SUDO_UID"),
            Word::raw("-u"),
            Word::raw("SUDO_GID"),
        ]);
    Ok(build)
}

/// Requires `disorderfs` on `PATH`; demotes to a no-op with a warning
/// otherwise (`§4.3` tie-breaks).
pub fn fileordering(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    if !vary {
        return Ok(build);
    }
    if !ctx.has_tool("disorderfs") {
        tracing::warn!("ignoring fileordering variation: disorderfs not found on PATH");
        return Ok(build);
    }
    let old_tree = dirname(&build.tree).join(format!("{}-before-disorderfs", basename(&build.tree)));
    let tree = build.tree.clone();
    let build = build
        .append_setup(mv(&tree, &old_tree))
        .append_setup(
            Command::new(Word::raw("mkdir"))
                .arg(Word::raw("-p"))
                .arg(Word::literal(tree.to_string_lossy())),
        )
        .append_setup(
            Command::new(Word::raw("disorderfs"))
                .arg(Word::raw("--shuffle-dirents=yes"))
                .arg(Word::literal(old_tree.to_string_lossy()))
                .arg(Word::literal(tree.to_string_lossy())),
        )
        .prepend_cleanup(mv(&old_tree, &tree))
        .prepend_cleanup(Command::new(Word::raw("rmdir")).arg(Word::literal(tree.to_string_lossy())))
        .prepend_cleanup(
            Command::new(Word::raw("fusermount"))
                .arg(Word::raw("-u"))
                .arg(Word::literal(tree.to_string_lossy())),
        );
    Ok(build)
}

/// On vary, isolates mount and UTS namespaces so the experiment sees a
/// distinct hostname/domainname; requires `unshare`. Without `use_sudo`,
/// falls back to an unprivileged `unshare -r --uts`.
pub fn domain_host(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    config: &VariationConfig,
) -> Result<Build, PlanError> {
    if !vary {
        return Ok(build);
    }
    let VariationConfig::DomainHost { use_sudo } = config else {
        return Err(mismatched("domain_host"));
    };
    if !ctx.has_tool("unshare") {
        tracing::warn!("ignoring domain_host variation: unshare not found on PATH");
        return Ok(build);
    }

    let mount_ns = build.aux_tree.join("mount-ns");
    let uts_ns = build.aux_tree.join("uts-ns");
    let hosts_file = build.aux_tree.join("hosts");

    let mut build = build
        .append_setup(touch(&mount_ns))
        .append_setup(touch(&uts_ns))
        .append_setup(
            Command::new(Word::raw("mount"))
                .arg(Word::raw("--bind"))
                .arg(Word::raw("/proc/self/ns/mnt"))
                .arg(Word::literal(mount_ns.to_string_lossy())),
        )
        .append_setup(
            Command::new(Word::raw("mount"))
                .arg(Word::raw("--make-private"))
                .arg(Word::literal(mount_ns.to_string_lossy())),
        )
        .append_setup(write_file(&hosts_file, "127.0.0.1 localhost reprotest-experiment\n"))
        .prepend_cleanup(
            Command::new(Word::raw("umount"))
                .arg(Word::literal(mount_ns.to_string_lossy())),
        );

    let nsenter = |tail: Vec<Word>| {
        Command::new(Word::raw("sudo"))
            .arg(Word::raw("nsenter"))
            .arg(Word::raw("--mount"))
            .arg(Word::literal(mount_ns.to_string_lossy()))
            .arg(Word::raw("--uts"))
            .arg(Word::literal(uts_ns.to_string_lossy()))
            .args(tail)
    };

    build = if *use_sudo {
        build
            .append_setup(
                Command::new(Word::raw("sudo"))
                    .arg(Word::raw("unshare"))
                    .arg(Word::raw("--mount"))
                    .arg(Word::raw("--uts"))
                    .arg(Word::raw("hostname"))
                    .arg(Word::raw("reprotest-experiment")),
            )
            // Bind-mount the custom /etc/hosts inside the pinned namespace,
            // once, during setup — separate from entering it again below to
            // run the build, so sudo doesn't warn about an unresolvable host.
            .append_setup(nsenter(vec![
                Word::raw("mount"),
                Word::raw("--bind"),
                Word::literal(hosts_file.to_string_lossy()),
                Word::raw("/etc/hosts"),
            ]))
            // Re-enter the same namespace for the build itself; whatever
            // user/group wrap `user_group` already applied becomes the tail.
            .wrap_build_command(nsenter_prefix_words(&mount_ns, &uts_ns))
    } else {
        build.wrap_build_command([Word::raw("unshare"), Word::raw("-r"), Word::raw("--uts")])
    };
    Ok(build)
}

fn nsenter_prefix_words(mount_ns: &Path, uts_ns: &Path) -> Vec<Word> {
    vec![
        Word::raw("sudo"),
        Word::raw("nsenter"),
        Word::raw("--mount"),
        Word::literal(mount_ns.to_string_lossy()),
        Word::raw("--uts"),
        Word::literal(uts_ns.to_string_lossy()),
    ]
}

fn touch(p: &Path) -> Command {
    Command::new(Word::raw("touch")).arg(Word::literal(p.to_string_lossy()))
}

fn write_file(p: &Path, contents: &str) -> Command {
    Command::new(Word::raw("sh")).arg(Word::raw("-ec")).arg(Word::literal(format!(
        "printf '%s' {} > {}",
        shell_single_quote(contents),
        p.display()
    )))
}

fn shell_single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Must run after anything that can change `tree` (`build_path`).
pub fn home(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    let _ = ctx;
    if !vary {
        let tree = build.tree_with_sep();
        Ok(build.set_env("HOME", tree))
    } else {
        Ok(build.set_env("HOME", "/nonexistent/second-build"))
    }
}

pub fn kernel(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    let tool = if vary { "linux32" } else { "linux64" };
    if !ctx.has_tool(tool) {
        tracing::warn!("ignoring kernel variation: {tool} not found on PATH");
        return Ok(build);
    }
    Ok(if vary {
        build.wrap_build_command([Word::raw("linux32")])
    } else {
        build.wrap_build_command([Word::raw("linux64"), Word::raw("--uname-2.6")])
    })
}

const VARY_LOCALES: &[&str] = &["fr_CH.UTF-8", "es_ES", "ru_RU.CP1251", "kk_KZ.RK1048", "zh_CN"];

pub fn locales(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    if !vary {
        return Ok(build.set_env("LANG", "C.UTF-8").set_env("LANGUAGE", "en_US:en"));
    }
    let loc = ctx.with_rng(|rng| {
        use rand::seq::SliceRandom;
        *VARY_LOCALES.choose(rng).expect("non-empty locale list")
    });
    Ok(build
        .set_env("LANG", loc)
        .set_env("LC_ALL", loc)
        .set_env("LANGUAGE", format!("{loc}:fr")))
}

pub fn exec_path(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    let _ = ctx;
    if !vary {
        return Ok(build);
    }
    Ok(build.append_setup(
        Command::new(Word::raw("export")).arg(Word::raw("PATH=\"$PATH:/i_capture_the_path\"")),
    ))
}

/// An absolute `faketimes` entry older than this many seconds is used
/// as-is; otherwise a relative future offset is used, so the faked clock
/// reliably differs between control and experiment regardless of how
/// recently the source tree was touched.
const FAKETIME_PAST_THRESHOLD_SECS: u64 = 32_253_180;

pub fn time(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    config: &VariationConfig,
) -> Result<Build, PlanError> {
    if !vary {
        return Ok(build);
    }
    let VariationConfig::Time { faketimes, .. } = config else {
        return Err(mismatched("time"));
    };
    if !ctx.has_tool("faketime") {
        tracing::warn!("ignoring time variation: faketime not found on PATH");
        return Ok(build);
    }
    if faketimes.is_empty() {
        tracing::warn!("ignoring time variation: no faketimes configured");
        return Ok(build);
    }
    let chosen = ctx.with_rng(|rng| {
        use rand::seq::SliceRandom;
        faketimes.iter().collect::<Vec<_>>().choose(rng).copied().cloned()
    });
    let Some(chosen) = chosen else {
        return Ok(build);
    };

    let spec = if let Some(unix) = chosen.strip_prefix('@').and_then(|s| s.parse::<i64>().ok()) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        if unix < now - FAKETIME_PAST_THRESHOLD_SECS as i64 {
            format!("@{unix}")
        } else {
            "+373days+7hours+13minutes".to_string()
        }
    } else {
        chosen
    };

    Ok(build
        .set_env("NO_FAKE_STAT", "1")
        .wrap_build_command([Word::raw("faketime"), Word::literal(spec)]))
}

pub fn timezone(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    let _ = ctx;
    Ok(if vary {
        build.set_env("TZ", "GMT-14")
    } else {
        build.set_env("TZ", "GMT+12")
    })
}

pub fn umask(
    ctx: &PlanContext,
    build: Build,
    vary: bool,
    _config: &VariationConfig,
) -> Result<Build, PlanError> {
    let _ = ctx;
    let mode = if vary { "0002" } else { "0022" };
    Ok(build.prepend_setup(Command::new(Word::raw("umask")).arg(Word::raw(mode))))
}

#[cfg(test)]
#[path = "transforms_tests.rs"]
mod tests;
