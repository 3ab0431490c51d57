//! CLI help output specs.

use crate::prelude::*;

#[test]
fn help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn dry_run_with_no_positionals_resolves_the_debian_preset() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["--dry-run"])
        .passes()
        .stdout_has("dpkg-buildpackage")
        .stdout_has("mode: diff");
}

#[test]
fn dry_run_auto_build_reports_auto_build_mode() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["--dry-run", "--auto-build", "true", "artifact"])
        .passes()
        .stdout_has("mode: auto-build");
}
