//! CLI error handling specs: usage errors (exit 2) and harness errors
//! (exit 125), independent of the end-to-end reproducibility scenarios.

use crate::prelude::*;

#[test]
fn missing_artifact_pattern_is_a_usage_error() {
    let project = Project::empty();
    project.reprotest().args(&["true"]).fails().exit_code(2).stderr_has("no <artifact_pattern>");
}

#[test]
fn extra_build_and_auto_build_are_mutually_exclusive() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["true", "artifact", "--extra-build", "+umask", "--auto-build"])
        .fails()
        .exit_code(2)
        .stderr_has("mutually exclusive");
}

#[test]
fn unrecognized_testbed_backend_is_a_usage_error() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["true", "artifact", "--", "not-a-real-backend"])
        .fails()
        .exit_code(2)
        .stderr_has("testbed backend not found");
}

#[test]
fn artifact_pattern_escaping_the_source_tree_is_rejected() {
    let project = Project::empty();
    project.reprotest().args(&["true", "/etc/*"]).fails().exit_code(2);
}

#[test]
fn unknown_variation_name_is_a_usage_error() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["true", "artifact", "--variations", "+not_a_real_variation"])
        .fails()
        .exit_code(2);
}
