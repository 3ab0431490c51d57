//! E2: a build that always fails is a harness error (exit 125), not a
//! reproducibility verdict.

use crate::prelude::*;

#[test]
fn always_failing_build_is_a_harness_error() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["exit 1", "artifact", "--variations", "+all"])
        .fails()
        .exit_code(125)
        .stderr_has("build");
}
