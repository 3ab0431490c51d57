//! E6: the same PID-dependent build as E3, under `--auto-build`. The very
//! first oracle probe (no variations at all) already fails to reproduce, so
//! the bisector reports unreproducible with no witnesses rather than
//! walking the variation list.

use crate::prelude::*;

#[test]
fn pid_dependent_output_under_auto_build_is_unreproducible() {
    let project = Project::empty();
    // -domain_host: see reproducible.rs.
    project
        .reprotest()
        .args(&["printf '%s' \"$$\" > artifact", "artifact", "--variations", "+all,-domain_host", "--auto-build"])
        .fails()
        .exit_code(1)
        .stdout_has("not even reproducible under controlled conditions");
}
