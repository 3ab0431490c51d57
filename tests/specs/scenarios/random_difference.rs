//! E3: a build whose output depends on its own subshell PID never
//! reproduces, independent of which variations are active.

use crate::prelude::*;

#[test]
fn pid_dependent_output_with_all_variations_is_unreproducible() {
    let project = Project::empty();
    // -domain_host: see reproducible.rs.
    project
        .reprotest()
        .args(&["printf '%s' \"$$\" > artifact", "artifact", "--variations", "+all,-domain_host"])
        .fails()
        .exit_code(1);
}
