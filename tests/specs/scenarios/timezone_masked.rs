//! E5: with every variation on except `timezone`, `$TZ` is pinned the same
//! way for control and experiment, so the build still reproduces.

use crate::prelude::*;

#[test]
fn tz_dependent_output_with_timezone_disabled_is_reproducible() {
    let project = Project::empty();
    // -domain_host: see reproducible.rs.
    project
        .reprotest()
        .args(&["printf '%s' \"$TZ\" > artifact", "artifact", "--variations", "+all,-timezone,-domain_host"])
        .passes()
        .exit_code(0);
}
