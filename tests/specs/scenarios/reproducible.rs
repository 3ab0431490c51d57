//! E1: a build writing a fixed string, all variations on, reproduces.

use crate::prelude::*;

#[test]
fn fixed_output_with_all_variations_is_reproducible() {
    let project = Project::empty();
    // -domain_host: it mount-binds and re-homes the mount namespace
    // unconditionally once unshare is on PATH, which needs real mount
    // privileges a test runner may not have even as root-in-container.
    project
        .reprotest()
        .args(&["printf 'fixed content\\n' > artifact", "artifact", "--variations", "+all,-domain_host"])
        .passes()
        .exit_code(0);
}
