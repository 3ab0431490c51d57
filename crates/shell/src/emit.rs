// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Renders a `Build`'s setup/build/cleanup triple into a single POSIX
//! `sh -ec` script with guaranteed, exactly-once-on-success cleanup.

use crate::ast::{AndList, Command, List};

/// Render the full script. `clean_on_error` controls whether cleanup also
/// runs after a failed build (`--no-clean-on-error` sets this to `false` so
/// a failed testbed can be inspected post-mortem).
///
/// Cleanup runs exactly once on success; at most once on failure, gated by
/// `clean_on_error`. The script's exit code is always the build command's
/// exit code, never cleanup's.
pub fn render_script(
    setup: &AndList,
    build_command: &Command,
    cleanup: &List,
    clean_on_error: bool,
) -> String {
    let mut run_build_body = setup.clone();
    run_build_body.push(build_command.clone());

    let cleanup_list = if cleanup.is_empty() {
        ":".to_string()
    } else {
        cleanup.render()
    };

    let clean_on_error_block = if clean_on_error {
        "  cleanup || echo >&2 \"cleanup failed: $?\"\n"
    } else {
        ""
    };

    format!(
        "run_build() {{ {run_build} }}\n\
         cleanup()   {{ ( __c=0; {cleanup_list} ; exit $__c ) }}\n\
         \n\
         trap 'cleanup' HUP INT QUIT ABRT TERM PIPE\n\
         if run_build; then cleanup; else\n\
         {set_x}{clean_on_error_block}\
         {exit_x}\n\
         fi\n",
        run_build = crate::ast::Subshell::new(run_build_body).render(),
        cleanup_list = cleanup_list,
        set_x = "  __x=$?\n",
        clean_on_error_block = clean_on_error_block,
        exit_x = "  exit $__x",
    )
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
