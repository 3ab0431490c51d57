//! Behavioral specifications for the `reprotest` CLI.
//!
//! These tests are black-box: they invoke the built binary and verify
//! stdout, stderr, and exit codes against the end-to-end scenario table.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// scenarios/
#[path = "specs/scenarios/auto_bisect.rs"]
mod scenarios_auto_bisect;
#[path = "specs/scenarios/harness_error.rs"]
mod scenarios_harness_error;
#[path = "specs/scenarios/locale_difference.rs"]
mod scenarios_locale_difference;
#[path = "specs/scenarios/random_difference.rs"]
mod scenarios_random_difference;
#[path = "specs/scenarios/reproducible.rs"]
mod scenarios_reproducible;
#[path = "specs/scenarios/timezone_masked.rs"]
mod scenarios_timezone_masked;
