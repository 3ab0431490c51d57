// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fixed, ordered variation registry (`§4.3`). Order matters: wrappers
//! compose from the inside out around `build_command`, so the *first*
//! entry here is the innermost wrapper and the *last* is outermost.

use super::transforms;
use super::{PlanContext, VariationConfig};
use crate::build::Build;
use crate::error::PlanError;

pub type TransformFn = fn(&PlanContext, Build, bool, &VariationConfig) -> Result<Build, PlanError>;

/// `(name, transform)` pairs in the canonical order from [`super::REGISTRY_ORDER`].
pub const REGISTRY: &[(&str, TransformFn)] = &[
    ("environment", transforms::environment),
    ("build_path", transforms::build_path),
    ("user_group", transforms::user_group),
    ("fileordering", transforms::fileordering),
    ("domain_host", transforms::domain_host),
    ("home", transforms::home),
    ("kernel", transforms::kernel),
    ("locales", transforms::locales),
    ("exec_path", transforms::exec_path),
    ("time", transforms::time),
    ("timezone", transforms::timezone),
    ("umask", transforms::umask),
];

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
