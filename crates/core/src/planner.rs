// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The build planner (`§4.5`): applies a [`VariationSpec`] against a base
//! [`Build`] in the registry's fixed, declared order.

use crate::build::Build;
use crate::error::PlanError;
use crate::variation::registry::REGISTRY;
use crate::variation::{PlanContext, VariationSpec};
use tracing::debug;

/// Plan a single build: run every registered transform over `base`, in
/// registry order, passing `vary = name ∈ spec` and that variation's
/// configuration (or its default, for transforms not present in `spec`).
///
/// Pure given `ctx`'s RNG state: the same `(ctx, base, spec)` triple always
/// produces the same script, modulo whatever random choice a transform's own
/// RNG draw makes (`user_group`, `locales`, `time`).
pub fn plan(ctx: &PlanContext, base: Build, spec: &VariationSpec) -> Result<Build, PlanError> {
    let mut build = base;
    for &(name, transform) in REGISTRY {
        let vary = spec.contains_key(name);
        let config = match spec.get(name) {
            Some(config) => config.clone(),
            None => crate::variation::VariationConfig::default_for(name)
                .ok_or_else(|| PlanError::UnknownVariation(name.to_string()))?,
        };
        debug!(variation = name, vary, "applying variation transform");
        build = transform(ctx, build, vary, &config)?;
    }
    Ok(build)
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
