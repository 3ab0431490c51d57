// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auto-bisection (`§4.8`): given a non-reproducible `var_full`, find the
//! minimal subset of variations responsible, in `O(k)` oracle calls instead
//! of the `O(2^k)` brute-force subset search.

use crate::error::OrchestratorError;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use reprotest_core::VariationSpec;

/// Asks whether a named, fully-resolved spec reproduces. Implemented by the
/// orchestrator for real runs, and by a scripted fake in tests.
#[async_trait]
pub trait ReproducibilityOracle {
    async fn is_reproducible(&mut self, name: &str, spec: &VariationSpec) -> Result<bool, OrchestratorError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BisectOutcome {
    /// `true` only when `var_full` itself turned out reproducible (the walk
    /// never needed to run).
    pub reproducible: bool,
    /// Variation names whose full configuration broke reproducibility, in
    /// the order they were found. Empty when the control build itself is
    /// already unreproducible, or when `var_full` reproduces outright.
    pub witnesses: Vec<String>,
}

/// Walk `var_full`'s variation names in random order, growing `current`
/// (starting at the empty control spec) by committing each variation whose
/// full config still reproduces, and recording the rest as witnesses.
pub async fn bisect<O: ReproducibilityOracle>(
    oracle: &mut O,
    var_full: &VariationSpec,
    rng: &mut impl Rng,
) -> Result<BisectOutcome, OrchestratorError> {
    let control = VariationSpec::new();
    if !oracle.is_reproducible("control", &control).await? {
        return Ok(BisectOutcome { reproducible: false, witnesses: Vec::new() });
    }
    if oracle.is_reproducible("full", var_full).await? {
        return Ok(BisectOutcome { reproducible: true, witnesses: Vec::new() });
    }

    let mut names: Vec<String> = var_full.keys().cloned().collect();
    names.shuffle(rng);

    let mut current = control;
    let mut witnesses = Vec::new();
    for name in names {
        let config = var_full.get(&name).expect("name drawn from var_full's own keys").clone();
        let mut candidate = current.clone();
        candidate.insert(name.clone(), config);
        if oracle.is_reproducible(&name, &candidate).await? {
            current = candidate;
        } else {
            witnesses.push(name);
        }
    }
    Ok(BisectOutcome { reproducible: false, witnesses })
}

#[cfg(test)]
#[path = "bisector_tests.rs"]
mod tests;
