// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The variation data model: per-variation configuration shapes, the
//! `VariationSpec` map, the `Variations` sequence, and the planning context
//! shared across all transforms.

pub mod registry;
pub mod transforms;

use crate::env_template::EnvTemplate;
use indexmap::{IndexMap, IndexSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;

/// The canonical, fixed registry order (`§4.3`). The planner and the DSL's
/// `all` alias both iterate this slice; nothing else is authoritative for
/// ordering.
pub const REGISTRY_ORDER: &[&str] = &[
    "environment",
    "build_path",
    "user_group",
    "fileordering",
    "domain_host",
    "home",
    "kernel",
    "locales",
    "exec_path",
    "time",
    "timezone",
    "umask",
];

/// Per-variation configuration value. The shape is fixed per variation name
/// (`§3`); the DSL and planner both dispatch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariationConfig {
    Environment(IndexSet<EnvTemplate>),
    BuildPath(bool),
    UserGroup(IndexSet<String>),
    FileOrdering(bool),
    DomainHost { use_sudo: bool },
    Home(bool),
    Kernel(bool),
    Locales(bool),
    ExecPath(bool),
    Time {
        faketimes: IndexSet<String>,
        auto_faketimes: IndexSet<String>,
    },
    Timezone(bool),
    Umask(bool),
}

impl VariationConfig {
    /// The default configuration a bare `+name` or `@name` token resolves
    /// to. Boolean-shaped variations default to `true` (simply "on"); the
    /// set-shaped ones (`environment`, `user_group`, `time`) default to
    /// empty, `+=` tokens being the documented way to populate them.
    pub fn default_for(name: &str) -> Option<Self> {
        Some(match name {
            "environment" => VariationConfig::Environment(IndexSet::new()),
            "build_path" => VariationConfig::BuildPath(true),
            "user_group" => VariationConfig::UserGroup(IndexSet::new()),
            "fileordering" => VariationConfig::FileOrdering(true),
            "domain_host" => VariationConfig::DomainHost { use_sudo: true },
            "home" => VariationConfig::Home(true),
            "kernel" => VariationConfig::Kernel(true),
            "locales" => VariationConfig::Locales(true),
            "exec_path" => VariationConfig::ExecPath(true),
            "time" => VariationConfig::Time {
                faketimes: IndexSet::new(),
                auto_faketimes: IndexSet::from_iter(["SOURCE_DATE_EPOCH".to_string()]),
            },
            "timezone" => VariationConfig::Timezone(true),
            "umask" => VariationConfig::Umask(true),
            _ => return None,
        })
    }
}

/// A mapping from variation name to configuration. Absence of a key means
/// the variation is disabled (planned with `vary=false`).
pub type VariationSpec = IndexMap<String, VariationConfig>;

/// One `(VariationSpec, verbosity)` pair; index 0 in a [`Variations`]
/// sequence is always the control (empty spec).
pub type NamedVariation = (String, VariationSpec, u8);

/// An ordered collection of builds to run: the control followed by zero or
/// more experiments.
#[derive(Debug, Clone, Default)]
pub struct Variations(pub Vec<NamedVariation>);

impl Variations {
    pub fn control_only() -> Self {
        Variations(vec![("control".to_string(), VariationSpec::new(), 0)])
    }

    pub fn push(&mut self, name: impl Into<String>, spec: VariationSpec, verbosity: u8) {
        self.0.push((name.into(), spec, verbosity));
    }
}

/// Shared, read-only context passed to every transform: where the source
/// tree lives, which optional tools are present, and a seeded RNG for the
/// transforms that make a bounded random choice (`user_group`, `locales`,
/// `time`). The RNG is behind a `RefCell` because transforms take `&self`
/// (they don't own the context) but still need to advance the stream.
pub struct PlanContext {
    pub source_root: PathBuf,
    /// `user:group` (or bare `user`) the testbed is currently running as,
    /// if known; `user_group` excludes this from its random choice.
    pub current_user_group: Option<String>,
    available_tools: HashSet<String>,
    rng: RefCell<StdRng>,
}

impl PlanContext {
    pub fn new(source_root: PathBuf, available_tools: HashSet<String>, seed: u64) -> Self {
        PlanContext {
            source_root,
            current_user_group: None,
            available_tools,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn with_current_user_group(mut self, current: impl Into<String>) -> Self {
        self.current_user_group = Some(current.into());
        self
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.available_tools.contains(name)
    }

    pub fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        f(&mut self.rng.borrow_mut())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
