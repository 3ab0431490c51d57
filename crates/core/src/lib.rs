// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! reprotest-core: the variation pipeline and build-plan data model.
//!
//! This crate compiles a declarative variation specification into a
//! sequence of shell-level transformations over a `Build` plan, and renders
//! the result to a POSIX script. It performs no I/O beyond tool-presence
//! lookups, RNG draws, and (for dynamic defaults) reading file metadata
//! under the source tree; it never starts a testbed or runs a build.

pub mod build;
pub mod context;
pub mod dsl;
pub mod env_template;
pub mod error;
pub mod planner;
pub mod variation;

pub use build::Build;
pub use context::BuildContext;
pub use env_template::EnvTemplate;
pub use error::PlanError;
pub use variation::{PlanContext, VariationConfig, VariationSpec, Variations, REGISTRY_ORDER};
