// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! reprotest-adapters: testbed driver facade (`§4.6`). A `TestbedAdapter` is
//! the only I/O boundary the orchestrator crosses; this crate provides the
//! trait, a no-sandbox local backend, a generic external-process backend,
//! and backend discovery.

pub mod testbed;

pub use testbed::{
    discover_backends, resolve_backend, ExecKind, ExecOutput, NullTestbedAdapter,
    ProcessTestbedAdapter, TestbedAdapter, TestbedError, BACKEND_PREFIX,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use testbed::{FakeTestbedAdapter, TestbedCall};
