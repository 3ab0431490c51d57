// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan-time errors: everything the planner/DSL can reject before a testbed
//! is ever started.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("unknown variation {0:?}")]
    UnknownVariation(String),

    #[error("unknown dynamic-default token {token:?} for {variation}.{field}")]
    UnknownDynamicDefault {
        variation: String,
        field: String,
        token: String,
    },

    #[error("malformed variation token {0:?}")]
    MalformedToken(String),

    #[error("{variation}.{field} does not accept the {op} operator")]
    UnsupportedFieldOp {
        variation: String,
        field: String,
        op: String,
    },

    #[error("conflicting variations: {0}")]
    Conflict(String),

    #[error("I/O error resolving a dynamic default: {0}")]
    Io(String),
}
