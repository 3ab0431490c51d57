// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Minimal shell AST, POSIX script emitter, and glob sanitizer.
//!
//! This crate does not parse arbitrary shell syntax. It provides just enough
//! structure to let callers *build* a `sh -ec` script programmatically —
//! composing wrapper commands around a build line, appending setup/cleanup
//! steps, and rendering the guaranteed-rollback script skeleton — plus a
//! sanitizer that accepts only the glob-and-quoted-literal subset of shell
//! syntax for untrusted artifact/source patterns.
//!
//! # AST Structure
//!
//! ```text
//! Command        prefix words + name + suffix words, rendered as one word list
//! AndList        Command && Command && ...
//! List           Command ; Command ; ...   (each captures its exit status)
//! Subshell       ( AndList )
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use reprotest_shell::{ast::{AndList, Command, List, Word}, emit};
//!
//! let build = Command::new(Word::raw("sh")).arg(Word::raw("-ec")).arg(Word::literal("make"));
//! let script = emit::render_script(&AndList::default(), &build, &List::default(), true);
//! ```

mod error;
pub mod ast;
pub mod emit;
pub mod sanitize;

pub use ast::{AndList, Command, List, Subshell, Word};
pub use error::SanitizeError;
pub use sanitize::{sanitize, SanitizeOutput};
