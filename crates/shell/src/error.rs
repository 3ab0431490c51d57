// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sanitizer error type.

use thiserror::Error;

/// A pattern failed the glob sanitizer.
///
/// This is the only error surface between untrusted, user-supplied patterns
/// (artifact pattern, source pattern) and the generated `sh -ec` script. It
/// is fatal wherever it occurs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    /// The pattern contained a POSIX special character outside of a quoted
    /// span: one of `| & ; < > ( ) $` or a backtick.
    #[error("not a shell-glob pattern: {0:?} (unquoted special character {1:?})")]
    SpecialCharacter(String, char),

    /// A double-quoted span contained `$` or a backtick.
    #[error("not a shell-glob pattern: {0:?} (`$` or backtick inside double quotes)")]
    SubstitutionInDoubleQuotes(String),

    /// The pattern ended with an open quote or a trailing, unconsumed
    /// backslash escape.
    #[error("unclosed escape or quote: {0:?}")]
    Unclosed(String),
}
