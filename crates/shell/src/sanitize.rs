// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Glob sanitizer: the only trust boundary between a user-supplied artifact
//! or source pattern and the generated `sh -ec` script.
//!
//! Accepts a whitespace(-as-plain-space)-separated list of shell globs and
//! quoted literals. Rejects anything that could expand into a substitution,
//! redirection, pipe, or command separator. This is a character-by-character
//! state machine, not a shell parser: the output string is the input string
//! verbatim, just validated and (optionally) word-split with each word
//! prefixed by `./`.

use crate::error::SanitizeError;

const SPECIAL_EXCEPT_QUOTES: &[char] = &['\n', '\t', '|', '&', ';', '<', '>', '(', ')', '$', '`'];
const SPECIAL_IN_DOUBLE_QUOTES: &[char] = &['$', '`'];
const ESCAPED_IN_DOUBLE_QUOTES: &[char] = &['$', '`', '"', '\\', '\n'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOutput {
    /// The validated pattern, reassembled as a single space-joined string.
    pub sanitized: String,
    /// The individual words (still containing their original quoting).
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Validate `input` as glob-and-quoted-literal shell syntax.
///
/// When `force_rel` is set, every resulting word is prefixed with `./` so it
/// cannot be misread as a flag by whatever command consumes it.
pub fn sanitize(input: &str, force_rel: bool) -> Result<SanitizeOutput, SanitizeError> {
    let mut words: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut quote = Quote::None;
    let mut escaped = false;

    macro_rules! next_word {
        () => {
            if let Some(w) = current.take() {
                words.push(w);
            }
        };
    }

    'chars: for c in input.chars() {
        match quote {
            Quote::None => {
                if escaped {
                    escaped = false;
                } else if SPECIAL_EXCEPT_QUOTES.contains(&c) {
                    return Err(SanitizeError::SpecialCharacter(input.to_string(), c));
                } else if c == '\\' {
                    escaped = true;
                } else if c == '\'' {
                    quote = Quote::Single;
                } else if c == '"' {
                    quote = Quote::Double;
                } else if c == ' ' {
                    next_word!();
                    continue 'chars;
                }
            }
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                }
            }
            Quote::Double => {
                if escaped {
                    if !ESCAPED_IN_DOUBLE_QUOTES.contains(&c) {
                        // Per POSIX, the backslash retains its literal meaning
                        // for any char it doesn't actually escape.
                        current.get_or_insert_with(String::new).push('\\');
                    }
                    escaped = false;
                } else if SPECIAL_IN_DOUBLE_QUOTES.contains(&c) {
                    return Err(SanitizeError::SubstitutionInDoubleQuotes(input.to_string()));
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    quote = Quote::None;
                }
            }
        }
        current.get_or_insert_with(String::new).push(c);
    }

    if quote != Quote::None || escaped {
        return Err(SanitizeError::Unclosed(input.to_string()));
    }
    next_word!();

    let words: Vec<String> = if force_rel {
        words.into_iter().map(|w| format!("./{w}")).collect()
    } else {
        words
    };
    let sanitized = words.join(" ");
    Ok(SanitizeOutput { sanitized, words })
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
