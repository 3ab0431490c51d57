// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The variation specification DSL (`§4.4`): a small token language for
//! building a [`VariationSpec`] from a user-supplied string.
//!
//! ```text
//! token   := prefix? name ( "." field op value )?
//! prefix  := "+" | "-" | "@"        // add / remove / set
//! op      := "=" | "+=" | "-="      // replace / extend / subtract
//! ```
//!
//! Tokens are comma- or whitespace-separated. `+name` enables a variation at
//! its default configuration (idempotent: enabling twice doesn't clobber an
//! already-edited entry). `-name` disables it. `@name` resets it to default
//! regardless of any prior edits. `all` is an alias that expands to every
//! registered name in [`REGISTRY_ORDER`].

use crate::env_template::EnvTemplate;
use crate::error::PlanError;
use crate::variation::{VariationConfig, VariationSpec, REGISTRY_ORDER};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DslOp {
    Replace,
    Extend,
    Subtract,
}

impl std::fmt::Display for DslOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DslOp::Replace => "=",
            DslOp::Extend => "+=",
            DslOp::Subtract => "-=",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DslToken {
    Add(String),
    Remove(String),
    Reset(String),
    Field { name: String, field: String, op: DslOp, value: String },
}

/// Parse a full specification string into a [`VariationSpec`], applying
/// tokens left to right onto an initially-empty spec.
pub fn parse_spec(input: &str) -> Result<VariationSpec, PlanError> {
    let mut spec = VariationSpec::new();
    apply_spec_str(&mut spec, input)?;
    Ok(spec)
}

/// Apply a specification string's tokens left to right onto an existing
/// spec (`--vary`'s accumulating form, as opposed to `--variations`'s
/// from-scratch one).
pub fn apply_spec_str(spec: &mut VariationSpec, input: &str) -> Result<(), PlanError> {
    for raw in input.split([',', ' ', '\t', '\n']).filter(|t| !t.is_empty()) {
        apply_token(spec, parse_token(raw)?)?;
    }
    Ok(())
}

fn apply_token(spec: &mut VariationSpec, token: DslToken) -> Result<(), PlanError> {
    match token {
        DslToken::Add(name) if name == "all" => {
            for &n in REGISTRY_ORDER {
                add_default(spec, n)?;
            }
            Ok(())
        }
        DslToken::Add(name) => add_default(spec, &name),
        DslToken::Remove(name) if name == "all" => {
            spec.clear();
            Ok(())
        }
        DslToken::Remove(name) => {
            validate_name(&name)?;
            spec.shift_remove(&name);
            Ok(())
        }
        DslToken::Reset(name) if name == "all" => {
            for &n in REGISTRY_ORDER {
                reset_default(spec, n)?;
            }
            Ok(())
        }
        DslToken::Reset(name) => reset_default(spec, &name),
        DslToken::Field { name, field, op, value } => apply_field_edit(spec, &name, &field, op, &value),
    }
}

fn validate_name(name: &str) -> Result<(), PlanError> {
    if REGISTRY_ORDER.contains(&name) {
        Ok(())
    } else {
        Err(PlanError::UnknownVariation(name.to_string()))
    }
}

/// `+name`: idempotent — leaves an already-present entry untouched.
fn add_default(spec: &mut VariationSpec, name: &str) -> Result<(), PlanError> {
    validate_name(name)?;
    if !spec.contains_key(name) {
        let default = VariationConfig::default_for(name).ok_or_else(|| PlanError::UnknownVariation(name.to_string()))?;
        spec.insert(name.to_string(), default);
    }
    Ok(())
}

/// `@name`: unconditionally replaces whatever is there with the default.
fn reset_default(spec: &mut VariationSpec, name: &str) -> Result<(), PlanError> {
    validate_name(name)?;
    let default = VariationConfig::default_for(name).ok_or_else(|| PlanError::UnknownVariation(name.to_string()))?;
    spec.insert(name.to_string(), default);
    Ok(())
}

fn apply_field_edit(spec: &mut VariationSpec, name: &str, field: &str, op: DslOp, value: &str) -> Result<(), PlanError> {
    validate_name(name)?;
    let entry = spec.entry(name.to_string()).or_insert_with(|| {
        VariationConfig::default_for(name).expect("validated by validate_name above")
    });
    let unsupported = |op: DslOp| {
        PlanError::UnsupportedFieldOp {
            variation: name.to_string(),
            field: field.to_string(),
            op: op.to_string(),
        }
    };
    match (entry, field, op) {
        (VariationConfig::Environment(set), "env", DslOp::Extend) => {
            let tmpl = EnvTemplate::from_str(value).map_err(|_| PlanError::MalformedToken(value.to_string()))?;
            set.insert(tmpl);
            Ok(())
        }
        (VariationConfig::Environment(set), "env", DslOp::Subtract) => {
            let tmpl = EnvTemplate::from_str(value).map_err(|_| PlanError::MalformedToken(value.to_string()))?;
            set.shift_remove(&tmpl);
            Ok(())
        }
        (VariationConfig::UserGroup(set), "available", DslOp::Extend) => {
            set.insert(value.to_string());
            Ok(())
        }
        (VariationConfig::UserGroup(set), "available", DslOp::Subtract) => {
            set.shift_remove(value);
            Ok(())
        }
        (VariationConfig::DomainHost { use_sudo }, "use_sudo", DslOp::Replace) => {
            *use_sudo = parse_bool(value)?;
            Ok(())
        }
        (VariationConfig::Time { faketimes, .. }, "faketimes", DslOp::Extend) => {
            faketimes.insert(value.to_string());
            Ok(())
        }
        (VariationConfig::Time { faketimes, .. }, "faketimes", DslOp::Subtract) => {
            faketimes.shift_remove(value);
            Ok(())
        }
        (VariationConfig::Time { auto_faketimes, .. }, "auto_faketimes", DslOp::Extend) => {
            auto_faketimes.insert(value.to_string());
            Ok(())
        }
        (VariationConfig::Time { auto_faketimes, .. }, "auto_faketimes", DslOp::Subtract) => {
            auto_faketimes.shift_remove(value);
            Ok(())
        }
        (_, _, op) => Err(unsupported(op)),
    }
}

fn parse_bool(value: &str) -> Result<bool, PlanError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(PlanError::MalformedToken(other.to_string())),
    }
}

fn parse_token(raw: &str) -> Result<DslToken, PlanError> {
    let mut chars = raw.char_indices();
    let prefix = match chars.clone().next() {
        Some((_, '+')) | Some((_, '-')) | Some((_, '@')) => {
            let (_, c) = chars.next().expect("peeked above");
            Some(c)
        }
        _ => None,
    };
    let rest = &raw[prefix.map_or(0, char::len_utf8)..];
    if rest.is_empty() {
        return Err(PlanError::MalformedToken(raw.to_string()));
    }

    if let Some(dot_idx) = rest.find('.') {
        let name = &rest[..dot_idx];
        let after_dot = &rest[dot_idx + 1..];
        let (op_idx, op, op_len) = find_op(after_dot).ok_or_else(|| PlanError::MalformedToken(raw.to_string()))?;
        let field = &after_dot[..op_idx];
        let value = &after_dot[op_idx + op_len..];
        if name.is_empty() || field.is_empty() {
            return Err(PlanError::MalformedToken(raw.to_string()));
        }
        return Ok(DslToken::Field { name: name.to_string(), field: field.to_string(), op, value: value.to_string() });
    }

    match prefix {
        Some('+') => Ok(DslToken::Add(rest.to_string())),
        Some('-') => Ok(DslToken::Remove(rest.to_string())),
        Some('@') => Ok(DslToken::Reset(rest.to_string())),
        None => Err(PlanError::MalformedToken(raw.to_string())),
        Some(_) => unreachable!("only +, -, @ are recognized prefixes"),
    }
}

/// Finds the first occurrence of `+=`, `-=`, or bare `=`, two-character
/// operators taking priority so `env+=X` isn't misread as field `env+`
/// with op `=`.
fn find_op(s: &str) -> Option<(usize, DslOp, usize)> {
    for (i, _) in s.char_indices() {
        if s[i..].starts_with("+=") {
            return Some((i, DslOp::Extend, 2));
        }
        if s[i..].starts_with("-=") {
            return Some((i, DslOp::Subtract, 2));
        }
        if s[i..].starts_with('=') {
            return Some((i, DslOp::Replace, 1));
        }
    }
    None
}

/// Planning-time dynamic-default resolution (`§4.4`, `§3`): currently just
/// `time.auto_faketimes`'s `SOURCE_DATE_EPOCH` token, resolved to
/// `@<max mtime of any file under source_root>` and folded into
/// `faketimes`. Unrecognized tokens fail the plan.
pub fn apply_dynamic_defaults(spec: &VariationSpec, source_root: &std::path::Path) -> Result<VariationSpec, PlanError> {
    let mut resolved = spec.clone();
    if let Some(VariationConfig::Time { faketimes, auto_faketimes }) = resolved.get_mut("time") {
        if !auto_faketimes.is_empty() {
            let tokens = std::mem::take(auto_faketimes);
            for token in tokens {
                match token.as_str() {
                    "SOURCE_DATE_EPOCH" => {
                        let epoch = max_mtime_epoch(source_root)?;
                        faketimes.insert(format!("@{epoch}"));
                    }
                    other => {
                        return Err(PlanError::UnknownDynamicDefault {
                            variation: "time".to_string(),
                            field: "auto_faketimes".to_string(),
                            token: other.to_string(),
                        })
                    }
                }
            }
        }
    }
    Ok(resolved)
}

fn max_mtime_epoch(source_root: &std::path::Path) -> Result<u64, PlanError> {
    let mut max_epoch = 0u64;
    let mut stack = vec![source_root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| PlanError::Io(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| PlanError::Io(e.to_string()))?;
            let file_type = entry.file_type().map_err(|e| PlanError::Io(e.to_string()))?;
            if file_type.is_dir() {
                stack.push(entry.path());
                continue;
            }
            let metadata = entry.metadata().map_err(|e| PlanError::Io(e.to_string()))?;
            let modified = metadata.modified().map_err(|e| PlanError::Io(e.to_string()))?;
            let epoch = modified
                .duration_since(std::time::UNIX_EPOCH)
                .map_err(|e| PlanError::Io(e.to_string()))?
                .as_secs();
            max_epoch = max_epoch.max(epoch);
        }
    }
    Ok(max_epoch)
}

#[cfg(test)]
#[path = "dsl_tests.rs"]
mod tests;
