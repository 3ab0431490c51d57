// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variation templates: `NAME` (capture the ambient value),
//! `NAME=VALUE` (set), `NAME=` (unset).

/// One `environment` variation entry, in its three recognized shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnvTemplate {
    /// `NAME` — capture the testbed's ambient value for `NAME` and re-assert
    /// it explicitly, pinning it against whatever the testbed backend would
    /// otherwise inherit.
    Capture(String),
    /// `NAME=VALUE` — set `NAME` to `VALUE`.
    Set(String, String),
    /// `NAME=` — unset `NAME`.
    Unset(String),
}

impl EnvTemplate {
    pub fn name(&self) -> &str {
        match self {
            EnvTemplate::Capture(n) | EnvTemplate::Set(n, _) | EnvTemplate::Unset(n) => n,
        }
    }
}

impl std::str::FromStr for EnvTemplate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            None => Ok(EnvTemplate::Capture(s.to_string())),
            Some((name, "")) => Ok(EnvTemplate::Unset(name.to_string())),
            Some((name, value)) => Ok(EnvTemplate::Set(name.to_string(), value.to_string())),
        }
    }
}

impl std::fmt::Display for EnvTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvTemplate::Capture(n) => write!(f, "{n}"),
            EnvTemplate::Set(n, v) => write!(f, "{n}={v}"),
            EnvTemplate::Unset(n) => write!(f, "{n}="),
        }
    }
}

#[cfg(test)]
#[path = "env_template_tests.rs"]
mod tests;
