// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command / and-list / list / subshell AST.
//!
//! Nodes are built, not parsed: every [`Word`] a caller hands to [`Command`]
//! is either already known to be a safe shell atom ([`Word::raw`]) or is a
//! string to be single-quoted ([`Word::literal`]) so its contents can never
//! be reinterpreted by the shell.

/// A single shell word.
///
/// `raw` words are emitted verbatim (variable references, flags, wrapper
/// command names); `literal` words are single-quoted so arbitrary content
/// — including another user's filenames or command lines — round-trips
/// through `sh -ec` as inert text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word(String);

impl Word {
    /// A word emitted exactly as given: a flag, a variable reference, a
    /// wrapper command name. The caller is responsible for its safety.
    pub fn raw(s: impl Into<String>) -> Self {
        Word(s.into())
    }

    /// A word whose contents are single-quoted so the shell treats it as an
    /// inert literal, regardless of what it contains.
    pub fn literal(s: impl AsRef<str>) -> Self {
        Word(single_quote(s.as_ref()))
    }

    /// An `NAME=value` environment assignment word, with `value` single-quoted.
    pub fn assignment(name: &str, value: impl AsRef<str>) -> Self {
        Word(format!("{name}={}", single_quote(value.as_ref())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single-quote `s` for POSIX `sh`, escaping embedded single quotes as
/// `'\''` (close quote, escaped quote, reopen quote).
fn single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// A command: an ordered sequence of words. The first word is conventionally
/// the program name; earlier words may be environment assignments or wrapper
/// commands prepended by [`Command::wrap`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    words: Vec<Word>,
}

impl Command {
    pub fn new(name: Word) -> Self {
        Command { words: vec![name] }
    }

    /// Append a trailing word (an argument).
    pub fn arg(mut self, w: Word) -> Self {
        self.words.push(w);
        self
    }

    /// Append trailing words.
    pub fn args(mut self, ws: impl IntoIterator<Item = Word>) -> Self {
        self.words.extend(ws);
        self
    }

    /// Prepend words in front of everything already present: wrapping this
    /// command in another (`sudo`, `linux64 --uname-2.6`, `faketime <spec>`,
    /// an `NAME=value` environment assignment, ...). Repeated calls nest:
    /// the most recently prepended wrapper becomes the outermost one.
    pub fn wrap(mut self, prefix: impl IntoIterator<Item = Word>) -> Self {
        let mut words: Vec<Word> = prefix.into_iter().collect();
        words.append(&mut self.words);
        self.words = words;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Render as a single shell word list, space-separated.
    pub fn render(&self) -> String {
        self.words
            .iter()
            .map(Word::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `cmd1 && cmd2 && ...`. Short-circuits on the first non-zero exit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AndList(Vec<Command>);

impl AndList {
    pub fn new() -> Self {
        AndList(Vec::new())
    }

    pub fn push(&mut self, cmd: Command) {
        self.0.push(cmd);
    }

    /// Insert a command at the front, so it runs before everything already
    /// present (used by transforms documented as "prepend ... to setup").
    pub fn push_front(&mut self, cmd: Command) {
        self.0.insert(0, cmd);
    }

    pub fn then(mut self, cmd: Command) -> Self {
        self.0.push(cmd);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.0.iter()
    }

    pub fn render(&self) -> String {
        if self.0.is_empty() {
            return "true".to_string();
        }
        self.0
            .iter()
            .map(Command::render)
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

/// `cmd1 ; cmd2 ; ...`, each unconditionally executed, each capturing its
/// exit status into a shared `$__c` so that a later failure does not mask an
/// earlier one and vice versa — used for `cleanup`, where every step must
/// run regardless of whether an earlier cleanup step failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct List(Vec<Command>);

impl List {
    pub fn new() -> Self {
        List(Vec::new())
    }

    /// Prepend a command (used to build cleanup in LIFO order relative to
    /// the setup commands it undoes).
    pub fn push_front(&mut self, cmd: Command) {
        self.0.insert(0, cmd);
    }

    pub fn push_back(&mut self, cmd: Command) {
        self.0.push(cmd);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.0.iter()
    }

    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|c| format!("{} || __c=$?", c.render()))
            .collect::<Vec<_>>()
            .join(" ; ")
    }
}

/// `( and_list )`. Isolates `cd`, `umask`, and exports from the surrounding
/// script so e.g. entering a mount point during setup cannot block the
/// unmount in cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subshell(AndList);

impl Subshell {
    pub fn new(inner: AndList) -> Self {
        Subshell(inner)
    }

    pub fn render(&self) -> String {
        format!("( {} )", self.0.render())
    }
}

#[cfg(test)]
#[path = "ast_tests.rs"]
mod tests;
