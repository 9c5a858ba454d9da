//! Types produced by the tokenizer and consumed by the command dispatcher.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Which stream a redirect applies to, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RedirectKind {
    /// `0>`: stdin read from the target
    StdinRead,
    /// `0>>`: accepted for compatibility, ignored at execution
    StdinReadAppend,
    /// `>` / `1>`: stdout, truncating
    StdoutWrite,
    /// `>>` / `1>>`: stdout, appending
    StdoutAppend,
    /// `2>`: stderr, truncating
    StderrWrite,
    /// `2>>`: stderr, appending
    StderrAppend,
}

impl RedirectKind {
    /// Map an operator such as `2>>` or `>` to its kind.
    ///
    /// Unrecognized operators fall back to [`RedirectKind::StdoutWrite`].
    pub fn from_operator(operator: &str) -> Self {
        match operator {
            "0>" => RedirectKind::StdinRead,
            "0>>" => RedirectKind::StdinReadAppend,
            ">" | "1>" => RedirectKind::StdoutWrite,
            ">>" | "1>>" => RedirectKind::StdoutAppend,
            "2>" => RedirectKind::StderrWrite,
            "2>>" => RedirectKind::StderrAppend,
            _ => RedirectKind::StdoutWrite,
        }
    }

    /// Canonical operator syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectKind::StdinRead => "0>",
            RedirectKind::StdinReadAppend => "0>>",
            RedirectKind::StdoutWrite => "1>",
            RedirectKind::StdoutAppend => "1>>",
            RedirectKind::StderrWrite => "2>",
            RedirectKind::StderrAppend => "2>>",
        }
    }

    pub fn mode(self) -> RedirectMode {
        match self {
            RedirectKind::StdinRead | RedirectKind::StdoutWrite | RedirectKind::StderrWrite => {
                RedirectMode::Truncate
            }
            RedirectKind::StdinReadAppend
            | RedirectKind::StdoutAppend
            | RedirectKind::StderrAppend => RedirectMode::Append,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

/// A resolved redirect: the parent directory existed when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: PathBuf,
    pub mode: RedirectMode,
}

/// One word of a line, as split by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    /// Command name or argument, with quotes and escapes already removed.
    Arg(String),
    /// A recognized redirect operator and the word that followed it.
    /// `target` is empty when the line ended right after the operator.
    Redirect {
        operator: String,
        kind: RedirectKind,
        target: String,
    },
}

/// A parsed command line: one command, its arguments, and its redirects.
///
/// At most one target per [`RedirectKind`]; a later redirect of the same
/// kind replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub command: String,
    pub args: Vec<String>,
    pub redirects: BTreeMap<RedirectKind, RedirectTarget>,
}

impl Input {
    /// Target for a stream, preferring the append form when both were given.
    pub fn redirect_for(
        &self,
        write: RedirectKind,
        append: RedirectKind,
    ) -> Option<&RedirectTarget> {
        self.redirects
            .get(&append)
            .or_else(|| self.redirects.get(&write))
    }
}
