//! Error types shared across the parse, input, and session layers.

use std::io;
use std::path::PathBuf;

/// A redirect that could not be materialized. Never fatal: the redirect is
/// dropped and the command still runs.
#[derive(Debug, thiserror::Error)]
pub enum RedirectError {
    #[error("no such file or directory: {}", .0.display())]
    NoSuchDirectory(PathBuf),

    #[error("couldn't create the file to redirect to: {}", .path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("syntax error: missing redirect target after '{0}'")]
    MissingTarget(String),
}

/// Why the user ended the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Ctrl-C.
    Interrupt,
    /// Ctrl-D or end of the input stream.
    EndOfInput,
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("input aborted ({0:?})")]
    Abort(AbortReason),

    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("terminal setup failed: {0}")]
    Terminal(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
