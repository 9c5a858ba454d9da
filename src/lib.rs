//! keysh: an interactive shell with its own raw-mode line editor.
//!
//! Keystrokes are read one byte at a time from a terminal in raw mode,
//! edited and echoed by [`input::LineReader`], then tokenized into an
//! [`parse::Input`] (command, arguments, redirects) honoring POSIX-style
//! quoting and escaping. One command per line.
//!
//! # Architecture
//!
//! - **[`parse`]** — Tokenizer, redirect operator recognition, and redirect target resolution.
//! - **[`complete`]** — Tab completion engine and candidate name sources.
//! - **[`input`]** — Raw byte reader, UTF-8 byte classification, terminal raw-mode guard.
//! - **[`commands`]** — Builtins, external program execution, redirect streams.
//! - **[`shell`]** — The read-parse-execute session loop.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — File logging via `simplelog`.

/// Builtins, external commands, and redirect-aware output streams.
pub mod commands;
/// Completion engine and candidate sources (builtins, PATH executables).
pub mod complete;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error types for redirects, line reading, and the session loop.
pub mod error;
/// Raw-mode line editing.
pub mod input;
/// File logger setup.
pub mod logging;
/// Line tokenizer, redirect types, and redirect resolution.
pub mod parse;
/// Session loop.
pub mod shell;

pub use complete::{complete, CompletionOutcome};
pub use input::LineReader;
pub use parse::{EagerCreate, Input};

