//! Command dispatch: builtins run in-process, everything else is spawned.
//!
//! Builtins are a closed enum with one `match`-based dispatch function
//! rather than a trait object per command.

/// `cd`, `echo`, `exit`, `pwd`, `type`.
pub mod builtin;
/// Search-path lookup and child process execution.
pub mod external;
/// Redirect-aware stdin/stdout/stderr for a single command.
pub mod streams;

pub use builtin::Builtin;
pub use streams::Streams;

use std::io::Write;
use std::path::PathBuf;

use crate::complete::PathExecutables;
use crate::parse::Input;

/// Shell state visible to commands.
#[derive(Debug, Clone)]
pub struct Session {
    /// Working directory for builtins, redirects, and child processes.
    /// Tracked here instead of changing the process's own directory.
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub path: PathExecutables,
}

/// What the session loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading; carries the command's exit status.
    Continue(i32),
    /// End the session with this status.
    Exit(i32),
}

/// Run a parsed command with its redirects applied.
pub fn execute(input: &Input, session: &mut Session) -> Flow {
    let mut streams = match Streams::open(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("keysh: {e}");
            return Flow::Continue(1);
        }
    };

    match Builtin::from_name(&input.command) {
        Some(builtin) => {
            let (mut out, mut err) = streams.writers();
            builtin::run(builtin, &input.args, session, &mut out, &mut err)
                .and_then(|flow| {
                    out.flush()?;
                    err.flush()?;
                    Ok(flow)
                })
                .unwrap_or_else(|e| {
                    log::warn!("{} failed to write output: {e}", builtin.name());
                    Flow::Continue(1)
                })
        }
        None => external::run(input, session, streams),
    }
}
