use std::io::Write;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use super::{Flow, Session, Streams};
use crate::complete::candidates::is_executable;
use crate::parse::Input;

/// Status for a command that could not be found.
const NOT_FOUND: i32 = 127;
/// Status for a command that was found but could not be started.
const CANNOT_EXECUTE: i32 = 126;

/// Resolve a command name to a program path.
///
/// Names containing `/` are paths relative to the session directory;
/// bare names are looked up on the search path.
pub fn locate(name: &str, session: &Session) -> Option<PathBuf> {
    if name.contains('/') {
        let path = session.cwd.join(name);
        return is_executable(&path).then_some(path);
    }
    session.path.find(name)
}

/// Spawn `input.command` and wait for it.
pub fn run(input: &Input, session: &Session, mut streams: Streams) -> Flow {
    let Some(program) = locate(&input.command, session) else {
        let (_, mut err) = streams.writers();
        if let Err(e) = writeln!(err, "{}: command not found", input.command) {
            log::warn!("failed to report missing command {}: {e}", input.command);
        }
        return Flow::Continue(NOT_FOUND);
    };

    if log::log_enabled!(log::Level::Debug) {
        let argv = std::iter::once(input.command.as_str())
            .chain(input.args.iter().map(String::as_str));
        let shown = shlex::try_join(argv).unwrap_or_else(|_| input.command.clone());
        log::debug!(
            "spawning {} in {}: {shown}",
            program.display(),
            session.cwd.display()
        );
    }

    let (stdin, stdout, stderr) = streams.into_stdio();
    let status = Command::new(&program)
        .arg0(&input.command)
        .args(&input.args)
        .current_dir(&session.cwd)
        .stdin(stdin)
        .stdout(stdout)
        .stderr(stderr)
        .status();

    match status {
        Ok(status) => Flow::Continue(exit_code(status)),
        Err(e) => {
            eprintln!("{}: {e}", input.command);
            Flow::Continue(CANNOT_EXECUTE)
        }
    }
}

/// Exit code, or 128 + signal number for a signalled child.
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}
