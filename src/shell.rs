//! The read-parse-execute loop.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::commands::{self, Flow, Session};
use crate::complete::{Builtins, Candidates, PathExecutables};
use crate::config::Config;
use crate::error::{AbortReason, ReadError, ShellError};
use crate::input::LineReader;
use crate::input::terminal::{self, RawMode};
use crate::parse::{EagerCreate, Input};

/// Exit status after Ctrl-C.
const INTERRUPTED: i32 = 130;

pub struct Shell {
    prompt: String,
    session: Session,
    candidates: Candidates,
}

impl Shell {
    /// Build a shell rooted at the process's current directory.
    pub fn new(config: &Config) -> io::Result<Self> {
        let extra: Vec<PathBuf> = config
            .completion
            .extra_dirs
            .iter()
            .map(|d| PathBuf::from(shellexpand::tilde(d).as_ref()))
            .collect();
        let session = Session {
            cwd: std::env::current_dir()?,
            home: std::env::var_os("HOME").map(PathBuf::from),
            path: PathExecutables::from_env(&extra),
        };
        Ok(Self::with_session(config, session))
    }

    pub fn with_session(config: &Config, session: Session) -> Self {
        let mut candidates = Candidates::new().with(Builtins);
        if config.completion.executables {
            candidates = candidates.with(session.path.clone());
        }
        Self {
            prompt: config.prompt.text.clone(),
            session,
            candidates,
        }
    }

    /// Parse and execute one line. Blank lines do nothing.
    pub fn run_line(&mut self, line: &str) -> Flow {
        let resolver = EagerCreate::new(&self.session.cwd);
        let (input, errors) = Input::parse(line, &resolver);
        for e in &errors {
            eprintln!("keysh: {e}");
        }
        let Some(input) = input else {
            return Flow::Continue(0);
        };

        log::debug!(
            "parsed {:?}: {} arg(s), redirects {:?}",
            input.command,
            input.args.len(),
            input.redirects.keys().map(|k| k.as_str()).collect::<Vec<_>>()
        );
        commands::execute(&input, &mut self.session)
    }

    /// Run until `exit`, Ctrl-C, Ctrl-D, or end of input, and return the
    /// process exit status.
    ///
    /// On a terminal this drives raw-mode line editing; otherwise lines are
    /// read from stdin without prompt or echo.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        log::info!("session started in {}", self.session.cwd.display());
        let status = if terminal::is_terminal(libc::STDIN_FILENO) {
            self.run_interactive()
        } else {
            self.run_batch()
        };
        log::info!("session ended: {status:?}");
        status
    }

    fn run_interactive(&mut self) -> Result<i32, ShellError> {
        let mut raw = RawMode::enable(libc::STDIN_FILENO).map_err(ShellError::Terminal)?;
        terminal::catch_job_signals();
        let mut stdin = io::stdin().lock();
        let mut stdout = io::stdout();
        let prompt = self.prompt.clone();

        loop {
            write!(stdout, "{prompt}")?;
            stdout.flush()?;

            let line = LineReader::new(&mut stdin, &mut stdout, &prompt, &self.candidates)
                .read_line();
            let line = match line {
                Ok(line) => line,
                Err(ReadError::Abort(reason)) => {
                    stdout.write_all(b"\r\n")?;
                    stdout.flush()?;
                    return Ok(abort_status(reason));
                }
                Err(ReadError::Io(e)) => return Err(e.into()),
            };
            stdout.write_all(b"\r\n")?;
            stdout.flush()?;

            // Commands see a cooked terminal
            raw.suspend().map_err(ShellError::Terminal)?;
            let flow = self.run_line(&line);
            raw.resume().map_err(ShellError::Terminal)?;

            if let Flow::Exit(code) = flow {
                return Ok(code);
            }
        }
    }

    fn run_batch(&mut self) -> Result<i32, ShellError> {
        let mut stdin = io::stdin().lock();
        loop {
            let line = LineReader::new(&mut stdin, io::sink(), "", &self.candidates)
                .without_completion()
                .read_line();
            let line = match line {
                Ok(line) => line,
                Err(ReadError::Abort(reason)) => return Ok(abort_status(reason)),
                Err(ReadError::Io(e)) => return Err(e.into()),
            };
            if let Flow::Exit(code) = self.run_line(&line) {
                return Ok(code);
            }
        }
    }
}

fn abort_status(reason: AbortReason) -> i32 {
    match reason {
        AbortReason::Interrupt => INTERRUPTED,
        AbortReason::EndOfInput => 0,
    }
}
