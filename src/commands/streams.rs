use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::process::Stdio;

use crate::parse::{Input, RedirectKind, RedirectMode, RedirectTarget};

/// Files opened for a command's redirects. `None` means inherit.
#[derive(Debug, Default)]
pub struct Streams {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
    pub stderr: Option<File>,
}

impl Streams {
    /// Open every redirect on `input`. Write targets are truncated or
    /// appended to here, at execution time.
    pub fn open(input: &Input) -> io::Result<Self> {
        let stdin = input
            .redirects
            .get(&RedirectKind::StdinRead)
            .map(|t| File::open(&t.path).map_err(|e| annotate(t, e)))
            .transpose()?;
        let stdout = input
            .redirect_for(RedirectKind::StdoutWrite, RedirectKind::StdoutAppend)
            .map(open_write)
            .transpose()?;
        let stderr = input
            .redirect_for(RedirectKind::StderrWrite, RedirectKind::StderrAppend)
            .map(open_write)
            .transpose()?;

        Ok(Self {
            stdin,
            stdout,
            stderr,
        })
    }

    /// Writers for a builtin: the redirect file or the shell's own stream.
    pub fn writers(&mut self) -> (Box<dyn Write + '_>, Box<dyn Write + '_>) {
        let out: Box<dyn Write + '_> = match &mut self.stdout {
            Some(f) => Box::new(f),
            None => Box::new(io::stdout()),
        };
        let err: Box<dyn Write + '_> = match &mut self.stderr {
            Some(f) => Box::new(f),
            None => Box::new(io::stderr()),
        };
        (out, err)
    }

    /// Child process stdio, in stdin/stdout/stderr order.
    pub fn into_stdio(self) -> (Stdio, Stdio, Stdio) {
        (
            self.stdin.map_or_else(Stdio::inherit, Stdio::from),
            self.stdout.map_or_else(Stdio::inherit, Stdio::from),
            self.stderr.map_or_else(Stdio::inherit, Stdio::from),
        )
    }
}

fn open_write(target: &RedirectTarget) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match target.mode {
        RedirectMode::Truncate => options.write(true).truncate(true),
        RedirectMode::Append => options.append(true),
    };
    options.open(&target.path).map_err(|e| annotate(target, e))
}

fn annotate(target: &RedirectTarget, e: io::Error) -> io::Error {
    io::Error::new(e.kind(), format!("{}: {e}", target.path.display()))
}
