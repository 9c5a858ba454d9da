use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use super::{Flow, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Echo,
    Exit,
    Pwd,
    Type,
}

impl Builtin {
    /// Every builtin name, sorted.
    pub const NAMES: &[&str] = &["cd", "echo", "exit", "pwd", "type"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cd" => Some(Builtin::Cd),
            "echo" => Some(Builtin::Echo),
            "exit" => Some(Builtin::Exit),
            "pwd" => Some(Builtin::Pwd),
            "type" => Some(Builtin::Type),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Echo => "echo",
            Builtin::Exit => "exit",
            Builtin::Pwd => "pwd",
            Builtin::Type => "type",
        }
    }
}

/// Run a builtin. Only write failures on `out`/`err` are errors; command
/// failures are reported on `err` and reflected in the returned status.
pub fn run(
    builtin: Builtin,
    args: &[String],
    session: &mut Session,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Flow> {
    match builtin {
        Builtin::Cd => cd(args, session, err),
        Builtin::Echo => {
            writeln!(out, "{}", args.join(" "))?;
            Ok(Flow::Continue(0))
        }
        Builtin::Exit => exit(args, err),
        Builtin::Pwd => {
            if !args.is_empty() {
                writeln!(err, "pwd: too many arguments")?;
                return Ok(Flow::Continue(1));
            }
            writeln!(out, "{}", session.cwd.display())?;
            Ok(Flow::Continue(0))
        }
        Builtin::Type => type_of(args, session, out, err),
    }
}

fn exit(args: &[String], err: &mut dyn Write) -> io::Result<Flow> {
    match args {
        [] => Ok(Flow::Exit(0)),
        [code] => match code.parse::<i32>() {
            Ok(code) => Ok(Flow::Exit(code)),
            Err(_) => {
                writeln!(err, "exit: {code}: numeric argument required")?;
                Ok(Flow::Exit(2))
            }
        },
        _ => {
            writeln!(err, "exit: too many arguments")?;
            Ok(Flow::Continue(1))
        }
    }
}

fn cd(args: &[String], session: &mut Session, err: &mut dyn Write) -> io::Result<Flow> {
    let (shown, target) = match args {
        [] => match &session.home {
            Some(home) => (home.display().to_string(), home.clone()),
            None => return Ok(Flow::Continue(0)),
        },
        [dir] => (dir.clone(), resolve_dir(dir, session)),
        _ => {
            writeln!(err, "cd: too many arguments")?;
            return Ok(Flow::Continue(1));
        }
    };

    if !target.exists() {
        writeln!(err, "cd: {shown}: No such file or directory")?;
        return Ok(Flow::Continue(1));
    }
    if !target.is_dir() {
        writeln!(err, "cd: {shown}: Not a directory")?;
        return Ok(Flow::Continue(1));
    }

    log::debug!("cd {} -> {}", session.cwd.display(), target.display());
    session.cwd = target;
    Ok(Flow::Continue(0))
}

/// Expand `~`, anchor relative paths at the session directory, and fold
/// `.` and `..` lexically.
fn resolve_dir(dir: &str, session: &Session) -> PathBuf {
    let home = session.home.as_deref().and_then(Path::to_str);
    let expanded = shellexpand::tilde_with_context(dir, || home);
    normalize(&session.cwd.join(expanded.as_ref()))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn type_of(
    args: &[String],
    session: &Session,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Flow> {
    let mut status = 0;
    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(out, "{name} is a shell builtin")?;
        } else if let Some(path) = session.path.find(name) {
            writeln!(out, "{name} is {}", path.display())?;
        } else {
            writeln!(err, "{name}: not found")?;
            status = 1;
        }
    }
    Ok(Flow::Continue(status))
}
