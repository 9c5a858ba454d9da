//! Raw-mode terminal guard.

use std::io;
use std::os::raw::c_int;

fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn is_terminal(fd: c_int) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

extern "C" fn swallow_signal(_: c_int) {}

/// Catch SIGINT and SIGQUIT with a no-op handler so Ctrl-C and Ctrl-\
/// during a child process don't end the shell. Caught signals revert to
/// their default action across exec.
pub fn catch_job_signals() {
    let handler = swallow_signal as extern "C" fn(c_int) as libc::sighandler_t;
    for signal in [libc::SIGINT, libc::SIGQUIT] {
        unsafe {
            libc::signal(signal, handler);
        }
    }
}

/// Puts a terminal into raw mode and restores the captured settings when
/// dropped, on every exit path.
///
/// Raw mode here means `cfmakeraw`: no line buffering, no echo, no signal
/// keys, and no output post-processing (so `\n` needs an explicit `\r`).
pub struct RawMode {
    fd: c_int,
    original: libc::termios,
    raw: libc::termios,
    active: bool,
}

impl RawMode {
    pub fn enable(fd: c_int) -> io::Result<Self> {
        let original = get_termios(fd)?;
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(fd, &raw)?;
        log::info!("terminal fd {fd} entered raw mode");
        Ok(Self {
            fd,
            original,
            raw,
            active: true,
        })
    }

    /// Restore the original settings until [`RawMode::resume`].
    pub fn suspend(&mut self) -> io::Result<()> {
        if self.active {
            set_termios(self.fd, &self.original)?;
            self.active = false;
        }
        Ok(())
    }

    pub fn resume(&mut self) -> io::Result<()> {
        if !self.active {
            set_termios(self.fd, &self.raw)?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        match set_termios(self.fd, &self.original) {
            Ok(()) => log::info!("terminal fd {} restored", self.fd),
            Err(e) => log::error!("failed to restore terminal fd {}: {e}", self.fd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_terminal_is_rejected() {
        let file = tempfile::tempfile().unwrap();
        let fd = std::os::fd::AsRawFd::as_raw_fd(&file);
        assert!(!is_terminal(fd));
        assert!(RawMode::enable(fd).is_err());
    }
}
