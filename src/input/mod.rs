//! Byte-at-a-time line editor for a terminal in raw mode.
//!
//! The reader owns echo: every accepted byte is written back to the output,
//! backspace erases on screen, and newlines are echoed as `\r\n` because raw
//! mode disables output post-processing.

pub mod terminal;
pub mod utf8;

use std::io::{ErrorKind, Read, Write};

use crate::complete::{self, CandidateSource, CompletionOutcome};
use crate::error::{AbortReason, ReadError};

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const BELL: u8 = 0x07;
const TAB: u8 = 0x09;
const LF: u8 = 0x0a;
const CR: u8 = 0x0d;
const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// Per-line editing state; reset for every line.
#[derive(Debug, Default)]
struct LineState {
    buf: String,
    /// The last byte was an unpaired backslash, so a newline continues the line.
    escaped: bool,
    /// Consecutive tab presses.
    tabs: u32,
}

pub struct LineReader<'a, R, W> {
    input: R,
    output: W,
    prompt: &'a str,
    source: &'a dyn CandidateSource,
    /// When off, tab is an ordinary character.
    completion: bool,
}

impl<'a, R: Read, W: Write> LineReader<'a, R, W> {
    pub fn new(input: R, output: W, prompt: &'a str, source: &'a dyn CandidateSource) -> Self {
        Self {
            input,
            output,
            prompt,
            source,
            completion: true,
        }
    }

    /// Insert tabs literally instead of completing. For input with no one
    /// at the keyboard.
    pub fn without_completion(mut self) -> Self {
        self.completion = false;
        self
    }

    /// Read one line, without its terminator.
    ///
    /// Ctrl-C, Ctrl-D, and end of input abort the line; whatever was typed
    /// so far is discarded.
    pub fn read_line(&mut self) -> Result<String, ReadError> {
        let mut state = LineState::default();
        // A byte that ended an escape sequence early and still needs handling
        let mut pending = None;

        loop {
            let byte = match pending.take() {
                Some(byte) => byte,
                None => match self.read_byte()? {
                    Some(byte) => byte,
                    None => return Err(ReadError::Abort(AbortReason::EndOfInput)),
                },
            };

            match byte {
                CTRL_C => return Err(ReadError::Abort(AbortReason::Interrupt)),
                CTRL_D => return Err(ReadError::Abort(AbortReason::EndOfInput)),
                CR | LF if !state.escaped => return Ok(state.buf),
                DEL => self.backspace(&mut state)?,
                TAB if self.completion => self.tab(&mut state)?,
                TAB => self.insert(&mut state, TAB)?,
                ESC => pending = self.skip_escape_sequence()?,
                CR | LF => self.insert(&mut state, byte)?,
                b if b < 0x20 => {}
                b => self.insert(&mut state, b)?,
            }

            if byte != TAB {
                state.tabs = 0;
            }
            self.output.flush()?;
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ReadError> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn next_byte(&mut self) -> Result<u8, ReadError> {
        self.read_byte()?
            .ok_or(ReadError::Abort(AbortReason::EndOfInput))
    }

    fn insert(&mut self, state: &mut LineState, lead: u8) -> Result<(), ReadError> {
        if lead == CR || lead == LF {
            state.buf.push('\n');
            self.output.write_all(b"\r\n")?;
            state.escaped = false;
            return Ok(());
        }

        let mut bytes = vec![lead];
        for _ in 0..utf8::continuation_len(lead) {
            bytes.push(self.next_byte()?);
        }
        let text = String::from_utf8_lossy(&bytes);
        state.buf.push_str(&text);
        self.output.write_all(text.as_bytes())?;

        state.escaped = lead == b'\\' && !state.escaped;
        Ok(())
    }

    fn backspace(&mut self, state: &mut LineState) -> Result<(), ReadError> {
        if state.buf.pop().is_some() {
            self.output.write_all(b"\x08 \x08")?;
        }
        state.escaped = ends_with_escape(&state.buf);
        Ok(())
    }

    fn tab(&mut self, state: &mut LineState) -> Result<(), ReadError> {
        state.tabs += 1;

        let prefix = state
            .buf
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .to_string();
        if prefix.is_empty() {
            return self.bell();
        }

        let outcome = complete::complete(&prefix, self.source.candidates(&prefix));
        log::trace!("completion for {prefix:?}: {outcome:?}");

        match outcome {
            CompletionOutcome::None => self.bell(),
            CompletionOutcome::Unique(name) => {
                let suffix = format!("{} ", &name[prefix.len()..]);
                self.append(state, &suffix)
            }
            CompletionOutcome::PartialExtension(common) => {
                self.append(state, &common[prefix.len()..])
            }
            CompletionOutcome::Ambiguous(names) => {
                if state.tabs == 1 {
                    return self.bell();
                }
                write!(
                    self.output,
                    "\r\n{}\r\n{}{}",
                    names.join("  "),
                    self.prompt,
                    state.buf
                )?;
                Ok(())
            }
        }
    }

    fn append(&mut self, state: &mut LineState, text: &str) -> Result<(), ReadError> {
        state.buf.push_str(text);
        self.output.write_all(text.as_bytes())?;
        state.escaped = ends_with_escape(&state.buf);
        Ok(())
    }

    /// Discard an escape sequence such as an arrow key (`ESC [ A`) or
    /// Alt plus a key.
    ///
    /// A control byte or a byte that cannot belong to the sequence ends it
    /// early and is returned for normal handling, so Enter and Ctrl-C
    /// after a stray ESC still work.
    fn skip_escape_sequence(&mut self) -> Result<Option<u8>, ReadError> {
        let intro = self.next_byte()?;
        if intro < 0x20 || intro == DEL {
            return Ok(Some(intro));
        }
        if intro != b'[' && intro != b'O' {
            return Ok(None);
        }
        loop {
            match self.next_byte()? {
                // parameter and intermediate bytes
                0x20..=0x3f => {}
                // final byte
                0x40..=0x7e => return Ok(None),
                other => return Ok(Some(other)),
            }
        }
    }

    fn bell(&mut self) -> Result<(), ReadError> {
        self.output.write_all(&[BELL])?;
        Ok(())
    }
}

/// Odd number of trailing backslashes.
fn ends_with_escape(buf: &str) -> bool {
    buf.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}
