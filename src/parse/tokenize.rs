use std::collections::BTreeMap;

use super::redirect::ResolveRedirect;
use super::types::{Input, RedirectKind, RedirectTarget, Word};
use crate::error::RedirectError;

/// Split a line into words, honoring single quotes, double quotes,
/// backslash escapes, and redirect operators.
///
/// A redirect operator (`>`, `>>`, `N>`, `N>>` with N in 0..=2) is only
/// recognized at the start of a word and only when followed by whitespace.
/// Anything else that looks like one is ordinary text. Unterminated quotes
/// and a trailing backslash are not errors: the scan stops at end of line
/// and keeps what it collected.
pub fn split_words(line: &str) -> Vec<Word> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut words = Vec::new();
    let mut buf = String::new();
    // `started` distinguishes an empty quoted word ('') from no word at all
    let mut started = false;
    let mut pending: Option<(String, RedirectKind)> = None;
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            buf.push(c);
            started = true;
            esc = false;
            i += 1;
            continue;
        }
        if sq {
            if c == '\'' {
                sq = false;
            } else {
                buf.push(c);
            }
            i += 1;
            continue;
        }
        if dq {
            if c == '"' {
                dq = false;
                i += 1;
                continue;
            }
            // Inside double quotes only \\ \$ \" and \<newline> are escapes
            if c == '\\' && i + 1 < len && matches!(chars[i + 1], '\\' | '$' | '"' | '\n') {
                buf.push(chars[i + 1]);
                i += 2;
                continue;
            }
            buf.push(c);
            i += 1;
            continue;
        }

        match c {
            '\\' => {
                esc = true;
                started = true;
            }
            '\'' => {
                sq = true;
                started = true;
            }
            '"' => {
                dq = true;
                started = true;
            }
            c if c.is_whitespace() => {
                if started {
                    words.push(finish_word(&mut buf, &mut pending));
                    started = false;
                }
            }
            _ => {
                if !started
                    && pending.is_none()
                    && let Some((operator, next)) = redirect_operator(&chars, i)
                {
                    let kind = RedirectKind::from_operator(&operator);
                    pending = Some((operator, kind));
                    i = next;
                    continue;
                }
                buf.push(c);
                started = true;
            }
        }
        i += 1;
    }

    if started {
        words.push(finish_word(&mut buf, &mut pending));
    }
    if let Some((operator, kind)) = pending {
        words.push(Word::Redirect {
            operator,
            kind,
            target: String::new(),
        });
    }

    words
}

fn finish_word(buf: &mut String, pending: &mut Option<(String, RedirectKind)>) -> Word {
    let text = std::mem::take(buf);
    match pending.take() {
        Some((operator, kind)) => Word::Redirect {
            operator,
            kind,
            target: text,
        },
        None => Word::Arg(text),
    }
}

/// Match `[012]?>{1,2}` at `start`, followed by whitespace.
/// Returns the operator text and the index just past it.
fn redirect_operator(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    if matches!(chars[i], '0' | '1' | '2') {
        i += 1;
    }
    let arrows_start = i;
    while i < chars.len() && chars[i] == '>' {
        i += 1;
    }
    let arrows = i - arrows_start;
    if !(1..=2).contains(&arrows) {
        return None;
    }
    if !chars.get(i).is_some_and(|c| c.is_whitespace()) {
        return None;
    }
    Some((chars[start..i].iter().collect(), i))
}

/// Result of tokenizing a line with redirect resolution.
#[derive(Debug, Default)]
pub struct Tokenized {
    /// Command followed by its arguments, in order.
    pub tokens: Vec<String>,
    pub redirects: BTreeMap<RedirectKind, RedirectTarget>,
    /// Redirects that were dropped, in the order they appeared.
    pub errors: Vec<RedirectError>,
}

/// Tokenize a line and resolve each redirect through `resolver`.
///
/// Redirect failures are collected rather than returned: the offending
/// redirect is omitted and the remaining words are unaffected.
pub fn tokenize(line: &str, resolver: &dyn ResolveRedirect) -> Tokenized {
    let mut out = Tokenized::default();

    for word in split_words(line) {
        match word {
            Word::Arg(text) => out.tokens.push(text),
            Word::Redirect {
                operator,
                kind,
                target,
            } => {
                if target.is_empty() {
                    out.errors.push(RedirectError::MissingTarget(operator));
                    continue;
                }
                match resolver.resolve(kind, &target) {
                    Ok(resolved) => {
                        out.redirects.insert(kind, resolved);
                    }
                    Err(e) => {
                        log::warn!("dropping redirect {operator} {target}: {e}");
                        out.errors.push(e);
                    }
                }
            }
        }
    }

    out
}

impl Input {
    /// Parse a line into an [`Input`].
    ///
    /// Returns `None` for the input when the line has no command word
    /// (blank, or redirects only). Redirect errors are returned either way.
    pub fn parse(line: &str, resolver: &dyn ResolveRedirect) -> (Option<Input>, Vec<RedirectError>) {
        let Tokenized {
            tokens,
            redirects,
            errors,
        } = tokenize(line, resolver);

        let mut tokens = tokens.into_iter();
        let input = tokens.next().map(|command| Input {
            command,
            args: tokens.collect(),
            redirects,
        });
        (input, errors)
    }
}
