use std::path::{Path, PathBuf};

use keysh::error::{AbortReason, ReadError, RedirectError};
use keysh::parse::{RedirectKind, RedirectMode};
use keysh::{complete, CompletionOutcome, EagerCreate, Input, LineReader};

fn parse_in(dir: &Path, line: &str) -> (Option<Input>, Vec<RedirectError>) {
    Input::parse(line, &EagerCreate::new(dir))
}

/// Command and args of `line`, parsed in a scratch directory.
fn words_for(line: &str) -> (String, Vec<String>) {
    let dir = tempfile::tempdir().unwrap();
    let (input, errors) = parse_in(dir.path(), line);
    assert!(errors.is_empty(), "line: {line}, errors: {errors:?}");
    let input = input.unwrap_or_else(|| panic!("no command in {line:?}"));
    (input.command, input.args)
}

/// Redirects of `line` as (kind, path relative to the scratch dir, mode).
fn redirects_for(line: &str) -> Vec<(RedirectKind, PathBuf, RedirectMode)> {
    let dir = tempfile::tempdir().unwrap();
    let (input, errors) = parse_in(dir.path(), line);
    assert!(errors.is_empty(), "line: {line}, errors: {errors:?}");
    input
        .unwrap()
        .redirects
        .into_iter()
        .map(|(kind, target)| {
            let rel = target.path.strip_prefix(dir.path()).unwrap().to_path_buf();
            (kind, rel, target.mode)
        })
        .collect()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Feed `bytes` to a reader completing against `candidates`.
fn read(bytes: &[u8], candidates: &[&str]) -> (Result<String, ReadError>, String) {
    let source = names(candidates);
    let mut out = Vec::new();
    let result = LineReader::new(bytes, &mut out, "$ ", &source).read_line();
    (result, String::from_utf8_lossy(&out).into_owned())
}

macro_rules! words_test {
    ($name:ident, $line:expr, $cmd:expr, [$($arg:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let (cmd, args) = words_for($line);
            assert_eq!(cmd, $cmd, "line: {}", $line);
            let expected: Vec<String> = vec![$($arg.to_string()),*];
            assert_eq!(args, expected, "line: {}", $line);
        }
    };
}

macro_rules! redirect_test {
    ($name:ident, $line:expr, [$(($kind:ident, $path:expr, $mode:ident)),* $(,)?]) => {
        #[test]
        fn $name() {
            let expected: Vec<(RedirectKind, PathBuf, RedirectMode)> = vec![
                $((RedirectKind::$kind, PathBuf::from($path), RedirectMode::$mode)),*
            ];
            assert_eq!(redirects_for($line), expected, "line: {}", $line);
        }
    };
}

macro_rules! completion_test {
    ($name:ident, $prefix:expr, [$($cand:expr),*], $expected:expr) => {
        #[test]
        fn $name() {
            let candidates = [$($cand),*];
            assert_eq!(complete($prefix, candidates), $expected, "prefix: {}", $prefix);
        }
    };
}

// ── Quoting and escaping ──

words_test!(quotes_mixed, r#"echo "a b" 'c d'"#, "echo", ["a b", "c d"]);
words_test!(dq_escaped_quote, r#"echo "a\"b""#, "echo", [r#"a"b"#]);
words_test!(dq_escaped_backslash, r#"echo "a\\b""#, "echo", [r"a\b"]);
words_test!(dq_escaped_dollar, r#"echo "\$HOME""#, "echo", ["$HOME"]);
words_test!(dq_other_backslash_kept, r#"echo "a\nb""#, "echo", [r"a\nb"]);
words_test!(sq_backslash_literal, r"echo 'a\b'", "echo", [r"a\b"]);
words_test!(sq_double_quote_literal, r#"echo 'say "hi"'"#, "echo", [r#"say "hi""#]);
words_test!(escaped_space_joins, r"echo a\ b c", "echo", ["a b", "c"]);
words_test!(escaped_quote_unquoted, r#"echo \'x\""#, "echo", [r#"'x""#]);
words_test!(adjacent_quotes_concatenate, r#"echo a'b'"c"d"#, "echo", ["abcd"]);
words_test!(empty_quotes_are_an_arg, "echo '' x", "echo", ["", "x"]);
words_test!(runs_of_whitespace, "  echo   a \t b  ", "echo", ["a", "b"]);
words_test!(quoted_command, "'my prog' arg", "my prog", ["arg"]);

// ── Malformed but bounded input ──

words_test!(unterminated_single_quote, "echo 'abc", "echo", ["abc"]);
words_test!(unterminated_double_quote, r#"echo "a b"#, "echo", ["a b"]);
words_test!(trailing_backslash, r"echo a\", "echo", ["a"]);
words_test!(lone_quote, "echo '", "echo", [""]);
words_test!(lone_backslash, r"echo \", "echo", [""]);

// ── Operators that degrade to text ──

words_test!(operator_needs_whitespace, "echo 2>file", "echo", ["2>file"]);
words_test!(three_arrows, "echo >>> x", "echo", [">>>", "x"]);
words_test!(unknown_descriptor, "echo 3> x", "echo", ["3>", "x"]);
words_test!(mid_word_operator, "echo x2> y", "echo", ["x2>", "y"]);
words_test!(quoted_operator, "echo '>' x", "echo", [">", "x"]);
words_test!(escaped_operator, r"echo \> x", "echo", [">", "x"]);

// ── Redirects ──

redirect_test!(stdout_truncate, "ls > out.txt", [(StdoutWrite, "out.txt", Truncate)]);
redirect_test!(stdout_numbered, "ls 1> out.txt", [(StdoutWrite, "out.txt", Truncate)]);
redirect_test!(stdout_append, "cat 1>> a.log", [(StdoutAppend, "a.log", Append)]);
redirect_test!(stdout_append_bare, "cat >> a.log", [(StdoutAppend, "a.log", Append)]);
redirect_test!(stderr_truncate, "cat 2> err", [(StderrWrite, "err", Truncate)]);
redirect_test!(stderr_append, "cat 2>> err", [(StderrAppend, "err", Append)]);
redirect_test!(quoted_target, "ls > 'my file'", [(StdoutWrite, "my file", Truncate)]);
redirect_test!(
    stdout_and_stderr,
    "ls > out 2>> err",
    [(StdoutWrite, "out", Truncate), (StderrAppend, "err", Append)]
);
redirect_test!(
    later_redirect_wins,
    "ls > first > second",
    [(StdoutWrite, "second", Truncate)]
);
redirect_test!(no_redirects, "ls -la", []);

#[test]
fn redirect_target_is_not_an_arg() {
    assert_eq!(
        words_for("ls -l > out.txt src"),
        ("ls".to_string(), names(&["-l", "src"]))
    );
}

#[test]
fn redirect_only_line_has_no_command() {
    let dir = tempfile::tempdir().unwrap();
    let (input, errors) = parse_in(dir.path(), "> out.txt");
    assert!(input.is_none());
    assert!(errors.is_empty());
    assert!(dir.path().join("out.txt").is_file());
}

#[test]
fn blank_line_has_no_command() {
    let dir = tempfile::tempdir().unwrap();
    let (input, errors) = parse_in(dir.path(), " \t ");
    assert!(input.is_none());
    assert!(errors.is_empty());
}

#[test]
fn truncate_target_is_created_on_parse() {
    let dir = tempfile::tempdir().unwrap();
    parse_in(dir.path(), "ls > made.txt 2>> appended.txt");
    assert!(dir.path().join("made.txt").is_file());
    assert!(!dir.path().join("appended.txt").exists());
}

#[test]
fn truncate_resolution_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("out.txt"), "keep").unwrap();
    for _ in 0..2 {
        let (input, errors) = parse_in(dir.path(), "ls > out.txt");
        assert!(errors.is_empty());
        assert!(input.is_some());
    }
    // Resolution never truncates; that happens when the command runs
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "keep"
    );
}

#[test]
fn missing_directory_drops_only_that_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let (input, errors) = parse_in(dir.path(), "ls -a > nope/out.txt 2> err.txt");
    let input = input.unwrap();

    assert_eq!(input.command, "ls");
    assert_eq!(input.args, names(&["-a"]));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], RedirectError::NoSuchDirectory(_)));
    assert!(!input.redirects.contains_key(&RedirectKind::StdoutWrite));
    assert!(input.redirects.contains_key(&RedirectKind::StderrWrite));
}

#[test]
fn dangling_operator_reports_missing_target() {
    let dir = tempfile::tempdir().unwrap();
    let (input, errors) = parse_in(dir.path(), "ls > ");
    let input = input.unwrap();

    assert!(input.redirects.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "syntax error: missing redirect target after '>'"
    );
}

// ── Completion ──

completion_test!(
    ambiguous_sorted,
    "e",
    ["type", "exit", "echo"],
    CompletionOutcome::Ambiguous(names(&["echo", "exit"]))
);
completion_test!(
    unique_match,
    "ech",
    ["echo"],
    CompletionOutcome::Unique("echo".into())
);
completion_test!(
    partial_extension,
    "e",
    ["export", "exec"],
    CompletionOutcome::PartialExtension("ex".into())
);
completion_test!(no_match, "zz", ["echo", "exit"], CompletionOutcome::None);
completion_test!(case_sensitive, "E", ["echo"], CompletionOutcome::None);
completion_test!(
    duplicates_collapse_to_unique,
    "ca",
    ["cat", "cat"],
    CompletionOutcome::Unique("cat".into())
);
completion_test!(
    exact_and_longer_is_ambiguous,
    "ls",
    ["ls", "lsblk"],
    CompletionOutcome::Ambiguous(names(&["ls", "lsblk"]))
);

// ── Line reader ──

#[test]
fn reader_returns_typed_line() {
    let (line, echo) = read(b"ls -l\r", &[]);
    assert_eq!(line.unwrap(), "ls -l");
    assert_eq!(echo, "ls -l");
}

#[test]
fn reader_tab_on_ambiguous_rings_then_lists() {
    let candidates = ["echo", "exit", "type"];

    let (_, echo) = read(b"e\t\x04", &candidates);
    assert_eq!(echo, "e\x07");

    let (_, echo) = read(b"e\t\t\x04", &candidates);
    assert_eq!(echo, "e\x07\r\necho  exit\r\n$ e");
}

#[test]
fn reader_tab_completes_unique() {
    let (line, echo) = read(b"ech\tfoo\n", &["echo"]);
    assert_eq!(line.unwrap(), "echo foo");
    assert_eq!(echo, "echo foo");
}

#[test]
fn reader_tab_extends_partial() {
    let (line, _) = read(b"e\t\r", &["export", "exec"]);
    assert_eq!(line.unwrap(), "ex");
}

#[test]
fn reader_backspace_on_empty_is_silent() {
    let (line, echo) = read(b"\x7f\x7f\r", &[]);
    assert_eq!(line.unwrap(), "");
    assert_eq!(echo, "");
}

#[test]
fn reader_ctrl_d_on_empty_aborts_silently() {
    let (line, echo) = read(b"\x04", &[]);
    assert!(matches!(
        line,
        Err(ReadError::Abort(AbortReason::EndOfInput))
    ));
    assert_eq!(echo, "");
}

#[test]
fn reader_ctrl_c_discards_line() {
    let (line, _) = read(b"rm -rf\x03\r", &[]);
    assert!(matches!(line, Err(ReadError::Abort(AbortReason::Interrupt))));
}

#[test]
fn reader_backslash_continues_line() {
    let (line, echo) = read(b"echo a\\\rb\r", &[]);
    assert_eq!(line.unwrap(), "echo a\\\nb");
    assert_eq!(echo, "echo a\\\r\nb");
}

#[test]
fn reader_output_tokenizes_with_continuation() {
    let (line, _) = read(b"echo \"a\\\rb\"\r", &[]);
    let (cmd, args) = words_for(&line.unwrap());
    assert_eq!(cmd, "echo");
    assert_eq!(args, names(&["a\nb"]));
}

#[test]
fn reader_keeps_multibyte_characters() {
    let (line, echo) = read("echo héllo €\r".as_bytes(), &[]);
    assert_eq!(line.unwrap(), "echo héllo €");
    assert_eq!(echo, "echo héllo €");
}
