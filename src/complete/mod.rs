//! Tab completion: match a typed prefix against candidate command names.

pub mod candidates;

pub use candidates::{Builtins, CandidateSource, Candidates, PathExecutables};

use std::collections::BTreeSet;

/// What a tab press should do to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Nothing matches.
    None,
    /// Exactly one match; the caller completes it and adds a space.
    Unique(String),
    /// Several matches that share more than the typed prefix.
    PartialExtension(String),
    /// Several matches with no further common prefix, sorted and deduplicated.
    Ambiguous(Vec<String>),
}

/// Complete `prefix` against `candidates`. Matching is case-sensitive.
pub fn complete<I, S>(prefix: &str, candidates: I) -> CompletionOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let matches: BTreeSet<String> = candidates
        .into_iter()
        .filter(|c| c.as_ref().starts_with(prefix))
        .map(|c| c.as_ref().to_string())
        .collect();

    match matches.len() {
        0 => CompletionOutcome::None,
        1 => CompletionOutcome::Unique(matches.into_iter().next().unwrap_or_default()),
        _ => {
            let common = common_prefix(&matches, prefix);
            if common.len() > prefix.len() {
                CompletionOutcome::PartialExtension(common.to_string())
            } else {
                CompletionOutcome::Ambiguous(matches.into_iter().collect())
            }
        }
    }
}

/// Longest prefix shared by every match, never shorter than `typed`.
///
/// Walks the shortest match's char boundaries from its full length down to
/// the typed length and keeps the first one every match agrees on.
fn common_prefix<'a>(matches: &'a BTreeSet<String>, typed: &'a str) -> &'a str {
    let Some(shortest) = matches.iter().min_by_key(|m| m.len()) else {
        return typed;
    };

    let mut ends: Vec<usize> = shortest
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(shortest.len()))
        .filter(|&end| end > typed.len())
        .collect();
    ends.reverse();

    for end in ends {
        let candidate = &shortest[..end];
        if matches.iter().all(|m| m.starts_with(candidate)) {
            return candidate;
        }
    }
    typed
}
