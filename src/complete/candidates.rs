//! Candidate name sources for completion and command lookup.

use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::commands::Builtin;

/// Read-only source of command names for completion.
pub trait CandidateSource {
    /// Names starting with `prefix`. Order and duplicates don't matter.
    fn candidates(&self, prefix: &str) -> Vec<String>;
}

/// Builtin command names.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

impl CandidateSource for Builtins {
    fn candidates(&self, prefix: &str) -> Vec<String> {
        Builtin::NAMES
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| name.to_string())
            .collect()
    }
}

/// Executables found in a list of search directories.
#[derive(Debug, Clone, Default)]
pub struct PathExecutables {
    dirs: Vec<PathBuf>,
}

impl PathExecutables {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Directories from `PATH`, followed by `extra`.
    pub fn from_env(extra: &[PathBuf]) -> Self {
        let mut dirs: Vec<PathBuf> = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        for dir in extra {
            if !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }
        Self { dirs }
    }

    /// First executable named `name`, in search order.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') {
            return None;
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|path| is_executable(path))
    }
}

impl CandidateSource for PathExecutables {
    fn candidates(&self, prefix: &str) -> Vec<String> {
        let mut names = BTreeSet::new();
        for dir in &self.dirs {
            // Missing or unreadable PATH entries are common; skip them
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let file_name = entry.file_name();
                let Some(name) = file_name.to_str() else {
                    continue;
                };
                if name.starts_with(prefix) && is_executable(&entry.path()) {
                    names.insert(name.to_string());
                }
            }
        }
        names.into_iter().collect()
    }
}

/// Regular file (after following symlinks) with any execute bit set.
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Union of several sources.
#[derive(Default)]
pub struct Candidates {
    sources: Vec<Box<dyn CandidateSource>>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl CandidateSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CandidateSource for Candidates {
    fn candidates(&self, prefix: &str) -> Vec<String> {
        self.sources
            .iter()
            .flat_map(|s| s.candidates(prefix))
            .collect()
    }
}

impl CandidateSource for Vec<String> {
    fn candidates(&self, prefix: &str) -> Vec<String> {
        self.iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }
}
