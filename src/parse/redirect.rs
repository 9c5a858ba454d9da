//! Redirect target resolution.
//!
//! Resolution checks that the target's parent directory exists and, for
//! truncating redirects, creates the file up front. The file therefore
//! exists once the line is parsed, even if the command never runs.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::{RedirectKind, RedirectMode, RedirectTarget};
use crate::error::RedirectError;

/// Turns a redirect target word into a concrete [`RedirectTarget`].
pub trait ResolveRedirect {
    fn resolve(&self, kind: RedirectKind, target: &str) -> Result<RedirectTarget, RedirectError>;
}

/// Resolves targets against a base directory and creates missing
/// truncate-mode targets as empty files.
#[derive(Debug, Clone)]
pub struct EagerCreate {
    base: PathBuf,
}

impl EagerCreate {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ResolveRedirect for EagerCreate {
    fn resolve(&self, kind: RedirectKind, target: &str) -> Result<RedirectTarget, RedirectError> {
        if target.is_empty() {
            return Err(RedirectError::MissingTarget(kind.as_str().to_string()));
        }

        // join() keeps absolute targets as-is
        let path = self.base.join(target);
        if let Some(parent) = path.parent()
            && !parent.is_dir()
        {
            return Err(RedirectError::NoSuchDirectory(path));
        }

        let mode = kind.mode();
        if mode == RedirectMode::Truncate {
            create_if_missing(&path)?;
        }

        Ok(RedirectTarget { path, mode })
    }
}

fn create_if_missing(path: &Path) -> Result<(), RedirectError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            log::debug!("created redirect target {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(RedirectError::CreateFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}
