//! Project naming and bare-repository path derivation
//!
//! A project is a named deployment target. The name is the unique key and
//! the bare repository directory is derived deterministically from it as
//! `<home>/<name>.git`, so a valid name must be safe to use as a single
//! filesystem component.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A validated project name
///
/// Names are restricted to ASCII alphanumerics, `-`, `_` and `.`, must be
/// non-empty and must not start with a dot. This keeps the derived
/// `<name>.git` directory a single, predictable path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate and wrap a project name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        let reason = if name.is_empty() {
            Some("name must not be empty")
        } else if name.starts_with('.') {
            Some("name must not start with a dot")
        } else if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            Some("name may only contain alphanumerics, '-', '_' and '.'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidProjectName {
                name,
                reason: reason.to_string(),
            }),
            None => Ok(Self(name)),
        }
    }

    /// The name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare repository directory for this project under `home`
    #[must_use]
    pub fn bare_repo_path(&self, home: &Path) -> PathBuf {
        home.join(format!("{}.git", self.0))
    }
}

impl FromStr for ProjectName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
