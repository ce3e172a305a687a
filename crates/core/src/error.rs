//! Base error types for shipit
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Project name does not satisfy the naming rules
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The project's bare repository does not exist
    #[error("Project '{0}' does not exist")]
    ProjectMissing(String),

    /// The target bare repository path already exists
    ///
    /// Re-initializing over an existing repository is refused so a live
    /// deployment target is never clobbered.
    #[error("{} already exists", path.display())]
    ProjectExists {
        /// The existing bare repository path
        path: PathBuf,
    },

    /// A path expected to hold a bare repository does not
    #[error("No bare repository at {}", path.display())]
    RepositoryMissing {
        /// The missing repository path
        path: PathBuf,
    },

    /// A child process could not be started at all
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        /// The command line that could not be started
        command: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A child process ran to completion with an unaccepted exit code
    #[error("Command '{command}' returned {code}{}", format_output(stdout, stderr))]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// The exit code the process returned
        code: i32,
        /// Captured standard output, empty when stdio was inherited
        stdout: String,
        /// Captured standard error, empty when stdio was inherited
        stderr: String,
    },

    /// A registry entry cannot be dispatched
    #[error("Subhook {} is not an executable file", path.display())]
    SubhookNotExecutable {
        /// The offending registry entry
        path: PathBuf,
    },

    /// A variable-definition file could not be read or parsed
    #[error("Hook environment error: {0}")]
    HookEnv(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Render captured output the way schema failures are reported: each
/// stream framed by a rule so multi-line output stays readable.
fn format_output(stdout: &str, stderr: &str) -> String {
    let mut s = String::new();
    let rule = "*".repeat(80);
    if !stdout.is_empty() {
        s.push_str(&format!("\n\nstdout:\n{rule}\n{stdout}\n{rule}"));
    }
    if !stderr.is_empty() {
        s.push_str(&format!("\n\nstderr:\n{rule}\n{stderr}\n{rule}"));
    }
    s
}

impl Error {
    /// The process exit code this error should map to, if it carries one.
    ///
    /// Only `CommandFailed` has a meaningful code; every other error is a
    /// generic failure.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::CommandFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}
