//! Environment variable names shared across the CLI, the dispatcher and
//! subhook scripts
//!
//! Subhooks are user-authored shell scripts, so these names are part of
//! the public contract and must stay stable.

/// Enables verbose diagnostics in the dispatcher and, by convention, in
/// well-behaved subhooks. Set to `1`; affects verbosity only, never
/// control flow.
pub const HOOK_DEBUG: &str = "SHIPIT_HOOK_DEBUG";

/// Default root directory under which project bare repositories live.
/// Read by the CLI when `--bare-repo-home` is not given.
pub const BARE_REPO_HOME: &str = "SHIPIT_BARE_REPO_HOME";

/// Absolute path of the bare repository, exported to every subhook by the
/// dispatcher.
pub const REPO_PATH: &str = "SHIPIT_REPO_PATH";

/// Checkout target of the default fetch subhook. Exported by the
/// `10-work-dir.source.sh` variable file that `init --work-dir` writes.
pub const WORK_DIR: &str = "WORK_DIR";
