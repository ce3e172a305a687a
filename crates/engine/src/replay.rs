//! Synthetic hook invocation for operator testing
//!
//! Re-runs a repository's installed `post-receive` hook outside of a real
//! push, feeding it a single synthetic ref update with placeholder object
//! ids, exactly the way git would invoke it: cwd set to the repository,
//! `GIT_DIR=.`, metadata on stdin, stdio inherited. The hook's exit code
//! is returned unchanged so callers can script against it.

use crate::process::Invocation;
use crate::push::PushEvent;
use crate::repository::BareRepository;
use shipit_core::{env, ProjectName, Result};
use std::path::Path;

/// Ref replayed when the operator does not name one
pub const DEFAULT_REF: &str = "refs/heads/master";

/// Invoke `project`'s post-receive hook with a synthetic push of `ref_name`
///
/// Returns the hook's exit code; 0 means every subhook succeeded (a
/// repository with an empty registry also returns 0).
pub fn run_hook(
    home: &Path,
    project: &ProjectName,
    ref_name: &str,
    hook_debug: bool,
) -> Result<i32> {
    let repo = BareRepository::open(home, project)?;
    let hook = repo.post_receive_path();
    tracing::info!(hook = %hook.display(), ref_name, "replaying post-receive hook");

    let event = PushEvent::synthetic(ref_name);
    let mut invocation = Invocation::new(hook.to_string_lossy())
        .stdin(event.to_line())
        .env("GIT_DIR", ".")
        .dir(repo.path())
        .accept_any();
    if hook_debug {
        invocation = invocation.env(env::HOOK_DEBUG, "1");
    }

    let output = invocation.run()?;
    tracing::info!(code = output.code, "hook finished");
    Ok(output.code)
}
