//! Hidden dispatch entry point
//!
//! The installed `hooks/post-receive` shim execs `shipit dispatch`. Git
//! runs hooks with the repository as working directory and `GIT_DIR`
//! pointing at it, so the repository is resolved from the invocation
//! environment and push metadata is read from standard input.

use anyhow::{Context, Result};
use shipit_engine::{BareRepository, Dispatcher};
use std::io::Read;
use std::path::PathBuf;

/// Read push metadata from stdin and run every registered subhook
///
/// Returns the dispatcher's exit code: 0 on full success, otherwise the
/// first failing subhook's code.
pub fn run() -> Result<i32> {
    let repo_dir = match std::env::var_os("GIT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Failed to resolve working directory")?,
    };
    let repo = BareRepository::from_path(&repo_dir)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read push metadata from stdin")?;

    let debug = std::env::var_os(shipit_core::env::HOOK_DEBUG).is_some();
    let dispatcher = Dispatcher::new(&repo, debug);
    Ok(dispatcher.run(&input)?)
}
