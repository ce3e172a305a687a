//! Init command implementation
//!
//! Create a project's bare repository and install the hook skeleton.

use anyhow::Result;
use owo_colors::OwoColorize;
use shipit_core::ProjectName;
use shipit_engine::{BareRepository, InitOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run the init command
///
/// On success the repository is immediately push-ready: a push triggers
/// the installed post-receive dispatcher.
pub fn run(
    home: &Path,
    project: &str,
    start_repo: Option<String>,
    start_branch: Option<String>,
    work_dir: Option<PathBuf>,
) -> Result<()> {
    let name: ProjectName = project.parse()?;
    debug!(project = %name, home = %home.display(), "initializing project");

    let options = InitOptions {
        start_repo,
        start_branch,
        work_dir: work_dir.clone(),
        dispatcher_bin: None,
    };
    let repo = BareRepository::init(home, &name, &options)?;

    println!(
        "{} {}",
        "Created bare repository:".green(),
        repo.path().display()
    );
    if let Some(work_dir) = work_dir {
        println!(
            "Installed default subhook (clone/fetch to {})",
            work_dir.display().cyan()
        );
    }
    println!(
        "\nNext: print the remote to push to with {}",
        format!("shipit remote-command {name} <remote-name>").cyan()
    );
    Ok(())
}
