//! Remote-command command implementation
//!
//! Prints the `git remote add` invocation a developer runs on their own
//! machine to point a clone at the deployment target.

use anyhow::Result;
use owo_colors::OwoColorize;
use shipit_core::ProjectName;
use shipit_engine::{BareRepository, Invocation};
use std::path::Path;

/// Print the remote registration commands for a project
pub fn run(home: &Path, project: &str, remote_name: &str) -> Result<()> {
    let name: ProjectName = project.parse()?;
    let repo = BareRepository::open(home, &name)?;

    let user = std::env::var("USER").unwrap_or_else(|_| "git".to_string());
    let host = fqdn();

    println!(
        "git remote add {remote_name} {user}@{host}:{}",
        repo.path().display()
    );
    println!(
        "{}",
        "# optional: always push everything to same remote branch".dimmed()
    );
    println!("git config --local remote.{remote_name}.push +HEAD:refs/heads/master");
    Ok(())
}

/// Best-effort fully qualified hostname; falls back to `localhost`
fn fqdn() -> String {
    Invocation::new("hostname")
        .arg("-f")
        .capture()
        .run()
        .ok()
        .map(|out| out.stdout)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
