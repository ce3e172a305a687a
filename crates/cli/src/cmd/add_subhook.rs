//! Add-subhook command implementation

use anyhow::Result;
use owo_colors::OwoColorize;
use shipit_core::ProjectName;
use shipit_engine::{BareRepository, SubhookRegistry};
use std::path::Path;

/// Copy a script into the project's subhook registry
///
/// The destination name defaults to the source's base name; an existing
/// entry with that name is overwritten.
pub fn run(home: &Path, project: &str, file: &Path, as_name: Option<&str>) -> Result<()> {
    let name: ProjectName = project.parse()?;
    let repo = BareRepository::open(home, &name)?;

    let registry = SubhookRegistry::for_repository(&repo);
    let dest = registry.add(file, as_name)?;

    println!(
        "{} {} {} {}",
        "Copied".green(),
        file.display(),
        "to".green(),
        dest.display()
    );
    Ok(())
}
