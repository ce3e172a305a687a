//! Run-hook command implementation
//!
//! Operator-facing replay of the full post-receive hook against a
//! synthetic push. The tool exits with the hook's exit code so scripts
//! can use this as a pass/fail check.

use anyhow::Result;
use owo_colors::OwoColorize;
use shipit_core::ProjectName;
use shipit_engine::replay;
use std::path::Path;

/// Replay the post-receive hook and return its exit code
pub fn run(home: &Path, project: &str, ref_name: &str, hook_debug: bool) -> Result<i32> {
    let name: ProjectName = project.parse()?;

    let rule = "*".repeat(80);
    println!("{rule}");
    let code = replay::run_hook(home, &name, ref_name, hook_debug)?;
    println!("{rule}");

    if code == 0 {
        println!("{}", "Hook returned 0".green());
    } else {
        eprintln!("{}", format!("Hook returned {code}").red());
    }
    Ok(code)
}
