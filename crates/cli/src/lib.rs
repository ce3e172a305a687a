//! Shipit CLI library
//!
//! This library contains all the CLI logic for shipit, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod logging;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shipit - git-push deployment targets
#[derive(Parser)]
#[command(name = "shipit")]
#[command(about = "Provision bare git repositories that deploy on push")]
#[command(version)]
#[command(long_about = "Provision bare git repositories that deploy on push

shipit creates bare repositories with a layered post-receive hook: a
single dispatcher runs every executable registered under
hooks/post-receive.d/ in lexicographic filename order, so `git push`
triggers your deployment steps without a CI/CD platform.

Workflow:
  1. shipit init myapp --work-dir /srv/myapp
  2. shipit remote-command myapp deploy   # paste output on your machine
  3. git push deploy")]
pub struct Cli {
    /// Directory where all project bare repositories live
    #[arg(
        long,
        env = shipit_core::env::BARE_REPO_HOME,
        value_name = "DIR",
        global = true
    )]
    pub bare_repo_home: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the shipit CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Create a project's bare repository and install the hook skeleton
    Init {
        /// Name of the project (bare repo name)
        project: String,

        /// Populate the bare repo with the contents of this repository
        #[arg(long, value_name = "URL")]
        start_repo: Option<String>,

        /// Branch within --start-repo to make the bare repo's HEAD
        #[arg(long, value_name = "BRANCH")]
        start_branch: Option<String>,

        /// Install the default subhook, which clones or fetches pushed
        /// branches into this directory
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },

    /// Register a subhook script for a project
    ///
    /// Subhooks run on every push in lexicographic filename order; use
    /// numeric prefixes (10-, 15-, ...) to control sequencing. An
    /// existing subhook with the same name is overwritten.
    AddSubhook {
        /// Name of the project (bare repo name)
        project: String,

        /// File to copy into the registry
        file: PathBuf,

        /// Register the file under a different name
        #[arg(long = "as", value_name = "NAME")]
        as_name: Option<String>,
    },

    /// Force a run of the entire post-receive hook
    ///
    /// Feeds the hook a synthetic push of --ref with placeholder object
    /// ids and exits with the hook's exit code, so this is usable as a
    /// pass/fail check in scripts.
    RunHook {
        /// Name of the project (bare repo name)
        project: String,

        /// The ref to "push" during the hook run
        #[arg(long, default_value = shipit_engine::replay::DEFAULT_REF)]
        r#ref: String,

        /// Run the hook with the debug flag set
        #[arg(long)]
        hook_debug: bool,
    },

    /// Print the `git remote add` command for a project
    RemoteCommand {
        /// Name of the project (bare repo name)
        project: String,

        /// Name of the remote (can be anything memorable)
        remote_name: String,
    },

    /// Internal dispatch mode exec'd by the installed post-receive shim
    #[command(hide = true)]
    Dispatch,
}

/// Execute the parsed CLI, returning the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    logging::init(cli.verbose)?;

    // Dispatch mode is invoked by git, not an operator; it resolves the
    // repository from its invocation environment, not from the home dir.
    if let Commands::Dispatch = cli.command {
        return cmd::dispatch::run();
    }

    let home = cli.bare_repo_home.ok_or_else(|| {
        anyhow!(
            "--bare-repo-home is required (or set {})",
            shipit_core::env::BARE_REPO_HOME
        )
    })?;

    match cli.command {
        Commands::Init {
            project,
            start_repo,
            start_branch,
            work_dir,
        } => {
            cmd::init::run(&home, &project, start_repo, start_branch, work_dir)
                .context("Failed to initialize project")?;
            Ok(0)
        }
        Commands::AddSubhook {
            project,
            file,
            as_name,
        } => {
            cmd::add_subhook::run(&home, &project, &file, as_name.as_deref())
                .context("Failed to add subhook")?;
            Ok(0)
        }
        Commands::RunHook {
            project,
            r#ref,
            hook_debug,
        } => cmd::run_hook::run(&home, &project, &r#ref, hook_debug),
        Commands::RemoteCommand {
            project,
            remote_name,
        } => {
            cmd::remote::run(&home, &project, &remote_name)?;
            Ok(0)
        }
        Commands::Dispatch => unreachable!("handled above"),
    }
}
