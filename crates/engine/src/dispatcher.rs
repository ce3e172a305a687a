//! The native post-receive dispatcher
//!
//! Git invokes the installed `hooks/post-receive` shim after accepting a
//! push; the shim execs back into this code. The dispatcher reads no
//! arguments: push metadata arrives on standard input, one
//! `<old-id> <new-id> <ref-name>` line per updated ref.
//!
//! Dispatch walks the subhook registry in lexicographic filename order
//! and runs each entry strictly sequentially, forwarding the raw input
//! stream and an environment assembled from the parent process, the
//! repository path, the debug flag and any `*.source.sh` variable files.
//! Subhook stdio is inherited so deploy logs stream back to the pushing
//! client. The first non-zero subhook exit stops the walk and becomes the
//! dispatcher's own exit code.

use crate::env_file;
use crate::process::Invocation;
use crate::push::PushEvent;
use crate::registry::{SubhookEntry, SubhookRegistry};
use crate::repository::BareRepository;
use shipit_core::{env, Error, Result};

/// One hook invocation over a bare repository
///
/// The debug flag is threaded explicitly rather than read from global
/// state; it only adds diagnostics and never changes control flow or
/// exit-code semantics.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    repo: &'a BareRepository,
    debug: bool,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher for `repo`
    #[must_use]
    pub fn new(repo: &'a BareRepository, debug: bool) -> Self {
        Self { repo, debug }
    }

    /// Run every registered subhook against the push metadata in `input`
    ///
    /// Returns the exit code the hook process should report: 0 when every
    /// subhook succeeded (or none are registered), otherwise the exit
    /// code of the first failing subhook. Infrastructure problems (an
    /// unreadable registry, a non-executable entry, a subhook that cannot
    /// be spawned) surface as errors instead.
    pub fn run(&self, input: &str) -> Result<i32> {
        match PushEvent::parse_all(input) {
            Ok(events) => {
                tracing::debug!(refs = events.len(), "dispatching push");
                if self.debug {
                    for event in &events {
                        tracing::debug!(%event, "push ref");
                    }
                }
            }
            Err(e) => tracing::debug!("push input not parseable as ref lines: {e}"),
        }

        let registry = SubhookRegistry::for_repository(self.repo);
        let entries = registry.entries()?;
        let subhook_env = self.build_env(&entries)?;

        for entry in entries.iter().filter(|e| !e.is_var_file()) {
            if !entry.is_executable()? {
                return Err(Error::SubhookNotExecutable {
                    path: entry.path().to_path_buf(),
                });
            }

            tracing::info!(subhook = entry.name(), "running subhook");
            let output = Invocation::new(entry.path().to_string_lossy())
                .stdin(input)
                .envs(subhook_env.iter().cloned())
                .dir(self.repo.path())
                .accept_any()
                .run()?;

            if output.code != 0 {
                tracing::error!(
                    subhook = entry.name(),
                    code = output.code,
                    "subhook failed; aborting dispatch"
                );
                return Ok(output.code);
            }
            tracing::debug!(subhook = entry.name(), "subhook succeeded");
        }

        Ok(0)
    }

    /// Assemble the environment every subhook sees
    ///
    /// The repository path and (when enabled) the debug flag come first,
    /// then the assignments from each variable file in lexicographic
    /// order, so a later file wins a conflicting key.
    fn build_env(&self, entries: &[SubhookEntry]) -> Result<Vec<(String, String)>> {
        let repo_path = std::fs::canonicalize(self.repo.path())?;
        let mut vars = vec![(
            env::REPO_PATH.to_string(),
            repo_path.to_string_lossy().into_owned(),
        )];
        if self.debug {
            vars.push((env::HOOK_DEBUG.to_string(), "1".to_string()));
        }
        for entry in entries.iter().filter(|e| e.is_var_file()) {
            let parsed = env_file::parse(entry.path())?;
            tracing::debug!(
                file = entry.name(),
                count = parsed.len(),
                "loaded subhook variables"
            );
            vars.extend(parsed);
        }
        Ok(vars)
    }
}
