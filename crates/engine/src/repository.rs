//! Bare repository provisioning
//!
//! Creates the `<home>/<project>.git` bare repository and installs the
//! hook skeleton that makes it push-deployable: the `post-receive` shim
//! (which execs the shipit binary's dispatch mode), the shared shell
//! library subhooks source, and the empty `post-receive.d` registry.
//! Repository storage itself belongs to the git binary, invoked as a
//! subprocess.

use crate::fsutil;
use crate::process::Invocation;
use crate::registry::SubhookRegistry;
use shipit_core::{env, Error, ProjectName, Result};
use std::path::{Path, PathBuf};

/// Filename of the installed dispatcher shim
pub const POST_RECEIVE: &str = "post-receive";

/// Filename of the shared shell library installed next to the shim
pub const SHARED_LIB: &str = "shipit-lib.sh";

/// Filename of the default fetch subhook installed by `init --work-dir`
pub const DEFAULT_FETCH_SUBHOOK: &str = "15-fetch.sh";

/// Filename of the variable file exporting `WORK_DIR` for the default
/// fetch subhook
pub const WORK_DIR_VAR_FILE: &str = "10-work-dir.source.sh";

const SHARED_LIB_ASSET: &str = include_str!("../assets/shipit-lib.sh");
const FETCH_SUBHOOK_ASSET: &str = include_str!("../assets/15-fetch.sh");

/// Options for [`BareRepository::init`]
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Populate the bare repository by cloning this repository instead of
    /// initializing it empty
    pub start_repo: Option<String>,
    /// Branch of `start_repo` to make the bare repository's HEAD
    pub start_branch: Option<String>,
    /// Install the default fetch subhook targeting this directory
    pub work_dir: Option<PathBuf>,
    /// Binary the post-receive shim execs; defaults to the running
    /// executable
    pub dispatcher_bin: Option<PathBuf>,
}

/// A project's bare repository on disk
#[derive(Debug, Clone)]
pub struct BareRepository {
    path: PathBuf,
}

impl BareRepository {
    /// The bare repository path for `name` under `home`
    #[must_use]
    pub fn path_for(home: &Path, name: &ProjectName) -> PathBuf {
        name.bare_repo_path(home)
    }

    /// Open an existing project's repository
    ///
    /// # Errors
    ///
    /// [`Error::ProjectMissing`] when the repository directory does not
    /// exist. Every hook and subhook operation requires an existing
    /// repository.
    pub fn open(home: &Path, name: &ProjectName) -> Result<Self> {
        let path = Self::path_for(home, name);
        if !path.is_dir() {
            return Err(Error::ProjectMissing(name.as_str().to_string()));
        }
        Ok(Self { path })
    }

    /// Wrap an existing bare repository directory
    ///
    /// Used by the dispatch entry point, which learns the repository from
    /// `GIT_DIR` rather than from a project name.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(Error::RepositoryMissing { path });
        }
        Ok(Self { path })
    }

    /// Create and provision the bare repository for `name`
    ///
    /// Fails if the target path already exists; re-initializing over a
    /// live deployment target is never allowed, and the existing contents
    /// are left untouched. On success the repository is push-ready.
    /// A failed provisioning attempt is not rolled back; operators are
    /// expected to inspect and remove the partial directory.
    pub fn init(home: &Path, name: &ProjectName, options: &InitOptions) -> Result<Self> {
        let path = Self::path_for(home, name);
        if path.exists() {
            return Err(Error::ProjectExists { path });
        }
        std::fs::create_dir_all(&path)?;

        if let Some(start_repo) = &options.start_repo {
            let mut clone = Invocation::new("git").args(["clone", "--bare"]);
            if let Some(branch) = &options.start_branch {
                clone = clone.args(["-b", branch.as_str()]);
            }
            clone
                .arg(start_repo)
                .arg(path.to_string_lossy())
                .run()?;
        } else {
            tracing::debug!("no start repo; initializing empty bare repository");
            Invocation::new("git")
                .args(["init", "--bare"])
                .dir(&path)
                .run()?;
        }
        tracing::info!(path = %path.display(), "created bare repository");

        let repo = Self { path };
        repo.install_skeleton(options)?;
        Ok(repo)
    }

    /// The repository root directory
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The repository's `hooks` directory
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.path.join("hooks")
    }

    /// The installed dispatcher shim path
    #[must_use]
    pub fn post_receive_path(&self) -> PathBuf {
        self.hooks_dir().join(POST_RECEIVE)
    }

    /// Install the dispatcher shim, the shared library and the registry
    fn install_skeleton(&self, options: &InitOptions) -> Result<()> {
        let hooks_dir = self.hooks_dir();
        std::fs::create_dir_all(&hooks_dir)?;

        let dispatcher_bin = match &options.dispatcher_bin {
            Some(bin) => bin.clone(),
            None => std::env::current_exe()?,
        };
        let shim = post_receive_shim(&dispatcher_bin);
        let shim_path = self.post_receive_path();
        std::fs::write(&shim_path, shim)?;
        fsutil::make_executable(&shim_path)?;

        std::fs::write(hooks_dir.join(SHARED_LIB), SHARED_LIB_ASSET)?;

        let registry = SubhookRegistry::for_repository(self);
        registry.ensure()?;

        if let Some(work_dir) = &options.work_dir {
            self.install_default_subhook(&registry, work_dir)?;
        }
        Ok(())
    }

    /// Install the clone/fetch subhook and its work-dir variable file
    fn install_default_subhook(
        &self,
        registry: &SubhookRegistry,
        work_dir: &Path,
    ) -> Result<()> {
        tracing::debug!("installing default subhook (clone/fetch to work dir)");

        let subhook_path = registry.dir().join(DEFAULT_FETCH_SUBHOOK);
        std::fs::write(&subhook_path, FETCH_SUBHOOK_ASSET)?;
        fsutil::make_executable(&subhook_path)?;

        let var_file = registry.dir().join(WORK_DIR_VAR_FILE);
        std::fs::write(
            &var_file,
            format!(
                "#!/usr/bin/env bash\n\nexport {}={}\n",
                env::WORK_DIR,
                work_dir.display()
            ),
        )?;
        fsutil::make_executable(&var_file)?;

        tracing::info!(
            work_dir = %work_dir.display(),
            "installed default subhook (clone/fetch to work dir)"
        );
        Ok(())
    }
}

/// The post-receive shim content for a given dispatcher binary
fn post_receive_shim(dispatcher_bin: &Path) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         #\n\
         # Installed by shipit. Do not edit; register deployment steps as\n\
         # executables under post-receive.d/ instead.\n\
         exec \"{}\" dispatch\n",
        dispatcher_bin.display()
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_path_for_derivation() {
        let name = ProjectName::new("demo").unwrap();
        assert_eq!(
            BareRepository::path_for(Path::new("/srv/repos"), &name),
            PathBuf::from("/srv/repos/demo.git")
        );
    }

    #[test]
    fn test_open_missing_project() {
        let tmp = tempfile::tempdir().unwrap();
        let name = ProjectName::new("ghost").unwrap();
        let err = BareRepository::open(tmp.path(), &name).unwrap_err();
        assert!(matches!(err, Error::ProjectMissing(_)));
    }

    #[test]
    fn test_from_path_requires_directory() {
        let err = BareRepository::from_path("/nonexistent/demo.git").unwrap_err();
        assert!(matches!(err, Error::RepositoryMissing { .. }));
    }

    #[test]
    fn test_shim_quotes_binary_path() {
        let shim = post_receive_shim(Path::new("/opt/tools dir/shipit"));
        assert!(shim.starts_with("#!/usr/bin/env bash\n"));
        assert!(shim.contains("exec \"/opt/tools dir/shipit\" dispatch\n"));
    }
}
