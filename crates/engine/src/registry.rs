//! The ordered subhook registry
//!
//! Subhooks live as plain executables in `hooks/post-receive.d/` inside a
//! bare repository. Execution order is the lexicographic filename order
//! and nothing else, so operators control sequencing with filename
//! prefixes (`10-`, `15-`, ...). Entries named `*.source.sh` are
//! variable-definition files consumed by the dispatcher, not executed.

use crate::fsutil;
use crate::repository::BareRepository;
use shipit_core::Result;
use std::path::{Path, PathBuf};

/// Registry directory name inside `hooks/`
pub const REGISTRY_DIR_NAME: &str = "post-receive.d";

/// Suffix marking a variable-definition file
pub const VAR_FILE_SUFFIX: &str = ".source.sh";

/// One entry in the registry, identified by its filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubhookEntry {
    name: String,
    path: PathBuf,
}

impl SubhookEntry {
    /// The filename, which doubles as the sort key
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the entry
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this entry is a variable-definition file rather than an
    /// executable subhook
    #[must_use]
    pub fn is_var_file(&self) -> bool {
        self.name.ends_with(VAR_FILE_SUFFIX)
    }

    /// Whether this entry can be executed (regular file, executable bit)
    ///
    /// Checked at dispatch time, not at registration time.
    pub fn is_executable(&self) -> Result<bool> {
        fsutil::is_executable_file(&self.path)
    }
}

/// The `post-receive.d` directory of one bare repository
#[derive(Debug, Clone)]
pub struct SubhookRegistry {
    dir: PathBuf,
}

impl SubhookRegistry {
    /// The registry of `repo`
    #[must_use]
    pub fn for_repository(repo: &BareRepository) -> Self {
        Self {
            dir: repo.hooks_dir().join(REGISTRY_DIR_NAME),
        }
    }

    /// The registry directory path
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the registry directory if it does not exist yet
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Register a subhook by copying `source` into the registry
    ///
    /// The destination filename is `as_name` when given, otherwise the
    /// source's base name. An existing entry with the same name is
    /// silently overwritten (last write wins). The copy is marked
    /// executable; no further validation happens here.
    pub fn add(&self, source: &Path, as_name: Option<&str>) -> Result<PathBuf> {
        let dest_name = match as_name {
            Some(name) => name.to_string(),
            None => source
                .file_name()
                .and_then(|n| n.to_str())
                .map(ToString::to_string)
                .ok_or_else(|| {
                    shipit_core::Error::Message(format!(
                        "Cannot derive a subhook name from {}",
                        source.display()
                    ))
                })?,
        };
        let dest = self.dir.join(dest_name);

        std::fs::copy(source, &dest)?;
        fsutil::make_executable(&dest)?;
        tracing::info!(
            source = %source.display(),
            dest = %dest.display(),
            "registered subhook"
        );
        Ok(dest)
    }

    /// Enumerate registry entries, sorted lexicographically by filename
    ///
    /// A missing registry directory is treated as empty. Directories and
    /// other non-file entries are included; the dispatcher rejects them
    /// when it tries to run them.
    pub fn entries(&self) -> Result<Vec<SubhookEntry>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
                tracing::warn!(
                    entry = %entry.path().display(),
                    "skipping registry entry with non-UTF-8 name"
                );
                continue;
            };
            entries.push(SubhookEntry {
                name,
                path: entry.path(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
