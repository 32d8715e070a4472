//! Resolution of configured paths against the run's working directory.

use std::fs;
use std::path::{Path, PathBuf};

use casebook_core::{CaseError, CaseStore};

use crate::config::CasebookConfig;
use crate::error::RunError;

/// The directory a run operates in, with every configured path resolved.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    crash_file: PathBuf,
    pr_file: PathBuf,
    store: CaseStore,
}

impl Workspace {
    /// Resolve `config` paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: &CasebookConfig) -> Self {
        let root = root.into();
        Self {
            crash_file: root.join(&config.inputs.crash_file),
            pr_file: root.join(&config.inputs.pr_file),
            store: CaseStore::new(config.store.rooted_at(&root)),
            root,
        }
    }

    /// Crash report path.
    #[must_use]
    pub fn crash_file(&self) -> &Path {
        &self.crash_file
    }

    /// Pull request text path.
    #[must_use]
    pub fn pr_file(&self) -> &Path {
        &self.pr_file
    }

    /// Case store rooted in this workspace.
    #[must_use]
    pub fn store(&self) -> &CaseStore {
        &self.store
    }

    /// Read an input file, replacing invalid UTF-8 with U+FFFD.
    ///
    /// # Errors
    /// Returns [`RunError::Store`] if the file cannot be read.
    pub fn read_input(&self, path: &Path) -> Result<String, RunError> {
        let bytes = fs::read(path).map_err(CaseError::from)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fail with [`RunError::MissingInput`] unless every path exists.
    ///
    /// # Errors
    /// Lists all missing files at once.
    pub fn require_inputs(&self, paths: &[&Path]) -> Result<(), RunError> {
        let missing: Vec<PathBuf> = paths
            .iter()
            .filter(|p| !p.is_file())
            .map(|p| p.to_path_buf())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RunError::MissingInput {
                missing,
                workdir: self.root.clone(),
            })
        }
    }
}
