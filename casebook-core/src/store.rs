//! Flat-file case store.
//!
//! Layout (all directories configurable through [`StoreConfig`]):
//!
//! ```text
//! out/                     per-run artifacts, overwritten every run
//! cases/case-<id>.json     full cases (archive)
//! cases_min/case-<id>.json minimal cases (match corpus)
//! ```
//!
//! The two case directories share file names but are never cross-referenced.
//! Writes are plain `fs::write`: no locking and no atomic rename, so two runs
//! inside the same second overwrite each other.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{CaseError, Result};
use crate::types::{CaseId, CaseOutput, MinimalCase};

/// Name of the final analyze document inside the out directory.
pub const CASE_ARTIFACT: &str = "case.json";

/// Name of the final match document inside the out directory.
pub const SIMILAR_CASES_ARTIFACT: &str = "similar_cases.json";

/// Paths written when a full case is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCase {
    /// `out/case.json`.
    pub latest: PathBuf,
    /// `cases/case-<id>.json`.
    pub archived: PathBuf,
    /// `cases_min/case-<id>.json`.
    pub minimal: PathBuf,
}

/// Handle to the on-disk case directories.
#[derive(Debug, Clone)]
pub struct CaseStore {
    config: StoreConfig,
}

impl CaseStore {
    /// Store over already-resolved directories.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Directory configuration in use.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of a named artifact inside the out directory.
    #[must_use]
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.config.out_dir.join(name)
    }

    /// Write a run artifact verbatim into the out directory.
    ///
    /// # Errors
    /// Returns [`CaseError::Io`] if the directory or file cannot be written.
    pub fn write_artifact(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.artifact_path(name);
        write_file(&path, contents)?;
        Ok(path)
    }

    /// Serialize `value` pretty-printed into the out directory.
    ///
    /// # Errors
    /// Returns an error on serialization or I/O failure.
    pub fn write_json_artifact<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        self.write_artifact(name, &serde_json::to_string_pretty(value)?)
    }

    /// Persist a freshly analyzed case: the latest-case artifact, the full
    /// archive copy and the minimal projection.
    ///
    /// # Errors
    /// Returns an error on serialization or I/O failure. Files written before
    /// the failure are left in place.
    pub fn save_case(&self, id: &CaseId, case: &CaseOutput, minimal: &MinimalCase) -> Result<SavedCase> {
        let pretty_case = serde_json::to_string_pretty(case)?;
        let pretty_min = serde_json::to_string_pretty(minimal)?;

        let latest = self.write_artifact(CASE_ARTIFACT, &pretty_case)?;
        let archived = self.config.cases_dir.join(id.file_name());
        write_file(&archived, &pretty_case)?;
        let minimal = self.config.minimal_cases_dir.join(id.file_name());
        write_file(&minimal, &pretty_min)?;

        info!(case_id = %id, path = %archived.display(), "Case saved");
        Ok(SavedCase { latest, archived, minimal })
    }

    /// All minimal cases in the configured directory. See [`load_all_minimal_cases`].
    ///
    /// # Errors
    /// See [`load_all_minimal_cases`].
    pub fn load_all_minimal_cases(&self) -> Result<Vec<MinimalCase>> {
        load_all_minimal_cases(&self.config.minimal_cases_dir)
    }
}

/// Load every `*.json` minimal case in `dir`, ordered by file name.
///
/// A missing directory yields an empty list. Lexicographic file-name order
/// keeps the rendered corpus identical across runs.
///
/// # Errors
/// Returns [`CaseError::Io`] if the directory cannot be listed or a file
/// cannot be read, and [`CaseError::CorruptCase`] if a file does not decode.
pub fn load_all_minimal_cases(dir: &Path) -> Result<Vec<MinimalCase>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Minimal case directory absent");
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut cases = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(&path)?;
        let case = serde_json::from_str::<MinimalCase>(&text).map_err(|e| CaseError::CorruptCase {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        cases.push(case);
    }

    debug!(dir = %dir.display(), count = cases.len(), "Loaded minimal cases");
    Ok(cases)
}

/// Render known cases as the plain-text block embedded in the match prompt.
#[must_use]
pub fn render_known_cases(cases: &[MinimalCase]) -> String {
    let mut out = String::new();
    for case in cases {
        out.push_str(&format!("CASE ID: {}\n", case.case_id));
        out.push_str(&format!("Exception: {}\n", case.crash_signature.exception));
        out.push_str("Top frames:\n");
        for frame in &case.crash_signature.top_frames {
            out.push_str(&format!("- {frame}\n"));
        }
        out.push_str("Solution pattern:\n");
        out.push_str(&case.solution_pattern);
        out.push('\n');
        out.push_str("PR:\n");
        out.push_str(&format!("{} | {}\n", case.related_pr.url, case.related_pr.title));
        out.push_str("\n---\n\n");
    }
    out.trim().to_string()
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
