//! Store layout configuration.
//!
//! Maps to the `[store]` table of `casebook.toml`. Relative paths are resolved
//! against the workspace root by the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where run artifacts and cases live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Per-run artifacts: raw responses, extracted text, final documents.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Archive of full cases.
    #[serde(default = "default_cases_dir")]
    pub cases_dir: PathBuf,
    /// Searchable minimal cases, the corpus for `match`.
    #[serde(default = "default_minimal_cases_dir")]
    pub minimal_cases_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            cases_dir: default_cases_dir(),
            minimal_cases_dir: default_minimal_cases_dir(),
        }
    }
}

impl StoreConfig {
    /// Copy of this config with every relative path joined onto `root`.
    #[must_use]
    pub fn rooted_at(&self, root: &Path) -> Self {
        Self {
            out_dir: root.join(&self.out_dir),
            cases_dir: root.join(&self.cases_dir),
            minimal_cases_dir: root.join(&self.minimal_cases_dir),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_out_dir() -> PathBuf { PathBuf::from("out") }
fn default_cases_dir() -> PathBuf { PathBuf::from("cases") }
fn default_minimal_cases_dir() -> PathBuf { PathBuf::from("cases_min") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let cfg: StoreConfig = toml::from_str(r#"cases_dir = "archive""#).expect("parse");
        assert_eq!(cfg.cases_dir, PathBuf::from("archive"));
        assert_eq!(cfg.out_dir, PathBuf::from("out"));
        assert_eq!(cfg.minimal_cases_dir, PathBuf::from("cases_min"));
    }

    #[test]
    fn rooting_leaves_absolute_paths_alone() {
        let cfg = StoreConfig {
            out_dir: PathBuf::from("/var/tmp/out"),
            ..StoreConfig::default()
        };
        let rooted = cfg.rooted_at(Path::new("/work"));
        assert_eq!(rooted.out_dir, PathBuf::from("/var/tmp/out"));
        assert_eq!(rooted.cases_dir, PathBuf::from("/work/cases"));
    }
}
