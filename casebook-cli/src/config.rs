//! Top-level casebook configuration.
//!
//! Composes the library configs into one `casebook.toml`. Every table and
//! field is optional; an empty file yields the built-in defaults.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [llm]
//! model = "gpt-4o-mini"
//!
//! [llm.retry]
//! scope = "transient"
//!
//! [store]
//! minimal_cases_dir = "kb/cases_min"
//! ```

use std::path::{Path, PathBuf};

use casebook_core::StoreConfig;
use casebook_llm::{LlmConfig, PromptSet};
use serde::{Deserialize, Serialize};

use crate::error::RunError;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CasebookConfig {
    /// Logging.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Remote service, timeouts and retry.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Prompt templates and instructions.
    #[serde(default)]
    pub prompts: PromptSet,
    /// Input file names.
    #[serde(default)]
    pub inputs: InputConfig,
    /// Output and case directories.
    #[serde(default)]
    pub store: StoreConfig,
}

impl CasebookConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `RunError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, RunError> {
        toml::from_str(toml_str).map_err(|e| RunError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `RunError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RunError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RunError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Read the bearer token named by `llm.api_key_env` through `lookup`.
    ///
    /// # Errors
    /// Returns `RunError::MissingCredential` if the variable is unset or blank.
    pub fn api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String, RunError> {
        let var = &self.llm.api_key_env;
        lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RunError::MissingCredential { var: var.clone() })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default filter when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log line format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Input files read by the mode drivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Crash report (both modes).
    #[serde(default = "default_crash_file")]
    pub crash_file: PathBuf,
    /// Pull request text (analyze).
    #[serde(default = "default_pr_file")]
    pub pr_file: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            crash_file: default_crash_file(),
            pr_file: default_pr_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_crash_file() -> PathBuf { PathBuf::from("crash.txt") }
fn default_pr_file() -> PathBuf { PathBuf::from("pr.txt") }
