//! # casebook-cli — composition layer for casebook
//!
//! Wires `casebook-core` (case model, schemas, store) to `casebook-llm`
//! (transport, retry, envelope parsing) and exposes the two workflows the
//! `casebook` binary runs.
//!
//! ## Modules
//!
//! - `config` — `casebook.toml`, composed from the library configs
//! - `workspace` — path resolution against the working directory
//! - `pipeline` — call, persist raw, extract, decode
//! - `analyze` — crash + PR → stored case
//! - `matcher` — new crash → similar known cases

use std::fmt;

pub mod analyze;
pub mod config;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod workspace;

pub use config::CasebookConfig;
pub use error::RunError;
pub use workspace::Workspace;

/// Workflow selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Crash + PR → new case.
    #[default]
    Analyze,
    /// New crash → similar known cases.
    Match,
}

impl Mode {
    /// Lowercase name used in artifact file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Match => "match",
        }
    }

    /// `response_raw_<mode>.json`.
    #[must_use]
    pub fn raw_artifact(self) -> String {
        format!("response_raw_{}.json", self.as_str())
    }

    /// `output_text_<mode>.json`.
    #[must_use]
    pub fn text_artifact(self) -> String {
        format!("output_text_{}.json", self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
