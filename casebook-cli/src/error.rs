//! Run-level errors with operator remediation hints.

use std::path::PathBuf;

use casebook_core::CaseError;
use casebook_llm::LlmError;
use thiserror::Error;

/// Everything that can end a casebook run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The credential variable is unset or blank.
    #[error("{var} is not set. Export it (for example `export {var}=sk-...`) and run again.")]
    MissingCredential {
        /// Environment variable name.
        var: String,
    },

    /// Required input files are absent.
    #[error(
        "Missing input file(s): {}. Place them in the working directory ({}).",
        join_paths(.missing),
        .workdir.display()
    )]
    MissingInput {
        /// Files that were looked for and not found.
        missing: Vec<PathBuf>,
        /// Workspace root the run used.
        workdir: PathBuf,
    },

    /// `match` has nothing to compare against.
    #[error(
        "No known cases in {}. Run `casebook analyze` at least once to create minimal cases.",
        .dir.display()
    )]
    NoKnownCases {
        /// Minimal-case directory that was searched.
        dir: PathBuf,
    },

    /// Config file unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The response body is not JSON at all.
    #[error("Service response is not valid JSON ({reason}). Inspect {} for the raw body.", .raw_path.display())]
    MalformedResponse {
        /// Where the raw body was saved.
        raw_path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Neither envelope shape held any answer text.
    #[error(
        "No output text found in the service response (neither `output_text` nor `output[].content[].text`). Inspect {} for the raw envelope.",
        .raw_path.display()
    )]
    EmptyResponse {
        /// Where the raw body was saved.
        raw_path: PathBuf,
    },

    /// The answer text does not decode into the requested document.
    #[error("Model output does not match the {document} schema ({reason}). Inspect {}.", .path.display())]
    SchemaViolation {
        /// Target document name.
        document: &'static str,
        /// Where the extracted text was saved.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Transport or service-reported failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Case store failure.
    #[error(transparent)]
    Store(#[from] CaseError),
}

impl RunError {
    /// Process exit code: 2 for configuration and usage problems, 1 for
    /// pipeline failures.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingCredential { .. }
            | Self::MissingInput { .. }
            | Self::NoKnownCases { .. }
            | Self::Config(_) => 2,
            Self::MalformedResponse { .. }
            | Self::EmptyResponse { .. }
            | Self::SchemaViolation { .. }
            | Self::Llm(_)
            | Self::Store(_) => 1,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
