//! `match` — new crash report → most similar known cases.
//!
//! Every minimal case under the configured directory is rendered into the
//! prompt; the model ranks them. Only the top hit feeds the chat summary, the
//! full ranking is written to `out/similar_cases.json`.

use std::path::PathBuf;

use casebook_core::store::{self, SIMILAR_CASES_ARTIFACT};
use casebook_core::{MinimalCase, SimilarCasesResult, projection, schema};
use casebook_llm::{ResponsesRequest, Transport};
use tracing::info;

use crate::Mode;
use crate::config::CasebookConfig;
use crate::error::RunError;
use crate::pipeline;
use crate::workspace::Workspace;

/// What a successful match run produced.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Ranked hits as decoded.
    pub result: SimilarCasesResult,
    /// Chat-style summary of the top hit.
    pub chat: String,
    /// `out/similar_cases.json`.
    pub saved: PathBuf,
    /// How many known cases were offered to the model.
    pub known_cases: usize,
}

/// Build the match request from the new crash and the known-case corpus.
#[must_use]
pub fn build_request(config: &CasebookConfig, new_crash: &str, known: &[MinimalCase]) -> ResponsesRequest {
    ResponsesRequest::json_schema(
        &config.llm.model,
        &config.prompts.match_instructions,
        config
            .prompts
            .render_match(new_crash, &store::render_known_cases(known)),
        &config.prompts.match_format_name,
        schema::match_schema(),
    )
}

/// Run the match workflow.
///
/// # Errors
/// Fails before any network call when the crash file is missing or no
/// minimal case exists; afterwards as for analyze.
pub async fn run<T: Transport + ?Sized>(
    transport: &T,
    config: &CasebookConfig,
    workspace: &Workspace,
) -> Result<MatchReport, RunError> {
    workspace.require_inputs(&[workspace.crash_file()])?;

    let known = workspace.store().load_all_minimal_cases()?;
    if known.is_empty() {
        return Err(RunError::NoKnownCases {
            dir: workspace.store().config().minimal_cases_dir.clone(),
        });
    }
    info!(known_cases = known.len(), "Loaded known cases");

    let new_crash = workspace.read_input(workspace.crash_file())?;
    let request = build_request(config, &new_crash, &known);
    let extracted = pipeline::complete(transport, workspace.store(), Mode::Match, &request).await?;
    let result: SimilarCasesResult = pipeline::decode(&extracted, "SimilarCasesResult")?;

    let chat = projection::format_for_chat(&result);
    let saved = workspace
        .store()
        .write_json_artifact(SIMILAR_CASES_ARTIFACT, &result)?;

    info!(
        hits = result.similar_cases.len(),
        best = result.best().map_or("none", |hit| hit.case_id.as_str()),
        "Match complete"
    );
    Ok(MatchReport {
        result,
        chat,
        saved,
        known_cases: known.len(),
    })
}
