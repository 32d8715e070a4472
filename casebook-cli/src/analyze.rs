//! `analyze` — crash report + fixing PR → stored case.
//!
//! ```text
//! crash.txt, pr.txt ─► prompt ─► service ─► out/response_raw_analyze.json
//!                                             │ extract
//!                                             ▼
//!                                   out/output_text_analyze.json
//!                                             │ decode CaseOutput
//!                                             ▼
//!          out/case.json, cases/case-<id>.json, cases_min/case-<id>.json
//! ```

use casebook_core::projection;
use casebook_core::schema;
use casebook_core::store::SavedCase;
use casebook_core::{CaseError, CaseId, CaseOutput, MinimalCase};
use casebook_llm::{ResponsesRequest, Transport};
use tracing::info;

use crate::Mode;
use crate::config::CasebookConfig;
use crate::error::RunError;
use crate::pipeline;
use crate::workspace::Workspace;

/// What a successful analyze run produced.
#[derive(Debug, Clone)]
pub struct AnalyzeReport {
    /// Timestamp id shared by both case files.
    pub case_id: CaseId,
    /// Decoded full case.
    pub case: CaseOutput,
    /// Derived minimal case.
    pub minimal: MinimalCase,
    /// Files written for the case.
    pub saved: SavedCase,
}

impl AnalyzeReport {
    /// Pretty JSON of the full case, as written to disk.
    ///
    /// # Errors
    /// Returns an error only if serialization fails.
    pub fn pretty_case(&self) -> Result<String, RunError> {
        Ok(serde_json::to_string_pretty(&self.case).map_err(CaseError::from)?)
    }
}

/// Build the analyze request from raw crash and PR text.
#[must_use]
pub fn build_request(config: &CasebookConfig, crash: &str, pr: &str) -> ResponsesRequest {
    ResponsesRequest::json_schema(
        &config.llm.model,
        &config.prompts.analyze_instructions,
        config.prompts.render_analyze(crash, pr),
        &config.prompts.analyze_format_name,
        schema::analyze_schema(),
    )
}

/// Run the analyze workflow.
///
/// `transport` is called once; wrap it in a
/// [`casebook_llm::RetryingTransport`] for backoff.
///
/// # Errors
/// Missing inputs, transport or service failures, an envelope without text,
/// schema violations and store failures all end the run. Case files are only
/// written after the output decoded successfully.
pub async fn run<T: Transport + ?Sized>(
    transport: &T,
    config: &CasebookConfig,
    workspace: &Workspace,
) -> Result<AnalyzeReport, RunError> {
    workspace.require_inputs(&[workspace.crash_file(), workspace.pr_file()])?;

    let crash = workspace.read_input(workspace.crash_file())?;
    let pr = workspace.read_input(workspace.pr_file())?;

    let request = build_request(config, &crash, &pr);
    let extracted = pipeline::complete(transport, workspace.store(), Mode::Analyze, &request).await?;
    let case: CaseOutput = pipeline::decode(&extracted, "CaseOutput")?;

    let case_id = CaseId::now();
    let related_pr = projection::extract_related_pr(&pr);
    let minimal = projection::to_minimal_case(&case_id, &case, related_pr);
    let saved = workspace.store().save_case(&case_id, &case, &minimal)?;

    info!(
        case_id = %case_id,
        exception = %case.crash_signature.exception,
        pr = %minimal.related_pr.url,
        "Analyze complete"
    );
    Ok(AnalyzeReport {
        case_id,
        case,
        minimal,
        saved,
    })
}
