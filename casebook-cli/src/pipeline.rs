//! The call → persist → extract → decode sequence shared by both modes.

use std::path::PathBuf;

use casebook_core::CaseStore;
use casebook_llm::{LlmError, ResponsesRequest, Transport, extract_output_text};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::Mode;
use crate::error::RunError;

/// Answer text pulled out of a response, with the artifacts written on the way.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Trimmed answer text.
    pub text: String,
    /// `out/response_raw_<mode>.json`.
    pub raw_path: PathBuf,
    /// `out/output_text_<mode>.json`.
    pub text_path: PathBuf,
}

/// Send `request`, save the raw body, then extract and save the answer text.
///
/// The raw body is written before it is inspected, so it is on disk for every
/// outcome except a transport failure.
///
/// # Errors
/// Transport and service errors pass through as [`RunError::Llm`]; a non-JSON
/// body or an envelope without text names the raw artifact.
pub async fn complete<T: Transport + ?Sized>(
    transport: &T,
    store: &CaseStore,
    mode: Mode,
    request: &ResponsesRequest,
) -> Result<Extracted, RunError> {
    info!(%mode, model = %request.model, "Calling completion service");
    let raw = transport.send(request).await?;
    let raw_path = store.write_artifact(&mode.raw_artifact(), &raw)?;

    let text = extract_output_text(&raw).map_err(|err| match err {
        LlmError::NoOutputText => RunError::EmptyResponse {
            raw_path: raw_path.clone(),
        },
        LlmError::ParseError(reason) => RunError::MalformedResponse {
            raw_path: raw_path.clone(),
            reason,
        },
        other => RunError::Llm(other),
    })?;
    let text_path = store.write_artifact(&mode.text_artifact(), &text)?;

    Ok(Extracted {
        text,
        raw_path,
        text_path,
    })
}

/// Decode the extracted text into the document the schema promised.
///
/// # Errors
/// Returns [`RunError::SchemaViolation`]; never retried.
pub fn decode<T: DeserializeOwned>(extracted: &Extracted, document: &'static str) -> Result<T, RunError> {
    serde_json::from_str(&extracted.text).map_err(|e| RunError::SchemaViolation {
        document,
        path: extracted.text_path.clone(),
        reason: e.to_string(),
    })
}
