//! Outbound request envelope for the Responses API.
//!
//! ```json
//! {
//!   "model": "gpt-4o-mini",
//!   "instructions": "Return only valid JSON ...",
//!   "input": "<rendered prompt>",
//!   "text": { "format": { "type": "json_schema", "name": "...", "strict": true, "schema": { ... } } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output format type requesting schema-constrained decoding.
pub const JSON_SCHEMA_FORMAT: &str = "json_schema";

/// A request to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Model identifier.
    pub model: String,
    /// One-line steering instruction.
    pub instructions: String,
    /// Rendered prompt.
    pub input: String,
    /// Output contract.
    pub text: TextConfig,
}

/// Wrapper around the output format, as the wire format nests it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Requested output format.
    pub format: TextFormat,
}

/// Schema-constrained output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFormat {
    /// Always [`JSON_SCHEMA_FORMAT`] for requests built here.
    #[serde(rename = "type")]
    pub kind: String,
    /// Format name; required by the service.
    pub name: String,
    /// Ask the service to enforce the schema exactly.
    pub strict: bool,
    /// JSON-Schema the answer must conform to.
    pub schema: Value,
}

impl ResponsesRequest {
    /// Build a strict JSON-schema request.
    #[must_use]
    pub fn json_schema(
        model: impl Into<String>,
        instructions: impl Into<String>,
        input: impl Into<String>,
        format_name: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            input: input.into(),
            text: TextConfig {
                format: TextFormat {
                    kind: JSON_SCHEMA_FORMAT.to_string(),
                    name: format_name.into(),
                    strict: true,
                    schema,
                },
            },
        }
    }
}
