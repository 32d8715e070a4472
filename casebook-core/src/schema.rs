//! JSON-Schema output contracts handed to the model.
//!
//! The remote service decodes under these schemas (strict mode), which is what
//! makes the extracted text reliably decodable into [`crate::types`].
//! Every object level sets `additionalProperties: false` and lists all of its
//! properties as required, as strict mode demands.

use serde_json::{Map, Value, json};

use crate::types::{MAX_FILES_TOUCHED, MAX_SIMILAR_CASES, MAX_TOP_FRAMES};

/// Schema for [`crate::CaseOutput`].
#[must_use]
pub fn analyze_schema() -> Value {
    let crash_signature = object(&[
        ("exception", string()),
        ("top_frames", string_array(MAX_TOP_FRAMES)),
    ]);
    let pr_evidence = object(&[
        ("files_touched", string_array(MAX_FILES_TOUCHED)),
        ("why_related", string()),
    ]);

    object(&[
        ("crash_signature", crash_signature),
        ("hypothesis", string()),
        ("solution_pattern", string()),
        ("pr_evidence", pr_evidence),
    ])
}

/// Schema for [`crate::SimilarCasesResult`].
#[must_use]
pub fn match_schema() -> Value {
    let related_pr = object(&[("url", string()), ("title", string())]);
    let hit = object(&[
        ("case_id", string()),
        ("similarity_reason", string()),
        ("related_pr", related_pr),
    ]);

    object(&[(
        "similar_cases",
        json!({
            "type": "array",
            "maxItems": MAX_SIMILAR_CASES,
            "items": hit,
        }),
    )])
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn string() -> Value {
    json!({ "type": "string" })
}

fn string_array(max_items: usize) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "maxItems": max_items,
    })
}

/// Closed object whose properties are all required, in declaration order.
fn object(properties: &[(&str, Value)]) -> Value {
    let mut props = Map::new();
    for (name, schema) in properties {
        props.insert((*name).to_string(), schema.clone());
    }
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": props,
        "required": required,
    })
}
