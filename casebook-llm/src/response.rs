//! Response envelope parsing.
//!
//! The service returns the model's answer in one of two shapes, depending on
//! service version and configuration:
//!
//! ```text
//! direct:  { "output_text": "<answer>" }
//! nested:  { "output": [ { "content": [ { "text": "<part>" }, ... ] }, ... ] }
//! ```
//!
//! Either may be accompanied by a top-level `error` object, which takes
//! precedence. Nothing here assumes a canonical shape: every level is probed
//! through [`serde_json::Value`] and anything unexpected is skipped.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LlmError;

/// Extract the model's answer text from a raw response body.
///
/// # Errors
/// - [`LlmError::ParseError`] if the body is not JSON.
/// - [`LlmError::Api`] if the body carries a non-null `error` object.
/// - [`LlmError::NoOutputText`] if neither shape yields any text.
pub fn extract_output_text(raw_body: &str) -> Result<String, LlmError> {
    let root: Value =
        serde_json::from_str(raw_body).map_err(|e| LlmError::ParseError(e.to_string()))?;

    check_for_api_error(&root)?;

    if let Some(text) = root.get("output_text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            debug!("Answer found in direct output_text");
            return Ok(text.trim().to_string());
        }
    }

    let texts = nested_texts(&root);
    if texts.is_empty() {
        warn!("Response envelope carried no output text");
        return Err(LlmError::NoOutputText);
    }

    debug!(blocks = texts.len(), "Answer assembled from output content blocks");
    Ok(texts.join("\n").trim().to_string())
}

/// Fail with [`LlmError::Api`] when `root.error` is present and non-null.
///
/// # Errors
/// Returns the decoded service error.
pub fn check_for_api_error(root: &Value) -> Result<(), LlmError> {
    let Some(err) = root.get("error").filter(|e| !e.is_null()) else {
        return Ok(());
    };

    let message = err
        .get("message")
        .and_then(scalar_text)
        .unwrap_or_else(|| "unknown error".to_string());
    let code = err.get("code").and_then(scalar_text);
    let kind = err.get("type").and_then(scalar_text);

    warn!(code = ?code, kind = ?kind, "Service reported an error");
    Err(LlmError::Api { message, code, kind })
}

/// Non-blank `output[].content[].text` values in encounter order.
fn nested_texts(root: &Value) -> Vec<&str> {
    root.get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Strings as-is, numbers and booleans rendered; null and containers skipped.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_text() {
        assert_eq!(extract_output_text(r#"{"output_text": "hello"}"#), Ok("hello".into()));
    }

    #[test]
    fn direct_text_is_trimmed() {
        let body = r#"{"output_text": "\n  {\"a\": 1}  \n"}"#;
        assert_eq!(extract_output_text(body), Ok(r#"{"a": 1}"#.into()));
    }

    #[test]
    fn nested_blocks_are_joined() {
        let body = r#"{"output": [{"content": [{"text": "a"}, {"text": "b"}]}]}"#;
        assert_eq!(extract_output_text(body), Ok("a\nb".into()));
    }

    #[test]
    fn nested_across_items_skips_odd_shapes() {
        let body = r#"{
            "output": [
                {"type": "reasoning", "summary": []},
                {"content": [{"type": "output_text", "text": "a"}, {"text": "   "}, {"refusal": "no"}]},
                {"content": "not an array"},
                {"content": [{"text": 42}, {"text": "b"}]}
            ]
        }"#;
        assert_eq!(extract_output_text(body), Ok("a\nb".into()));
    }

    #[test]
    fn blank_direct_text_falls_through_to_nested() {
        let body = r#"{"output_text": "  ", "output": [{"content": [{"text": "x"}]}]}"#;
        assert_eq!(extract_output_text(body), Ok("x".into()));
    }

    #[test]
    fn error_object_wins() {
        let body = r#"{"error": {"message": "boom", "code": "x"}, "output_text": "ignored"}"#;
        let err = extract_output_text(body).expect_err("api error");
        assert_eq!(
            err,
            LlmError::Api {
                message: "boom".into(),
                code: Some("x".into()),
                kind: None,
            }
        );
        let shown = err.to_string();
        assert!(shown.contains("boom") && shown.contains("x"));
    }

    #[test]
    fn null_error_is_ignored() {
        let body = r#"{"error": null, "output_text": "ok"}"#;
        assert_eq!(extract_output_text(body), Ok("ok".into()));
    }

    #[test]
    fn error_without_message_uses_placeholder() {
        let body = r#"{"error": {"code": 429, "type": null}}"#;
        assert_eq!(
            extract_output_text(body),
            Err(LlmError::Api {
                message: "unknown error".into(),
                code: Some("429".into()),
                kind: None,
            })
        );
    }

    #[test]
    fn nothing_found() {
        assert_eq!(extract_output_text(r#"{"id": "resp_1"}"#), Err(LlmError::NoOutputText));
        assert_eq!(
            extract_output_text(r#"{"output": [{"content": []}]}"#),
            Err(LlmError::NoOutputText)
        );
    }

    #[test]
    fn not_json() {
        assert!(matches!(
            extract_output_text("<html>502 Bad Gateway</html>"),
            Err(LlmError::ParseError(_))
        ));
    }
}
