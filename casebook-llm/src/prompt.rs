//! Prompt templates for casebook LLM operations.
//!
//! Templates use `{PLACEHOLDER}` tokens replaced textually by
//! [`render_template`]. A token absent from a template is simply not
//! substituted. Built-in defaults can be overridden from the `[prompts]`
//! table of `casebook.toml`.

use serde::{Deserialize, Serialize};

/// Placeholder for the raw crash report in the analyze prompt.
pub const CRASH_CONTENT: &str = "CRASH_CONTENT";
/// Placeholder for the raw PR text in the analyze prompt.
pub const PR_CONTENT: &str = "PR_CONTENT";
/// Placeholder for the new crash report in the match prompt.
pub const NEW_CRASH_CONTENT: &str = "NEW_CRASH_CONTENT";
/// Placeholder for the rendered known cases in the match prompt.
pub const KNOWN_CASES_CONTENT: &str = "KNOWN_CASES_CONTENT";

/// Crash + PR → reusable case record.
pub const ANALYZE_TEMPLATE: &str = r#"You are an experienced Android engineer analyzing a real crash
and the GitHub Pull Request that was created to fix it.

Your goal is to produce a reusable technical record for an internal
knowledge base, helping other developers recognize and resolve similar
problems in the future.

QUALITY RULES:
- Do not treat conclusions as absolute truths.
- Use technical, probabilistic language ("suggests", "probably", "indicates").
- Do not invent information that is not supported by the crash or the PR.
- If something cannot be inferred safely, say so explicitly.
- Prefer explaining the technical mechanism (lifecycle, timing, scope, state)
  over merely describing the code change.

STATE THE HYPOTHESIS RIGOROUSLY:
- Explain which technical mechanism probably caused the crash
  (e.g. Fragment accessed before onAttach, scope active outside the lifecycle,
  dependency created in the constructor, etc.).
- Make clear at which point of the lifecycle the error tends to happen.

DESCRIBE THE SOLUTION PATTERN:
- Focus on the technical pattern adopted and why it prevents the crash.

PULL REQUEST EVIDENCE:
- List the relevant files.
- Explain how the modified files relate to the crash site (even indirectly).

RETURN ONLY VALID JSON in the format below:

{
  "crash_signature": {
    "exception": "",
    "top_frames": []
  },
  "hypothesis": "",
  "solution_pattern": "",
  "pr_evidence": {
    "files_touched": [],
    "why_related": ""
  }
}

CRASH DATA (Crashlytics):
<<CRASH>>
{CRASH_CONTENT}
<<END_CRASH>>

PULL REQUEST DATA (GitHub):
<<PR>>
{PR_CONTENT}
<<END_PR>>"#;

/// New crash + known cases → ranked similar cases.
pub const MATCH_TEMPLATE: &str = r#"You are an experienced Android engineer helping to identify
whether a newly reported crash is similar to problems that were already solved.

Your task is to compare a new crash against a list of existing cases
from the knowledge base and identify the most similar ones.

IMPORTANT RULES:
- Assess technical similarity, not textual similarity.
- Prioritize the exception, top frames and lifecycle/timing context.
- Consider cases similar even across different classes if the technical mechanism is the same.
- If there is no relevant similarity, say so explicitly.
- Do not invent relationships that do not exist.
- If several cases represent the same technical pattern,
  return only the most representative one and drop the redundant ones.

RETURN ONLY VALID JSON in the format below:

{
  "similar_cases": [
    {
      "case_id": "",
      "similarity_reason": "",
      "related_pr": {
        "url": "",
        "title": ""
      }
    }
  ]
}

NEW CRASH:
<<NEW_CRASH>>
{NEW_CRASH_CONTENT}
<<END_NEW_CRASH>>

EXISTING CASES:
<<KNOWN_CASES>>
{KNOWN_CASES_CONTENT}
<<END_KNOWN_CASES>>"#;

/// Steering instruction for analyze requests.
pub const ANALYZE_INSTRUCTIONS: &str =
    "Return only valid JSON matching the schema, with no extra text.";

/// Steering instruction for match requests.
pub const MATCH_INSTRUCTIONS: &str =
    "Compare and return only valid JSON matching the schema, with no extra text.";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value, in order.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Prompt templates, steering instructions and output-format names per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    /// Analyze template (`{CRASH_CONTENT}`, `{PR_CONTENT}`).
    #[serde(default = "default_analyze")]
    pub analyze: String,
    /// Analyze steering instruction.
    #[serde(default = "default_analyze_instructions")]
    pub analyze_instructions: String,
    /// Name of the analyze output format.
    #[serde(default = "default_analyze_format_name")]
    pub analyze_format_name: String,
    /// Match template (`{NEW_CRASH_CONTENT}`, `{KNOWN_CASES_CONTENT}`).
    #[serde(default = "default_match_cases")]
    pub match_cases: String,
    /// Match steering instruction.
    #[serde(default = "default_match_instructions")]
    pub match_instructions: String,
    /// Name of the match output format.
    #[serde(default = "default_match_format_name")]
    pub match_format_name: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            analyze: default_analyze(),
            analyze_instructions: default_analyze_instructions(),
            analyze_format_name: default_analyze_format_name(),
            match_cases: default_match_cases(),
            match_instructions: default_match_instructions(),
            match_format_name: default_match_format_name(),
        }
    }
}

impl PromptSet {
    /// Render the analyze prompt.
    #[must_use]
    pub fn render_analyze(&self, crash: &str, pr: &str) -> String {
        render_template(&self.analyze, &[(CRASH_CONTENT, crash), (PR_CONTENT, pr)])
    }

    /// Render the match prompt.
    #[must_use]
    pub fn render_match(&self, new_crash: &str, known_cases: &str) -> String {
        render_template(
            &self.match_cases,
            &[(NEW_CRASH_CONTENT, new_crash), (KNOWN_CASES_CONTENT, known_cases)],
        )
    }
}

fn default_analyze() -> String { ANALYZE_TEMPLATE.to_string() }
fn default_analyze_instructions() -> String { ANALYZE_INSTRUCTIONS.to_string() }
fn default_analyze_format_name() -> String { "casebook_analyze_case".to_string() }
fn default_match_cases() -> String { MATCH_TEMPLATE.to_string() }
fn default_match_instructions() -> String { MATCH_INSTRUCTIONS.to_string() }
fn default_match_format_name() -> String { "casebook_match_similar".to_string() }
