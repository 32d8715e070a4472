//! Deterministic derivations from model output and raw PR text.
//!
//! - [`extract_related_pr`] — first GitHub PR url plus a best-effort title.
//! - [`to_minimal_case`] — full case → searchable minimal case.
//! - [`format_for_chat`] — top similarity hit → short chat message.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CaseId, CaseOutput, MinimalCase, RelatedPr, SimilarCasesResult, UNKNOWN};

/// Hypothesis characters kept as the minimal-case summary.
pub const SUMMARY_MAX_CHARS: usize = 280;

/// Characters kept when the first PR line stands in for a title.
pub const TITLE_MAX_CHARS: usize = 120;

/// Returned by [`format_for_chat`] when the lookup found nothing.
pub const NO_MATCH_MESSAGE: &str = "🤷 No similar case found in the knowledge base yet.";

const TITLE_PREFIX: &str = "title:";

static PR_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)https?://github\.com/\S+/pull/\d+").ok());

/// Pull the PR url and title out of free-form PR text.
///
/// The url is the first `https?://github.com/.../pull/<n>` match. The title
/// comes from the first line starting with `Title:` (any case), else the first
/// non-blank line cut to [`TITLE_MAX_CHARS`]. Either falls back to
/// [`UNKNOWN`].
#[must_use]
pub fn extract_related_pr(pr_text: &str) -> RelatedPr {
    let url = PR_URL
        .as_ref()
        .and_then(|re| re.find(pr_text))
        .map_or_else(|| UNKNOWN.to_string(), |m| m.as_str().to_string());

    let labelled = pr_text
        .lines()
        .map(str::trim)
        .find(|line| starts_with_ignore_case(line, TITLE_PREFIX))
        .map(|line| line[TITLE_PREFIX.len()..].trim())
        .filter(|title| !title.is_empty());

    let title = match labelled {
        Some(title) => title.to_string(),
        None => pr_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map_or_else(|| UNKNOWN.to_string(), |line| truncate_chars(line, TITLE_MAX_CHARS)),
    };

    RelatedPr { url, title }
}

/// Project a full case onto its searchable minimal form.
#[must_use]
pub fn to_minimal_case(case_id: &CaseId, case: &CaseOutput, related_pr: RelatedPr) -> MinimalCase {
    MinimalCase {
        case_id: case_id.label(),
        crash_signature: case.crash_signature.clone(),
        problem_summary: summarize(&case.hypothesis),
        solution_pattern: case.solution_pattern.trim().to_string(),
        related_pr,
    }
}

/// Trimmed hypothesis cut at [`SUMMARY_MAX_CHARS`] characters.
#[must_use]
pub fn summarize(hypothesis: &str) -> String {
    truncate_chars(hypothesis.trim(), SUMMARY_MAX_CHARS)
}

/// Chat-style summary of the best hit.
#[must_use]
pub fn format_for_chat(result: &SimilarCasesResult) -> String {
    let Some(best) = result.best() else {
        return NO_MATCH_MESSAGE.to_string();
    };

    let mut out = String::new();
    out.push_str("🔎 **We've seen this crash before**\n\n");
    out.push_str(&format!("- Case: {}\n", best.case_id));
    out.push_str(&format!("- Reason: {}\n", best.similarity_reason.trim()));
    out.push_str(&format!("- PR: {} ({})\n", best.related_pr.url, best.related_pr.title));
    out
}

/// Cut `s` to at most `max` Unicode scalar values.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
