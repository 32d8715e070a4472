//! Core type definitions for the casebook knowledge base.
//!
//! Field names on the wire are `snake_case` and must line up with the output
//! schemas in [`crate::schema`]; the model is asked to produce exactly these
//! documents.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum stack frames kept in a [`CrashSignature`].
pub const MAX_TOP_FRAMES: usize = 8;

/// Maximum touched files listed in [`PrEvidence`].
pub const MAX_FILES_TOUCHED: usize = 12;

/// Maximum hits returned by a similarity lookup.
pub const MAX_SIMILAR_CASES: usize = 3;

/// Sentinel used when a PR url or title cannot be extracted.
pub const UNKNOWN: &str = "unknown";

/// `chrono` format of a [`CaseId`] (`yyyyMMdd-HHmmss`).
pub const CASE_ID_FORMAT: &str = "%Y%m%d-%H%M%S";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Wall-clock identifier of a case, second resolution.
///
/// Two analyze runs inside the same second produce the same id and the second
/// run overwrites the first run's files. No de-duplication is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseId(String);

impl CaseId {
    /// Id for the current local time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&Local::now().naive_local())
    }

    /// Id for an explicit timestamp.
    #[must_use]
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self(dt.format(CASE_ID_FORMAT).to_string())
    }

    /// The bare timestamp, e.g. `20240131-094512`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The label stored inside a minimal case, e.g. `case-20240131-094512`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("case-{}", self.0)
    }

    /// File name shared by the full and minimal case files.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("case-{}.json", self.0)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Full case (analyze output)
// ---------------------------------------------------------------------------

/// Exception identifier plus the most relevant stack frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashSignature {
    /// Exception class or identifier.
    pub exception: String,
    /// Ordered frames, at most [`MAX_TOP_FRAMES`].
    pub top_frames: Vec<String>,
}

/// What the fixing pull request touched and why it relates to the crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrEvidence {
    /// Ordered file paths, at most [`MAX_FILES_TOUCHED`].
    pub files_touched: Vec<String>,
    /// Free-text explanation.
    pub why_related: String,
}

/// A full case as extracted by the model. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutput {
    /// Crash identity.
    pub crash_signature: CrashSignature,
    /// Probable root-cause mechanism.
    pub hypothesis: String,
    /// The fix pattern that prevents the crash.
    pub solution_pattern: String,
    /// Evidence drawn from the pull request.
    pub pr_evidence: PrEvidence,
}

// ---------------------------------------------------------------------------
// Minimal case
// ---------------------------------------------------------------------------

/// Link to the pull request that resolved a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPr {
    /// Pull request URL, or [`UNKNOWN`].
    pub url: String,
    /// Pull request title, or [`UNKNOWN`].
    pub title: String,
}

impl RelatedPr {
    /// Both fields set to the [`UNKNOWN`] sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            url: UNKNOWN.to_string(),
            title: UNKNOWN.to_string(),
        }
    }
}

/// Searchable projection of a [`CaseOutput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalCase {
    /// `case-<timestamp>`.
    pub case_id: String,
    /// Copied verbatim from the full case.
    pub crash_signature: CrashSignature,
    /// Hypothesis cut to 280 characters.
    pub problem_summary: String,
    /// Trimmed solution pattern.
    pub solution_pattern: String,
    /// PR extracted from the raw PR text.
    pub related_pr: RelatedPr,
}

// ---------------------------------------------------------------------------
// Similarity lookup (match output)
// ---------------------------------------------------------------------------

/// One known case the model considers similar to a new crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCaseHit {
    /// Id of the matched minimal case.
    pub case_id: String,
    /// Why the model considers it similar.
    pub similarity_reason: String,
    /// PR that fixed the matched case.
    pub related_pr: RelatedPr,
}

/// Ranked hits, best first. Ranking is the model's and is trusted as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCasesResult {
    /// Zero to [`MAX_SIMILAR_CASES`] hits.
    pub similar_cases: Vec<SimilarCaseHit>,
}

impl SimilarCasesResult {
    /// Highest-ranked hit, if any.
    #[must_use]
    pub fn best(&self) -> Option<&SimilarCaseHit> {
        self.similar_cases.first()
    }
}
