//! End-to-end analyze and match runs against a scripted transport.

use std::fs;
use std::path::Path;

use casebook_cli::{CasebookConfig, RunError, Workspace, analyze, matcher};
use casebook_core::projection::{NO_MATCH_MESSAGE, SUMMARY_MAX_CHARS};
use casebook_core::store::{CASE_ARTIFACT, SIMILAR_CASES_ARTIFACT};
use casebook_core::{CaseOutput, MinimalCase, SimilarCasesResult};
use casebook_llm::{LlmError, RetryPolicy, RetryingTransport, ScriptedTransport};
use serde_json::json;
use tempfile::TempDir;

const CRASH: &str = "java.lang.NullPointerException: user was null\n\tat com.app.Profile.render(Profile.kt:42)\n";
const PR: &str = "Title: Guard against null user in profile\nhttps://github.com/acme/app/pull/17\nAdds a null check.";

fn case_json(hypothesis: &str) -> serde_json::Value {
    json!({
        "crash_signature": {
            "exception": "java.lang.NullPointerException",
            "top_frames": ["com.app.Profile.render(Profile.kt:42)"]
        },
        "hypothesis": hypothesis,
        "solution_pattern": "  Null-check the session user before rendering.  ",
        "pr_evidence": {
            "files_touched": ["app/src/main/java/com/app/Profile.kt"],
            "why_related": "Touches the crashing frame."
        }
    })
}

fn output_text_body(doc: &serde_json::Value) -> String {
    json!({ "output_text": doc.to_string() }).to_string()
}

fn nested_body(doc: &serde_json::Value) -> String {
    json!({
        "output": [
            { "type": "message", "content": [{ "type": "output_text", "text": doc.to_string() }] }
        ]
    })
    .to_string()
}

fn setup(crash: bool, pr: bool) -> (TempDir, CasebookConfig, Workspace) {
    let dir = TempDir::new().expect("tempdir");
    if crash {
        fs::write(dir.path().join("crash.txt"), CRASH).expect("write crash");
    }
    if pr {
        fs::write(dir.path().join("pr.txt"), PR).expect("write pr");
    }
    let config = CasebookConfig::default();
    let workspace = Workspace::new(dir.path(), &config);
    (dir, config, workspace)
}

fn json_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".json"))
        .collect();
    names.sort();
    names
}

fn seed_minimal_case(root: &Path, id: &str) {
    let case = json!({
        "case_id": format!("case-{id}"),
        "crash_signature": { "exception": "java.lang.NullPointerException", "top_frames": [] },
        "problem_summary": "User was null on profile render.",
        "solution_pattern": "Null-check the user.",
        "related_pr": { "url": "https://github.com/acme/app/pull/17", "title": "Guard null user" }
    });
    let dir = root.join("cases_min");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join(format!("case-{id}.json")), case.to_string()).expect("seed");
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_writes_all_three_case_files() {
    let (dir, config, workspace) = setup(true, true);
    let long_hypothesis = "h".repeat(SUMMARY_MAX_CHARS + 50);
    let transport = ScriptedTransport::ok(output_text_body(&case_json(&long_hypothesis)));

    let report = analyze::run(&transport, &config, &workspace).await.expect("analyze");

    assert_eq!(transport.call_count(), 1);
    assert!(report.saved.latest.ends_with(Path::new("out").join(CASE_ARTIFACT)));
    assert!(report.saved.archived.is_file());
    assert!(report.saved.minimal.is_file());
    assert_eq!(json_files(&dir.path().join("cases")).len(), 1);
    assert_eq!(json_files(&dir.path().join("cases_min")).len(), 1);

    let stored: CaseOutput =
        serde_json::from_str(&fs::read_to_string(&report.saved.archived).expect("read")).expect("decode");
    assert_eq!(stored, report.case);

    let minimal: MinimalCase =
        serde_json::from_str(&fs::read_to_string(&report.saved.minimal).expect("read")).expect("decode");
    assert_eq!(minimal.case_id, report.case_id.label());
    assert_eq!(minimal.problem_summary.chars().count(), SUMMARY_MAX_CHARS);
    assert_eq!(minimal.solution_pattern, "Null-check the session user before rendering.");
    assert_eq!(minimal.related_pr.url, "https://github.com/acme/app/pull/17");
    assert_eq!(minimal.related_pr.title, "Guard against null user in profile");

    assert!(dir.path().join("out/response_raw_analyze.json").is_file());
    assert!(dir.path().join("out/output_text_analyze.json").is_file());
}

#[tokio::test]
async fn analyze_accepts_nested_envelope() {
    let (_dir, config, workspace) = setup(true, true);
    let transport = ScriptedTransport::ok(nested_body(&case_json("Session expired mid-render.")));

    let report = analyze::run(&transport, &config, &workspace).await.expect("analyze");
    assert_eq!(report.case.hypothesis, "Session expired mid-render.");
    assert_eq!(report.case.crash_signature.exception, "java.lang.NullPointerException");
}

#[tokio::test]
async fn invalid_utf8_input_is_decoded_lossily() {
    let (dir, config, workspace) = setup(false, true);
    let crash: &[u8] = b"java.lang.IllegalStateException at Dump.kt:7 \xff\xfe garbage\n";
    fs::write(dir.path().join("crash.txt"), crash).expect("write crash");
    let transport = ScriptedTransport::ok(output_text_body(&case_json("x")));

    analyze::run(&transport, &config, &workspace).await.expect("analyze");

    let input = transport.requests()[0].input.clone();
    assert!(input.contains("Dump.kt:7 \u{FFFD}\u{FFFD} garbage"), "{input}");
}

#[tokio::test]
async fn analyze_request_carries_inputs_and_schema() {
    let (_dir, config, workspace) = setup(true, true);
    let transport = ScriptedTransport::ok(output_text_body(&case_json("x")));

    analyze::run(&transport, &config, &workspace).await.expect("analyze");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let wire = serde_json::to_value(&requests[0]).expect("serialize");
    assert_eq!(wire["model"], "gpt-4o-mini");
    assert_eq!(wire["text"]["format"]["type"], "json_schema");
    assert_eq!(wire["text"]["format"]["strict"], true);
    let input = wire["input"].as_str().expect("input");
    assert!(input.contains("Profile.kt:42"));
    assert!(input.contains("Guard against null user"));
}

#[tokio::test]
async fn api_error_surfaces_and_writes_no_case() {
    let (dir, config, workspace) = setup(true, true);
    let transport = ScriptedTransport::ok(json!({ "error": { "message": "boom", "code": "x" } }).to_string());

    let err = analyze::run(&transport, &config, &workspace).await.expect_err("api error");

    let msg = err.to_string();
    assert!(msg.contains("boom"), "{msg}");
    assert!(msg.contains("(x)"), "{msg}");
    assert_eq!(err.exit_code(), 1);
    assert!(dir.path().join("out/response_raw_analyze.json").is_file());
    assert!(!dir.path().join("out").join(CASE_ARTIFACT).exists());
    assert!(json_files(&dir.path().join("cases")).is_empty());
    assert!(json_files(&dir.path().join("cases_min")).is_empty());
}

#[tokio::test]
async fn envelope_without_text_names_raw_artifact() {
    let (dir, config, workspace) = setup(true, true);
    let transport = ScriptedTransport::ok(json!({ "output": [] }).to_string());

    let err = analyze::run(&transport, &config, &workspace).await.expect_err("empty");

    match &err {
        RunError::EmptyResponse { raw_path } => {
            assert_eq!(raw_path, &dir.path().join("out/response_raw_analyze.json"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("response_raw_analyze.json"));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (_dir, config, workspace) = setup(true, true);
    let transport = ScriptedTransport::ok("<html>502 Bad Gateway</html>");

    let err = analyze::run(&transport, &config, &workspace).await.expect_err("malformed");
    assert!(matches!(err, RunError::MalformedResponse { .. }));
}

#[tokio::test]
async fn output_not_matching_schema_is_rejected() {
    let (dir, config, workspace) = setup(true, true);
    let transport = ScriptedTransport::ok(output_text_body(&json!({ "hypothesis": "only this" })));

    let err = analyze::run(&transport, &config, &workspace).await.expect_err("schema");

    assert!(matches!(err, RunError::SchemaViolation { document: "CaseOutput", .. }));
    assert!(dir.path().join("out/output_text_analyze.json").is_file());
    assert!(json_files(&dir.path().join("cases")).is_empty());
}

#[tokio::test]
async fn missing_inputs_fail_before_any_call() {
    let (_dir, config, workspace) = setup(false, false);
    let transport = ScriptedTransport::ok(output_text_body(&case_json("x")));

    let err = analyze::run(&transport, &config, &workspace).await.expect_err("missing");

    match &err {
        RunError::MissingInput { missing, .. } => assert_eq!(missing.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("crash.txt") && msg.contains("pr.txt"), "{msg}");
    assert_eq!(err.exit_code(), 2);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn analyze_recovers_through_retry() {
    let (_dir, config, workspace) = setup(true, true);
    let scripted = ScriptedTransport::failing_then(
        2,
        LlmError::Unavailable("503".into()),
        output_text_body(&case_json("x")),
    );
    let transport = RetryingTransport::new(scripted.clone(), RetryPolicy::from(&config.llm.retry));

    analyze::run(&transport, &config, &workspace).await.expect("analyze");
    assert_eq!(scripted.call_count(), 3);
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

#[tokio::test]
async fn match_without_known_cases_fails_early() {
    let (_dir, config, workspace) = setup(true, false);
    let transport = ScriptedTransport::ok("{}");

    let err = matcher::run(&transport, &config, &workspace).await.expect_err("no cases");

    assert!(matches!(err, RunError::NoKnownCases { .. }));
    assert!(err.to_string().contains("casebook analyze"));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn match_reports_top_hit_and_saves_ranking() {
    let (dir, config, workspace) = setup(true, false);
    seed_minimal_case(dir.path(), "20250101-000000");
    seed_minimal_case(dir.path(), "20250102-000000");

    let result = json!({
        "similar_cases": [
            {
                "case_id": "case-20250102-000000",
                "similarity_reason": "Same null user in Profile.render.",
                "related_pr": { "url": "https://github.com/acme/app/pull/17", "title": "Guard null user" }
            },
            {
                "case_id": "case-20250101-000000",
                "similarity_reason": "Same exception type.",
                "related_pr": { "url": "unknown", "title": "unknown" }
            }
        ]
    });
    let transport = ScriptedTransport::ok(output_text_body(&result));

    let report = matcher::run(&transport, &config, &workspace).await.expect("match");

    assert_eq!(report.known_cases, 2);
    assert!(report.chat.contains("case-20250102-000000"));
    assert!(report.chat.contains("Same null user"));
    assert!(!report.chat.contains("Same exception type"));
    assert_eq!(report.saved, dir.path().join("out").join(SIMILAR_CASES_ARTIFACT));

    let saved: SimilarCasesResult =
        serde_json::from_str(&fs::read_to_string(&report.saved).expect("read")).expect("decode");
    assert_eq!(saved.similar_cases.len(), 2);

    let input = transport.requests()[0].input.clone();
    let first = input.find("case-20250101-000000").expect("first case rendered");
    let second = input.find("case-20250102-000000").expect("second case rendered");
    assert!(first < second);
    assert!(input.contains("Profile.kt:42"));
}

#[tokio::test]
async fn match_with_no_hits_says_so() {
    let (dir, config, workspace) = setup(true, false);
    seed_minimal_case(dir.path(), "20250101-000000");
    let transport = ScriptedTransport::ok(output_text_body(&json!({ "similar_cases": [] })));

    let report = matcher::run(&transport, &config, &workspace).await.expect("match");

    assert_eq!(report.chat, NO_MATCH_MESSAGE);
    assert!(report.saved.is_file());
}

#[tokio::test]
async fn corrupt_known_case_aborts_match() {
    let (dir, config, workspace) = setup(true, false);
    let min_dir = dir.path().join("cases_min");
    fs::create_dir_all(&min_dir).expect("mkdir");
    fs::write(min_dir.join("case-bad.json"), "{ not json").expect("write");
    let transport = ScriptedTransport::ok("{}");

    let err = matcher::run(&transport, &config, &workspace).await.expect_err("corrupt");
    assert!(matches!(err, RunError::Store(_)));
    assert_eq!(transport.call_count(), 0);
}
