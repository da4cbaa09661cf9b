// Integration tests for `lesart generate`.
// Run with: cargo test -p lesart-cli --test generate

use std::fs;
use std::path::Path;
use std::process::Command;

use httpmock::prelude::*;

fn lesart() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lesart"));
    // Clear env to avoid leaking a real key into tests
    cmd.env_remove("LESART_API_KEY");
    cmd
}

/// Write a full 1..=140 corpus and an explanation map covering everything
/// except `missing`.
fn write_fixtures(dir: &Path, missing: &[&str]) {
    let props: Vec<serde_json::Value> = (1..=140)
        .map(|n| {
            serde_json::json!({
                "number": n.to_string(),
                "text": format!("passage {}", n),
                "section": "I",
            })
        })
        .collect();
    fs::write(
        dir.join("propositions.json"),
        serde_json::to_string_pretty(&props).unwrap(),
    )
    .unwrap();

    let mut map = serde_json::Map::new();
    for n in 1..=140u32 {
        let num = n.to_string();
        if missing.contains(&num.as_str()) {
            continue;
        }
        map.insert(
            num.clone(),
            serde_json::json!({
                "brief": format!("brief {}", num),
                "comprehensive": format!("**Context**\n\ncomprehensive {}", num),
            }),
        );
    }
    fs::write(
        dir.join("explanations.json"),
        serde_json::to_string_pretty(&serde_json::Value::Object(map)).unwrap(),
    )
    .unwrap();
}

fn message_response(brief: &str, comprehensive: &str) -> serde_json::Value {
    let reply = serde_json::json!({
        "brief": brief,
        "comprehensive": comprehensive,
    })
    .to_string();
    serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": reply }],
        "model": "test-model",
        "stop_reason": "end_turn"
    })
}

fn load_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn completed(dir: &Path) -> Vec<String> {
    let progress = load_json(&dir.join("progress.json"));
    progress["completed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn run_generate(dir: &Path, base_url: &str, count: &str) -> std::process::Output {
    lesart()
        .args([
            "generate",
            "--test",
            count,
            "--api-key",
            "sk-test",
            "--delay",
            "0",
            "--base-url",
            base_url,
            "--data-dir",
        ])
        .arg(dir)
        .arg("-q")
        .output()
        .expect("failed to run lesart")
}

#[test]
fn test_mode_generates_and_checkpoints() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_fixtures(dir, &["5", "6"]);
    let pre = fs::read_to_string(dir.join("explanations.json")).unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(message_response("generated brief", "**G**\n\ngenerated"));
    });

    let output = run_generate(dir, &server.base_url(), "2");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    mock.assert_calls(2);

    let map = load_json(&dir.join("explanations.json"));
    assert_eq!(map["5"]["brief"], "generated brief");
    assert_eq!(map["6"]["brief"], "generated brief");
    assert_eq!(map.as_object().unwrap().len(), 140);

    assert_eq!(completed(dir), vec!["5", "6"]);
    let progress = load_json(&dir.join("progress.json"));
    assert!(!progress["timestamp"].as_str().unwrap().is_empty());

    // Backup is the pre-run map, without "5" and "6"
    let backup = fs::read_to_string(dir.join("explanations_backup.json")).unwrap();
    assert_eq!(backup, pre);
}

#[test]
fn failure_mid_batch_skips_only_that_key() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_fixtures(dir, &["5", "6", "7"]);

    let server = MockServer::start();
    // Reject only the request for proposition 6; the target line in the
    // request is unique to it. Mocks match in creation order, so the
    // specific mock goes first.
    let reject = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .body_includes("NOW EXPLAIN:\\nProposition 6:");
        then.status(400).json_body(serde_json::json!({
            "error": { "type": "invalid_request_error", "message": "bad request" }
        }));
    });
    let accept = server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(message_response("generated brief", "**G**\n\ngenerated"));
    });

    let output = run_generate(dir, &server.base_url(), "3");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    reject.assert_calls(1);
    accept.assert_calls(2);

    // The batch continued past the failure: "5" and "7" written, "6" not
    let map = load_json(&dir.join("explanations.json"));
    assert_eq!(map["5"]["brief"], "generated brief");
    assert_eq!(map["7"]["brief"], "generated brief");
    assert!(map.get("6").is_none());
    assert_eq!(completed(dir), vec!["5", "7"]);
}

#[test]
fn failed_key_stays_missing_and_backup_is_written_once() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_fixtures(dir, &["5", "6"]);

    // Run 1: upstream rejects the request; "5" stays missing
    let failing = MockServer::start();
    failing.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(400).json_body(serde_json::json!({
            "error": { "type": "invalid_request_error", "message": "bad request" }
        }));
    });
    let output = run_generate(dir, &failing.base_url(), "1");
    assert_eq!(output.status.code(), Some(0));

    let map = load_json(&dir.join("explanations.json"));
    assert!(map.get("5").is_none());
    assert!(completed(dir).is_empty());

    // Run 2: upstream recovers; the same key is recomputed as missing
    let working = MockServer::start();
    working.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(message_response("recovered", "**G**\n\nrecovered"));
    });
    let output = run_generate(dir, &working.base_url(), "1");
    assert_eq!(output.status.code(), Some(0));

    let map = load_json(&dir.join("explanations.json"));
    assert_eq!(map["5"]["brief"], "recovered");
    assert_eq!(completed(dir), vec!["5"]);

    // Run 3: resumed run (completed non-empty) must not rewrite the backup
    let output = run_generate(dir, &failing.base_url(), "1");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(completed(dir), vec!["5"]);

    let backup = load_json(&dir.join("explanations_backup.json"));
    assert!(backup.get("5").is_none(), "backup must predate the run");
}

#[test]
fn missing_api_key_exits_50_before_any_write() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_fixtures(dir, &["5"]);

    let output = lesart()
        .args(["generate", "--test", "--data-dir"])
        .arg(dir)
        .arg("-q")
        .output()
        .expect("failed to run lesart");

    assert_eq!(
        output.status.code(),
        Some(50),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing model API key"), "stderr: {}", stderr);

    assert!(!dir.join("progress.json").exists());
    assert!(!dir.join("explanations_backup.json").exists());
}

#[test]
fn no_mode_prints_usage_and_touches_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    write_fixtures(dir, &["5"]);

    let output = lesart()
        .args(["generate", "--api-key", "sk-test", "--data-dir"])
        .arg(dir)
        .output()
        .expect("failed to run lesart");

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);

    assert!(!dir.join("progress.json").exists());
    assert!(!dir.join("explanations_backup.json").exists());
}

#[test]
fn test_and_all_conflict_exits_2() {
    let output = lesart()
        .args(["generate", "--test", "--all"])
        .output()
        .expect("failed to run lesart");

    assert_eq!(output.status.code(), Some(2));
}
