//! Integration tests for plan/apply commands and the audit ledger.

#![allow(clippy::expect_used)]

use predicates::prelude::*;
use rusqlite::Connection;

use crate::cli_tests::{deck, workspace_with_web};

fn ledger_rows(dir: &tempfile::TempDir) -> Vec<(String, String, String)> {
    let conn = Connection::open(dir.path().join("state.db")).expect("open ledger");
    let mut stmt = conn
        .prepare("SELECT command, mode, payload FROM events ORDER BY id")
        .expect("prepare");
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows")
}

#[test]
fn test_deploy_plan_records_one_event() {
    let dir = workspace_with_web();
    deck(&dir)
        .args(["deploy", "web", "--target", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[plan]"))
        .stdout(predicate::str::contains("docker compose"))
        .stdout(predicate::str::contains("--apply"));

    let rows = ledger_rows(&dir);
    assert_eq!(rows.len(), 1);
    let (command, mode, payload) = &rows[0];
    assert_eq!(command, "deploy");
    assert_eq!(mode, "plan");
    let payload: serde_json::Value = serde_json::from_str(payload).expect("payload json");
    assert_eq!(payload, serde_json::json!({"target": "staging"}));
}

#[test]
fn test_apply_of_unimplemented_provider_exits_three() {
    let dir = workspace_with_web();
    deck(&dir)
        .args(["--apply", "deploy", "web"])
        .assert()
        .code(3);

    let rows = ledger_rows(&dir);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, "apply");
}

#[test]
fn test_operation_json_keeps_stdout_clean() {
    let dir = workspace_with_web();
    let out = deck(&dir)
        .args(["stop", "web", "--json"])
        .output()
        .expect("run");
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(value["command"], "stop");
    assert_eq!(value["mode"], "plan");
    assert_eq!(value["outcome"], "planned");
    assert_eq!(value["plan"], "would stop web via compose");
    assert!(String::from_utf8_lossy(&out.stderr).contains("[plan]"));
}

#[test]
fn test_every_mutating_command_is_recorded() {
    let dir = workspace_with_web();
    for args in [
        vec!["deploy", "web"],
        vec!["backup", "web", "--verify"],
        vec!["migrate", "web", "--to", "prod"],
        vec!["start", "web"],
        vec!["stop", "web"],
    ] {
        deck(&dir).args(&args).assert().success();
    }

    let commands: Vec<String> = ledger_rows(&dir).into_iter().map(|r| r.0).collect();
    assert_eq!(commands, ["deploy", "backup", "migrate", "start", "stop"]);
}

#[test]
fn test_unwritable_state_still_runs() {
    let dir = workspace_with_web();
    std::fs::write(dir.path().join("blocker"), "").expect("write");
    deck(&dir)
        .args(["--state", "blocker/state.db", "start", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("audit ledger unavailable"));
}

#[test]
fn test_history_json_is_newest_first() {
    let dir = workspace_with_web();
    deck(&dir).args(["start", "web"]).assert().success();
    deck(&dir).args(["stop", "web"]).assert().success();

    let out = deck(&dir)
        .args(["history", "web", "--json", "--limit", "1"])
        .output()
        .expect("run");
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let events = value["events"].as_array().expect("events array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["command"], "stop");
    assert!(events[0]["ts"].as_str().is_some_and(|ts| ts.ends_with('Z')));
}

#[test]
fn test_invalid_spec_aborts_before_plan_and_ledger() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let svc = dir.path().join("services/api");
    std::fs::create_dir_all(&svc).expect("mkdir");
    std::fs::write(
        svc.join("service.yaml"),
        "apiVersion: v1\nkind: Service\nmetadata:\n  name: api\nspec:\n  deployment:\n    target: staging\n",
    )
    .expect("write spec");

    deck(&dir)
        .args(["deploy", "api"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[plan]").not())
        .stderr(predicate::str::contains("spec.deployment.method is required"));

    let out = deck(&dir)
        .args(["deploy", "api", "--json"])
        .output()
        .expect("run");
    assert_eq!(out.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "INVALID_SERVICE_SPEC");
    assert!(!String::from_utf8_lossy(&out.stderr).contains("[plan]"));

    assert!(!dir.path().join("state.db").exists());
}
