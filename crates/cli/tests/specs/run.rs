// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reqproc run` specs
//!
//! Verify job outcome reporting and the console transcript written by the
//! file sink.

use crate::prelude::*;
use serde_json::{json, Value};

/// `(type, message, isSuccess)` of every event, for order-insensitive checks.
fn summarize(events: &[Value]) -> Vec<(String, String, Option<bool>)> {
    let mut rows: Vec<_> = events
        .iter()
        .map(|e| {
            (
                e["type"].as_str().unwrap_or_default().to_string(),
                e["message"].as_str().unwrap_or_default().to_string(),
                e["isSuccess"].as_bool(),
            )
        })
        .collect();
    rows.sort();
    rows
}

#[test]
fn successful_job_reports_success() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-1"}), GREETING_SCRIPT);

    temp.reqproc()
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .passes()
        .stdout_eq("job:j-1: SUCCESS\n");
}

#[test]
fn successful_job_writes_console_transcript() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-1"}), GREETING_SCRIPT);

    temp.reqproc()
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .passes();

    let events = temp.console_events("console.jsonl");
    assert!(events.iter().all(|e| e["ownerId"] == "j-1"));
    similar_asserts::assert_eq!(
        summarize(&events),
        vec![
            ("cmd".to_string(), "say hello".to_string(), None),
            ("cmd".to_string(), "say hello".to_string(), Some(true)),
            ("grp".to_string(), "Setup".to_string(), None),
            ("grp".to_string(), "Setup".to_string(), Some(true)),
            ("msg".to_string(), "hello\n".to_string(), None),
        ]
    );
}

#[test]
fn console_hierarchy_links_message_to_command_and_group() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-1"}), GREETING_SCRIPT);

    temp.reqproc()
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .passes();

    let events = temp.console_events("console.jsonl");
    let find = |kind: &str| {
        events
            .iter()
            .find(|e| e["type"] == kind && e.get("isSuccess").is_none())
            .unwrap()
            .clone()
    };
    let group = find("grp");
    let command = find("cmd");
    let line = find("msg");

    assert_eq!(group["parentConsoleId"], "root");
    assert_eq!(command["parentConsoleId"], group["consoleId"]);
    assert_eq!(line["parentConsoleId"], command["consoleId"]);
}

#[test]
fn failing_step_exits_nonzero() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-1"}), FAILING_SCRIPT);

    let run = temp
        .reqproc()
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .fails()
        .stdout_eq("job:j-1: FAILED\n");
    assert_eq!(run.code(), Some(1));

    let events = temp.console_events("console.jsonl");
    assert!(events
        .iter()
        .any(|e| e["type"] == "grp" && e["isSuccess"] == false));
}

#[test]
fn build_job_uses_build_job_owner() {
    let temp = Project::empty();
    let message = temp.message(json!({"buildJobId": "bj-1"}), GREETING_SCRIPT);

    temp.reqproc()
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .passes()
        .stdout_eq("build_job:bj-1: SUCCESS\n");

    let events = temp.console_events("console.jsonl");
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e["ownerId"] == "bj-1"));
}

#[test]
fn integer_job_id_is_accepted() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": 17}), GREETING_SCRIPT);

    temp.reqproc()
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .passes()
        .stdout_eq("job:17: SUCCESS\n");

    let events = temp.console_events("console.jsonl");
    assert!(events.iter().all(|e| e["ownerId"] == "17"));
}

#[test]
fn message_without_owner_is_rejected() {
    let temp = Project::empty();
    let message = temp.message(json!({}), GREETING_SCRIPT);

    temp.reqproc()
        .args(&["run", "--message"])
        .arg(&message)
        .fails()
        .stderr_has("job message names neither jobId nor buildJobId");
}

#[test]
fn missing_message_file_is_reported() {
    let temp = Project::empty();

    temp.reqproc()
        .args(&["run", "--message", "nope.json"])
        .fails()
        .stderr_has("cannot load job message nope.json");
}

#[test]
fn console_file_can_come_from_env() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-2"}), GREETING_SCRIPT);
    let console = temp.path().join("from-env.jsonl");

    temp.reqproc()
        .env("RP_CONSOLE_FILE", &console)
        .args(&["run", "--message"])
        .arg(&message)
        .passes();

    assert_eq!(temp.console_events("from-env.jsonl").len(), 5);
}

#[test]
fn console_file_can_come_from_settings() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-3"}), GREETING_SCRIPT);
    let console = temp.path().join("logs").join("console.jsonl");
    let settings = temp.file(
        "settings.toml",
        &format!("console_file = {:?}\n", console.to_string_lossy()),
    );

    temp.reqproc()
        .args(&["run", "--settings"])
        .arg(&settings)
        .arg("--message")
        .arg(&message)
        .passes();

    assert_eq!(temp.console_events("logs/console.jsonl").len(), 5);
}

#[test]
fn invalid_batch_size_env_is_rejected() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-1"}), GREETING_SCRIPT);

    temp.reqproc()
        .env("RP_CONSOLE_BATCH_SIZE", "lots")
        .args(&["run", "--message"])
        .arg(&message)
        .fails()
        .stderr_has("RP_CONSOLE_BATCH_SIZE");
}

#[test]
fn log_file_receives_worker_logs() {
    let temp = Project::empty();
    let message = temp.message(json!({"jobId": "j-1"}), GREETING_SCRIPT);
    let log = temp.path().join("logs").join("worker.log");

    temp.reqproc()
        .args(&["--log-file"])
        .arg(&log)
        .args(&["run", "--console-file", "console.jsonl", "--message"])
        .arg(&message)
        .passes();

    let content = std::fs::read_to_string(log).unwrap();
    assert!(content.contains("starting job"), "log: {content}");
}
