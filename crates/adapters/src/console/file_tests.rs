// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rp_core::{ConsoleId, ConsoleKind};

fn message(owner: &ConsoleOwner, n: usize) -> ConsoleEvent {
    ConsoleEvent::new(
        owner,
        ConsoleKind::Msg,
        ConsoleId::new(format!("m-{n}")),
        ConsoleId::new("c-1"),
        format!("line {n}\n"),
        n as f64,
    )
}

fn read_events(path: &Path) -> Vec<ConsoleEvent> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn appends_batches_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/console.jsonl");
    let sink = FileConsoleSink::new(&path);
    let owner = ConsoleOwner::job("j-1");

    sink.post_batch(&owner, &[message(&owner, 1), message(&owner, 2)])
        .await
        .unwrap();
    sink.post_batch(&owner, &[message(&owner, 3)]).await.unwrap();

    let events = read_events(&path);
    let ids: Vec<_> = events.iter().map(|e| e.console_id.as_str()).collect();
    assert_eq!(ids, ["m-1", "m-2", "m-3"]);
    assert_eq!(events[0].owner_id, "j-1");
    assert_eq!(events[2].message, "line 3\n");
}

#[tokio::test]
async fn empty_batch_creates_file_without_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("console.jsonl");
    let sink = FileConsoleSink::new(&path);

    sink.post_batch(&ConsoleOwner::job("j-1"), &[]).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[tokio::test]
async fn unwritable_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending
    let sink = FileConsoleSink::new(dir.path());

    let err = sink
        .post_batch(&ConsoleOwner::job("j-1"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SinkError::Io(_)));
    assert!(!err.is_retryable());
}
