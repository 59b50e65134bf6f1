// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    waiting    = { JobStatus::Waiting,    0 },
    processing = { JobStatus::Processing, 20 },
    success    = { JobStatus::Success,    30 },
    cancelled  = { JobStatus::Cancelled,  70 },
    failed     = { JobStatus::Failed,     80 },
    stopped    = { JobStatus::Stopped,    90 },
)]
fn default_codes(status: JobStatus, code: u32) {
    let codes = StatusCodes::default();
    assert_eq!(codes.code_of(status), Some(code));
    assert_eq!(codes.status_of(code), Some(status));
}

#[test]
fn lookup_by_name() {
    assert_eq!(JobStatus::from_name("SUCCESS"), Some(JobStatus::Success));
    assert_eq!(JobStatus::from_name("success"), None);
    assert_eq!(StatusCodes::default().status_of(31), None);
}

#[test]
fn merge_overrides_named_codes() {
    let codes = StatusCodes::default()
        .merge([(JobStatus::Success, 1), (JobStatus::Failed, 2)])
        .unwrap();
    assert_eq!(codes.code_of(JobStatus::Success), Some(1));
    assert_eq!(codes.code_of(JobStatus::Queued), Some(10));
    assert_eq!(codes.status_of(2), Some(JobStatus::Failed));
    assert_eq!(codes.status_of(30), None);
}

#[test]
fn merge_may_swap_codes() {
    let codes = StatusCodes::default()
        .merge([(JobStatus::Success, 80), (JobStatus::Failed, 30)])
        .unwrap();
    assert_eq!(codes.status_of(80), Some(JobStatus::Success));
    assert_eq!(codes.status_of(30), Some(JobStatus::Failed));
}

#[test]
fn merge_rejects_shared_code() {
    let err = StatusCodes::default()
        .merge([(JobStatus::Success, 80)])
        .unwrap_err();
    assert!(matches!(
        err,
        SettingsError::DuplicateStatusCode {
            code: 80,
            first: JobStatus::Failed,
            second: JobStatus::Success,
        }
    ));
}

#[test]
fn status_serializes_by_name() {
    assert_eq!(
        serde_json::to_string(&JobStatus::Cancelled).unwrap(),
        "\"CANCELLED\""
    );
}
