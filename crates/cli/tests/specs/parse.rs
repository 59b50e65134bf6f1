// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reqproc parse` specs
//!
//! Verify the JSON classification printed for each stdin line.

use crate::prelude::*;

#[test]
fn classifies_sentinel_lines() {
    let temp = Project::empty();
    let input = "\
__SH__GROUP__START__|{\"is_shown\":false}|Setup
__SH__CMD__START__||npm ci
added 120 packages

__SH__CMD__END__|{\"exitcode\":\"0\"}
__SH__GROUP__END__|{\"exitcode\":\"1\"}
__SH__SCRIPT_END_FAILURE__
__SH__SHOULD_NOT_CONTINUE__
__SH__SHOULD_CONTINUE__
__SH_ON_START_JOB_ENV_SCRIPT_COMPLETE__
";

    temp.reqproc().args(&["parse"]).stdin(input).passes().stdout_eq(
        r#"{"kind":"group_start","name":"Setup","is_shown":false}
{"kind":"command_start","name":"npm ci"}
{"kind":"message","text":"added 120 packages"}
{"kind":"command_end","is_success":true}
{"kind":"group_end","is_success":false,"is_shown":true}
{"kind":"script_failed"}
{"kind":"should_not_continue"}
{"kind":"suppressed"}
{"kind":"env_ready"}
"#,
    );
}

#[test]
fn malformed_payload_is_printed_as_message() {
    let temp = Project::empty();

    temp.reqproc()
        .args(&["parse"])
        .stdin("__SH__CMD__END__|{oops\n")
        .passes()
        .stdout_eq("{\"kind\":\"message\",\"text\":\"__SH__CMD__END__|{oops\"}\n");
}

#[test]
fn empty_input_prints_nothing() {
    let temp = Project::empty();

    temp.reqproc()
        .args(&["parse"])
        .stdin("")
        .passes()
        .stdout_eq("");
}
