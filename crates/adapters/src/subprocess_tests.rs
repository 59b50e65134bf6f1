// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

async fn collect(mut process: ScriptProcess) -> (Vec<String>, i32) {
    let mut lines = Vec::new();
    while let Some(line) = process.next_line().await {
        lines.push(line);
    }
    let code = process.wait().await.unwrap();
    (lines, code)
}

#[tokio::test]
async fn inline_script_lines_arrive_in_order() {
    let process = ScriptProcess::spawn(bash_inline("echo one; echo two; printf 'three'")).unwrap();
    let (lines, code) = collect(process).await;

    assert_eq!(lines, ["one", "two", "three"]);
    assert_eq!(code, 0);
}

#[tokio::test]
async fn stderr_is_captured_with_exit_code() {
    let process = ScriptProcess::spawn(bash_inline("echo oops >&2; exit 3")).unwrap();
    let (lines, code) = collect(process).await;

    assert_eq!(lines, ["oops"]);
    assert_eq!(code, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn interleaved_stdout_and_stderr_keep_write_order() {
    for _ in 0..20 {
        let process = ScriptProcess::spawn(bash_inline(
            "echo out1; echo err1 >&2; echo out2; echo err2 >&2; echo out3",
        ))
        .unwrap();
        let (lines, code) = collect(process).await;

        assert_eq!(lines, ["out1", "err1", "out2", "err2", "out3"]);
        assert_eq!(code, 0);
    }
}

#[tokio::test]
async fn script_file_stderr_is_merged() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("step.sh");
    std::fs::write(&script, "echo first\necho second >&2\necho third\nexit 4\n").unwrap();

    let (lines, code) = collect(ScriptProcess::spawn(bash_script(&script)).unwrap()).await;

    assert_eq!(lines, ["first", "second", "third"]);
    assert_eq!(code, 4);
}

#[tokio::test]
async fn crlf_and_invalid_utf8_are_tolerated() {
    let process = ScriptProcess::spawn(bash_inline(r"printf 'dos\r\n\xff\xfe\n'")).unwrap();
    let (lines, _) = collect(process).await;

    assert_eq!(lines[0], "dos");
    assert_eq!(lines[1], "\u{fffd}\u{fffd}");
}

#[tokio::test]
async fn script_file_runs_with_env_and_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("step.sh");
    std::fs::write(&script, "echo \"$GREETING from $(basename \"$PWD\")\"\n").unwrap();

    let mut cmd = bash_script(&script);
    cmd.current_dir(dir.path()).env("GREETING", "hello");
    let (lines, code) = collect(ScriptProcess::spawn(cmd).unwrap()).await;

    let dir_name = dir.path().file_name().unwrap().to_string_lossy();
    assert_eq!(lines[0], format!("hello from {dir_name}"));
    assert_eq!(code, 0);
}

#[tokio::test]
async fn missing_program_fails_to_spawn() {
    let result = ScriptProcess::spawn(Command::new("/nonexistent/binary"));
    assert!(result.is_err());
}
