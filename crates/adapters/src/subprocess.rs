// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

/// Capacity of the line channel between the output reader and the consumer.
const LINE_BUFFER: usize = 256;

/// Re-exec bash with stderr joined to stdout, so both share one pipe.
const MERGE_STDERR: &str = r#"exec bash "$@" 2>&1"#;

fn merged_bash() -> Command {
    let mut cmd = Command::new("bash");
    cmd.arg("-c").arg(MERGE_STDERR).arg("bash");
    cmd
}

/// `bash <path>` with stderr merged into stdout
pub fn bash_script(path: &Path) -> Command {
    let mut cmd = merged_bash();
    cmd.arg(path);
    cmd
}

/// `bash -c <body>` with stderr merged into stdout
pub fn bash_inline(body: &str) -> Command {
    let mut cmd = merged_bash();
    cmd.arg("-c").arg(body);
    cmd
}

/// A running script whose output is read line by line.
///
/// Scripts built with [`bash_script`] or [`bash_inline`] write stdout and
/// stderr to the same pipe, so lines arrive in the order they were written.
/// For other commands stderr is discarded.
pub struct ScriptProcess {
    child: Child,
    lines: mpsc::Receiver<String>,
}

impl ScriptProcess {
    /// Spawn the command with piped output. The child is killed if the
    /// process handle is dropped before it exits.
    pub fn spawn(mut cmd: Command) -> std::io::Result<Self> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let mut child = cmd.spawn()?;

        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx));
        }

        Ok(Self { child, lines: rx })
    }

    /// Next output line without its line ending, or `None` once output is closed.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Wait for the script to exit. Signals map to exit code -1.
    pub async fn wait(mut self) -> std::io::Result<i32> {
        let status = self.child.wait().await?;
        Ok(status.code().unwrap_or(-1))
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed reading script output");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
