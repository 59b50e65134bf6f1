// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reqproc parse` - show how script output lines are classified

use anyhow::Result;
use rp_engine::parse_line;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Print one JSON classification per non-blank stdin line.
pub async fn handle() -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let mut out = serde_json::to_vec(&parse_line(&line))?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
    }
    stdout.flush().await?;
    Ok(())
}
