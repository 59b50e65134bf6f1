// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console sink that appends events to a local JSON-lines file.
//!
//! Used when no control-plane API is configured, so a transcript can still
//! be inspected after the job finishes.

use super::{ConsoleSink, SinkError};
use async_trait::async_trait;
use rp_core::{ConsoleEvent, ConsoleOwner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct FileConsoleSink {
    path: PathBuf,
    // Serializes appends so concurrent batches never interleave lines
    write_lock: Arc<Mutex<()>>,
}

impl FileConsoleSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConsoleSink for FileConsoleSink {
    async fn post_batch(
        &self,
        _owner: &ConsoleOwner,
        events: &[ConsoleEvent],
    ) -> Result<(), SinkError> {
        let mut buf = Vec::new();
        for event in events {
            serde_json::to_writer(&mut buf, event)?;
            buf.push(b'\n');
        }

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&buf).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
