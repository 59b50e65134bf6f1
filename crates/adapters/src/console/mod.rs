// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console sinks: where flushed console batches are persisted

mod file;
mod http;
mod noop;

pub use file::FileConsoleSink;
pub use http::HttpConsoleSink;
pub use noop::NoOpConsoleSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeConsoleSink, SinkCall};

use async_trait::async_trait;
use rp_core::{ConsoleEvent, ConsoleOwner};
use thiserror::Error;

/// Errors from console sinks
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("rejected: {0}")]
    Rejected(String),
}

impl SinkError {
    /// Connection-level failures and 5xx responses are worth retrying;
    /// everything else is surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            SinkError::Request(_) => true,
            SinkError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Destination for batches of console events.
///
/// A batch is persisted at most once: callers do not retry on error, so any
/// transport-level retry lives inside the implementation.
#[async_trait]
pub trait ConsoleSink: Clone + Send + Sync + 'static {
    async fn post_batch(
        &self,
        owner: &ConsoleOwner,
        events: &[ConsoleEvent],
    ) -> Result<(), SinkError>;
}
