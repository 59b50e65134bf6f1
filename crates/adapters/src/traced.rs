// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::console::{ConsoleSink, SinkError};
use async_trait::async_trait;
use rp_core::{ConsoleEvent, ConsoleOwner};
use tracing::Instrument;

/// Wrapper that adds tracing to any ConsoleSink
#[derive(Clone)]
pub struct TracedSink<S> {
    inner: S,
}

impl<S> TracedSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ConsoleSink> ConsoleSink for TracedSink<S> {
    async fn post_batch(
        &self,
        owner: &ConsoleOwner,
        events: &[ConsoleEvent],
    ) -> Result<(), SinkError> {
        let span = tracing::info_span!("console.post", %owner, events = events.len());
        async {
            tracing::debug!("posting");
            let start = std::time::Instant::now();
            let result = self.inner.post_batch(owner, events).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "console batch posted"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "console post failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
