// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake console sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConsoleSink, SinkError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rp_core::{ConsoleEvent, ConsoleOwner};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Recorded batch
#[derive(Debug, Clone)]
pub struct SinkCall {
    pub owner: ConsoleOwner,
    pub events: Vec<ConsoleEvent>,
}

struct FakeSinkState {
    calls: Vec<SinkCall>,
    failure: Option<String>,
}

/// Fake console sink for testing.
///
/// Records every batch when it is posted. A gated sink holds each post
/// until [`FakeConsoleSink::release`] hands out a permit, which lets tests
/// observe in-flight calls.
#[derive(Clone)]
pub struct FakeConsoleSink {
    inner: Arc<Mutex<FakeSinkState>>,
    gate: Option<Arc<Semaphore>>,
}

impl Default for FakeConsoleSink {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSinkState {
                calls: Vec::new(),
                failure: None,
            })),
            gate: None,
        }
    }
}

impl FakeConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose posts block until released.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Let `n` blocked (or future) posts complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Make every subsequent post fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.inner.lock().failure = Some(message.into());
    }

    /// All recorded batches
    pub fn calls(&self) -> Vec<SinkCall> {
        self.inner.lock().calls.clone()
    }

    /// All recorded events, concatenated in post order
    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.inner
            .lock()
            .calls
            .iter()
            .flat_map(|c| c.events.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl ConsoleSink for FakeConsoleSink {
    async fn post_batch(
        &self,
        owner: &ConsoleOwner,
        events: &[ConsoleEvent],
    ) -> Result<(), SinkError> {
        let failure = {
            let mut state = self.inner.lock();
            state.calls.push(SinkCall {
                owner: owner.clone(),
                events: events.to_vec(),
            });
            state.failure.clone()
        };

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match failure {
            Some(message) => Err(SinkError::Rejected(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
