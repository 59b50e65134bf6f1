// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff for control-plane calls.

use rp_core::backoff;
use std::time::Duration;

/// Exponential backoff: `initial`, `2 * initial`, ... capped at `max_delay`.
///
/// `max_attempts = None` retries forever, which is what console posts use
/// against 5xx and connection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial: Duration,
    pub max_delay: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max_delay: Duration::from_secs(180),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Policy from `RP_API_RETRY_INITIAL_MS` / `RP_API_RETRY_MAX_MS`.
    pub fn from_env() -> Self {
        Self {
            initial: crate::env::api_retry_initial(),
            max_delay: crate::env::api_retry_max(),
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Delay after the given zero-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        backoff::exponential(self.initial, self.max_delay, attempt)
    }

    /// Whether another attempt may follow `failed` failed attempts.
    pub fn allows_retry(&self, failed: u32) -> bool {
        self.max_attempts.map_or(true, |max| failed < max)
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
