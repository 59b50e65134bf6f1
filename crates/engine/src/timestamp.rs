// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console timestamps.

use rp_core::Clock;
use std::time::Instant;

/// Microsecond timestamps anchored to the wall clock at construction and
/// advanced by the monotonic clock afterwards.
///
/// Values never go backwards within one source, even if the wall clock is
/// adjusted. Two sources are not comparable with each other.
#[derive(Debug, Clone)]
pub struct TimestampSource<C: Clock> {
    clock: C,
    origin_us: f64,
    started: Instant,
}

impl<C: Clock> TimestampSource<C> {
    pub fn new(clock: C) -> Self {
        let started = clock.now();
        let origin_us = clock.epoch_us() as f64;
        Self {
            clock,
            origin_us,
            started,
        }
    }

    pub fn now_us(&self) -> f64 {
        let elapsed = self.clock.now().saturating_duration_since(self.started);
        self.origin_us + elapsed.as_nanos() as f64 / 1_000.0
    }
}

#[cfg(test)]
#[path = "timestamp_tests.rs"]
mod tests;
