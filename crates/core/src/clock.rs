// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of monotonic and wall-clock time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant
    fn now(&self) -> Instant;

    /// Wall-clock microseconds since the Unix epoch
    fn epoch_us(&self) -> u64;

    /// Wall-clock milliseconds since the Unix epoch
    fn epoch_ms(&self) -> u64 {
        self.epoch_us() / 1_000
    }
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_us(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Clock;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct FakeTime {
        now: Instant,
        epoch_us: u64,
    }

    /// Manually advanced clock for tests.
    ///
    /// Advancing moves the monotonic instant and the wall clock together;
    /// `set_epoch_us` moves only the wall clock.
    #[derive(Clone)]
    pub struct FakeClock {
        inner: Arc<Mutex<FakeTime>>,
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeTime {
                    now: Instant::now(),
                    epoch_us: 1_700_000_000_000_000,
                })),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut t = self.inner.lock();
            t.now += by;
            t.epoch_us += by.as_micros() as u64;
        }

        pub fn set_epoch_us(&self, epoch_us: u64) {
            self.inner.lock().epoch_us = epoch_us;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.inner.lock().now
        }

        fn epoch_us(&self) -> u64 {
            self.inner.lock().epoch_us
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
