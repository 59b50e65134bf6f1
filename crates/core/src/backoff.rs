// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Delay after `attempt` (zero-based): `initial * 2^attempt`, capped at `max`.
pub fn exponential(initial: Duration, max: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    initial.checked_mul(factor).unwrap_or(max).min(max)
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
