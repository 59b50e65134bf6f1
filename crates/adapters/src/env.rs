// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// First retry delay for console posts (default: 1000ms).
pub fn api_retry_initial() -> Duration {
    parse_duration_ms("RP_API_RETRY_INITIAL_MS").unwrap_or(Duration::from_secs(1))
}

/// Upper bound on the retry delay for console posts (default: 180s).
pub fn api_retry_max() -> Duration {
    parse_duration_ms("RP_API_RETRY_MAX_MS").unwrap_or(Duration::from_secs(180))
}

/// Per-request timeout for console posts (default: 60s).
pub fn api_request_timeout() -> Duration {
    parse_duration_ms("RP_API_TIMEOUT_MS").unwrap_or(Duration::from_secs(60))
}
