// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod console;
mod env;
pub mod retry;
pub mod subprocess;
pub mod traced;

pub use console::{ConsoleSink, FileConsoleSink, HttpConsoleSink, NoOpConsoleSink, SinkError};
pub use retry::RetryPolicy;
pub use subprocess::{bash_inline, bash_script, ScriptProcess};
pub use traced::TracedSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use console::{FakeConsoleSink, SinkCall};
