// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! reqproc execution engine: console batching, sentinel parsing and step
//! execution

mod buffer;
mod console;
pub mod env;
mod error;
mod job;
pub mod parser;
mod steps;
mod timestamp;

pub use buffer::EventBuffer;
pub use console::ConsoleAdapter;
pub use error::{ConsoleError, RunError};
pub use job::{run_job, JobConfig};
pub use parser::{parse_line, JobSignal, LogLine};
pub use steps::{JobOutcome, StepRunner};
pub use timestamp::TimestampSource;
