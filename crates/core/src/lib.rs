// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rp-core: shared types for the reqproc job worker

pub mod backoff;
pub mod clock;
pub mod console;
pub mod id;
pub mod message;
pub mod owner;
pub mod settings;
pub mod status;

pub use clock::{Clock, SystemClock};
pub use console::{ConsoleEvent, ConsoleKind, ROOT_CONSOLE_ID};
pub use id::{BuildJobId, ConsoleId, IdGen, JobId, UuidIdGen};
pub use message::{JobMessage, JobStep};
pub use owner::{ConsoleMode, ConsoleOwner};
pub use settings::{
    ApiSettings, ConsoleOverrides, ConsoleSettings, DrainOverrides, DrainPolicy, SettingsError,
    SystemSettings,
};
pub use status::{JobStatus, StatusCodes};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
#[cfg(any(test, feature = "test-support"))]
pub use id::SequentialIdGen;
