// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use rp_core::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

/// Console structure violations rejected by a strict adapter
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("{op} requires a name")]
    MissingName { op: &'static str },
    #[error("message published with no open command")]
    NoOpenCommand,
    #[error("console adapter must be created inside a tokio runtime")]
    NoRuntime,
}

/// Errors that abort a job run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("console error: {0}")]
    Console(#[from] ConsoleError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to spawn step {step}: {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for step {step}: {source}")]
    Wait {
        step: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
