// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use rp_core::{ConsoleOverrides, SettingsError};
use std::path::PathBuf;
use std::str::FromStr;

pub const SETTINGS: &str = "RP_SETTINGS";
pub const API_URL: &str = "RP_API_URL";
pub const API_TOKEN: &str = "RP_API_TOKEN";
pub const CONSOLE_FILE: &str = "RP_CONSOLE_FILE";
pub const CONSOLE_BATCH_SIZE: &str = "RP_CONSOLE_BATCH_SIZE";
pub const CONSOLE_FLUSH_INTERVAL_MS: &str = "RP_CONSOLE_FLUSH_INTERVAL_MS";
pub const LOG_FILE: &str = "RP_LOG_FILE";

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, SettingsError> {
    match non_empty(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::InvalidEnv { var, value }),
    }
}

// --- Paths ---

pub fn settings_path() -> Option<PathBuf> {
    non_empty(SETTINGS).map(PathBuf::from)
}

pub fn console_file() -> Option<PathBuf> {
    non_empty(CONSOLE_FILE).map(PathBuf::from)
}

pub fn log_file() -> Option<PathBuf> {
    non_empty(LOG_FILE).map(PathBuf::from)
}

// --- API ---

pub fn api_url() -> Option<String> {
    non_empty(API_URL)
}

pub fn api_token() -> Option<String> {
    non_empty(API_TOKEN)
}

// --- Console ---

/// Console settings layer taken from the environment.
pub fn console_overrides() -> Result<ConsoleOverrides, SettingsError> {
    Ok(ConsoleOverrides {
        batch_size: parse_var(CONSOLE_BATCH_SIZE)?,
        flush_interval_ms: parse_var(CONSOLE_FLUSH_INTERVAL_MS)?,
    })
}
