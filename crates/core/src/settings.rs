// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered worker settings.
//!
//! Console batching is resolved from, lowest to highest precedence: built-in
//! defaults, the system settings file, environment overrides and finally
//! the overrides carried by the job message itself.

use crate::status::{JobStatus, StatusCodes};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default number of buffered events that triggers a flush.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Default delay before buffered events are flushed regardless of count.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid job message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("console batch size must be at least 1")]
    InvalidBatchSize,
    #[error("job message names neither jobId nor buildJobId")]
    MissingOwner,
    #[error("job message names both jobId and buildJobId")]
    AmbiguousOwner,
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("unknown job status in status_codes: {0}")]
    UnknownStatus(String),
    #[error("status code {code} is assigned to both {first} and {second}")]
    DuplicateStatusCode {
        code: u32,
        first: JobStatus,
        second: JobStatus,
    },
}

/// Resolved console batching configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl ConsoleSettings {
    /// Apply one override layer on top of these settings.
    pub fn merge(self, overrides: &ConsoleOverrides) -> Self {
        Self {
            batch_size: overrides.batch_size.unwrap_or(self.batch_size),
            flush_interval: overrides
                .flush_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(self.flush_interval),
        }
    }

    pub fn validate(self) -> Result<Self, SettingsError> {
        if self.batch_size == 0 {
            return Err(SettingsError::InvalidBatchSize);
        }
        Ok(self)
    }
}

/// One optional layer of console settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleOverrides {
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub flush_interval_ms: Option<u64>,
}

/// Backoff used while waiting for in-flight console posts before exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            max_attempts: 10,
        }
    }
}

impl DrainPolicy {
    /// Delay before the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        crate::backoff::exponential(self.initial_delay, self.max_delay, attempt)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrainOverrides {
    #[serde(default)]
    pub initial_delay_ms: Option<u64>,
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl DrainPolicy {
    pub fn merge(self, overrides: &DrainOverrides) -> Self {
        Self {
            initial_delay: overrides
                .initial_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.initial_delay),
            max_delay: overrides
                .max_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.max_delay),
            max_attempts: overrides.max_attempts.unwrap_or(self.max_attempts),
        }
    }
}

/// Control-plane API endpoint and credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Global settings file read at process startup.
///
/// ```toml
/// console_file = "/var/log/reqproc/console.jsonl"
///
/// [api]
/// url = "https://api.example.com"
/// token = "..."
///
/// [console]
/// batch_size = 50
/// flush_interval_ms = 1000
///
/// [drain]
/// max_attempts = 5
///
/// [status_codes]
/// SUCCESS = 2
/// FAILED = 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub console: ConsoleOverrides,
    #[serde(default)]
    pub drain: DrainOverrides,
    #[serde(default)]
    pub console_file: Option<PathBuf>,
    /// Control-plane codes by status name, overriding the defaults
    #[serde(default)]
    pub status_codes: BTreeMap<String, u32>,
}

impl SystemSettings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Default status codes with the file's `[status_codes]` applied.
    pub fn status_codes(&self) -> Result<StatusCodes, SettingsError> {
        let overrides = self
            .status_codes
            .iter()
            .map(|(name, code)| {
                JobStatus::from_name(name)
                    .map(|status| (status, *code))
                    .ok_or_else(|| SettingsError::UnknownStatus(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        StatusCodes::default().merge(overrides)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
