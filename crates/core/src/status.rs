// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status names and their control-plane codes.
//!
//! The control plane identifies statuses by integer code. The mapping is
//! injected as a [`StatusCodes`] table so that components never consult a
//! process-wide lookup.

use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Waiting,
    Queued,
    Processing,
    Success,
    Skipped,
    Unstable,
    Timeout,
    Cancelled,
    Failed,
    Stopped,
}

impl JobStatus {
    pub const ALL: [JobStatus; 10] = [
        JobStatus::Waiting,
        JobStatus::Queued,
        JobStatus::Processing,
        JobStatus::Success,
        JobStatus::Skipped,
        JobStatus::Unstable,
        JobStatus::Timeout,
        JobStatus::Cancelled,
        JobStatus::Failed,
        JobStatus::Stopped,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobStatus::Waiting => "WAITING",
            JobStatus::Queued => "QUEUED",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Skipped => "SKIPPED",
            JobStatus::Unstable => "UNSTABLE",
            JobStatus::Timeout => "TIMEOUT",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Failed => "FAILED",
            JobStatus::Stopped => "STOPPED",
        }
    }

    /// Status by its control-plane name, e.g. `SUCCESS`.
    pub fn from_name(name: &str) -> Option<JobStatus> {
        JobStatus::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bidirectional status ↔ code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodes {
    codes: HashMap<JobStatus, u32>,
}

impl Default for StatusCodes {
    fn default() -> Self {
        let codes = JobStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, status)| (*status, i as u32 * 10))
            .collect();
        Self { codes }
    }
}

impl StatusCodes {
    pub fn code_of(&self, status: JobStatus) -> Option<u32> {
        self.codes.get(&status).copied()
    }

    pub fn status_of(&self, code: u32) -> Option<JobStatus> {
        self.codes
            .iter()
            .find(|(_, c)| **c == code)
            .map(|(status, _)| *status)
    }

    /// Replace the codes of the given statuses.
    ///
    /// Fails if a code would then name two statuses.
    pub fn merge(
        mut self,
        overrides: impl IntoIterator<Item = (JobStatus, u32)>,
    ) -> Result<Self, SettingsError> {
        let overrides: Vec<_> = overrides.into_iter().collect();
        for (status, _) in &overrides {
            self.codes.remove(status);
        }
        for (status, code) in overrides {
            if let Some(existing) = self.status_of(code) {
                return Err(SettingsError::DuplicateStatusCode {
                    code,
                    first: existing,
                    second: status,
                });
            }
            self.codes.insert(status, code);
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
