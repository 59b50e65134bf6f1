// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound job message.

use crate::id::{BuildJobId, JobId};
use crate::owner::ConsoleOwner;
use crate::settings::{ConsoleOverrides, SettingsError};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// One pipeline step: a shell script run with `bash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStep {
    pub name: String,
    /// Path to a script file, or the script body when `inline` is set
    pub script: String,
    #[serde(default)]
    pub inline: bool,
}

/// Work item consumed by the worker.
///
/// Exactly one of `jobId` / `buildJobId` identifies the console owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMessage {
    #[serde(default, deserialize_with = "string_or_number")]
    pub job_id: Option<JobId>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub build_job_id: Option<BuildJobId>,
    #[serde(default)]
    pub steps: Vec<JobStep>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Dotenv file written by the on-start environment script
    #[serde(default)]
    pub on_start_env_file: Option<PathBuf>,
    #[serde(default)]
    pub console_batch_size: Option<usize>,
    #[serde(default, rename = "consoleBufferTimeIntervalInMS")]
    pub console_flush_interval_ms: Option<u64>,
}

/// Owner id as sent by the control plane: a string or a bare integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(id) => T::from(id),
        RawId::Number(id) => T::from(id.to_string()),
    }))
}

impl JobMessage {
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn owner(&self) -> Result<ConsoleOwner, SettingsError> {
        match (&self.job_id, &self.build_job_id) {
            (Some(id), None) => Ok(ConsoleOwner::Job(id.clone())),
            (None, Some(id)) => Ok(ConsoleOwner::BuildJob(id.clone())),
            (None, None) => Err(SettingsError::MissingOwner),
            (Some(_), Some(_)) => Err(SettingsError::AmbiguousOwner),
        }
    }

    /// Per-job console overrides, the highest-precedence settings layer.
    pub fn console_overrides(&self) -> ConsoleOverrides {
        ConsoleOverrides {
            batch_size: self.console_batch_size,
            flush_interval_ms: self.console_flush_interval_ms,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
