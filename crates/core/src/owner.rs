// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner identification for console transcripts.
//!
//! A console transcript belongs either to a job or to a build job. The two
//! owners share one adapter implementation but differ in how strictly they
//! treat malformed console structure and in the field names used on the wire.

use crate::id::{BuildJobId, JobId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an adapter reacts to calls that violate console nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    /// Record the violation as an orphan message and keep going.
    Lenient,
    /// Reject the call with an error.
    Strict,
}

/// Owner of a console transcript.
///
/// Serializes as a tagged enum:
/// - `{"type": "job", "id": "5f1b..."}`
/// - `{"type": "build_job", "id": "8ac2..."}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum ConsoleOwner {
    #[serde(rename = "job")]
    Job(JobId),
    #[serde(rename = "build_job")]
    BuildJob(BuildJobId),
}

impl ConsoleOwner {
    pub fn job(id: impl Into<JobId>) -> Self {
        ConsoleOwner::Job(id.into())
    }

    pub fn build_job(id: impl Into<BuildJobId>) -> Self {
        ConsoleOwner::BuildJob(id.into())
    }

    /// Raw id string, regardless of owner kind.
    pub fn id(&self) -> &str {
        match self {
            ConsoleOwner::Job(id) => id.as_str(),
            ConsoleOwner::BuildJob(id) => id.as_str(),
        }
    }

    /// Jobs degrade gracefully; build jobs reject malformed structure.
    pub fn mode(&self) -> ConsoleMode {
        match self {
            ConsoleOwner::Job(_) => ConsoleMode::Lenient,
            ConsoleOwner::BuildJob(_) => ConsoleMode::Strict,
        }
    }

    /// Name of the owner id field in a persisted batch.
    pub fn id_field(&self) -> &'static str {
        match self {
            ConsoleOwner::Job(_) => "jobId",
            ConsoleOwner::BuildJob(_) => "buildJobId",
        }
    }

    /// Name of the event list field in a persisted batch.
    pub fn events_field(&self) -> &'static str {
        match self {
            ConsoleOwner::Job(_) => "jobConsoleModels",
            ConsoleOwner::BuildJob(_) => "buildJobConsoles",
        }
    }

    /// API route that accepts console batches for this owner.
    pub fn route(&self) -> &'static str {
        match self {
            ConsoleOwner::Job(_) => "jobConsoles",
            ConsoleOwner::BuildJob(_) => "buildJobConsoles",
        }
    }
}

impl fmt::Display for ConsoleOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleOwner::Job(id) => write!(f, "job:{}", id),
            ConsoleOwner::BuildJob(id) => write!(f, "build_job:{}", id),
        }
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
