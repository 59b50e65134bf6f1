// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point for running one job message end to end.

use crate::console::ConsoleAdapter;
use crate::error::RunError;
use crate::steps::{JobOutcome, StepRunner};
use rp_adapters::ConsoleSink;
use rp_core::{ConsoleSettings, DrainPolicy, JobMessage, StatusCodes};

/// Worker-level configuration shared by every job.
#[derive(Debug, Clone, Default)]
pub struct JobConfig {
    /// Console settings before per-job overrides
    pub console: ConsoleSettings,
    pub drain: DrainPolicy,
    pub codes: StatusCodes,
}

/// Run a job's steps, then wait for outstanding console posts.
///
/// Console settings from the message override `config.console`. The
/// returned outcome reflects the steps only; console delivery failures
/// never change it.
pub async fn run_job<S: ConsoleSink>(
    message: &JobMessage,
    sink: S,
    config: &JobConfig,
) -> Result<JobOutcome, RunError> {
    let owner = message.owner()?;
    let settings = config
        .console
        .merge(&message.console_overrides())
        .validate()?;
    tracing::info!(
        %owner,
        steps = message.steps.len(),
        batch_size = settings.batch_size,
        flush_interval_ms = settings.flush_interval.as_millis() as u64,
        "starting job"
    );

    let console = ConsoleAdapter::new(sink, owner.clone(), settings)?;
    let mut runner = StepRunner::new(console, config.codes.clone());
    if let Some(dir) = &message.working_dir {
        runner = runner.working_dir(dir);
    }
    if let Some(path) = &message.on_start_env_file {
        runner = runner.on_start_env_file(path);
    }

    let outcome = runner.run(&message.steps).await;

    let console = runner.console();
    if !console.wait_for_drain(&config.drain).await {
        tracing::warn!(
            %owner,
            pending = console.pending_remote_calls(),
            "exiting with console posts still in flight"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
