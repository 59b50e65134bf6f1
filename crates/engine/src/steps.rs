// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job step execution.
//!
//! Each step runs as a `bash` subprocess. Its output lines are fed, in
//! order, through the sentinel parser into one console shared by every step
//! of the job. A nonzero exit or a should-not-continue sentinel fails the
//! job and skips the remaining steps.

use crate::console::ConsoleAdapter;
use crate::env::read_env_file;
use crate::error::RunError;
use crate::parser::{self, JobSignal};
use rp_adapters::{bash_inline, bash_script, ConsoleSink, ScriptProcess};
use rp_core::{Clock, IdGen, JobStatus, JobStep, StatusCodes, SystemClock, UuidIdGen};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Final status of a job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOutcome {
    pub status: JobStatus,
    /// Control-plane code for `status`, if the table defines one
    pub status_code: Option<u32>,
}

impl JobOutcome {
    pub fn new(status: JobStatus, codes: &StatusCodes) -> Self {
        Self {
            status,
            status_code: codes.code_of(status),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }
}

#[derive(Debug, Default)]
struct StepReport {
    exit_code: i32,
    failed: bool,
    stop: bool,
}

/// Runs a job's steps against one console.
pub struct StepRunner<S: ConsoleSink, C: Clock = SystemClock, G: IdGen = UuidIdGen> {
    console: ConsoleAdapter<S, C, G>,
    codes: StatusCodes,
    working_dir: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

impl<S: ConsoleSink, C: Clock, G: IdGen> StepRunner<S, C, G> {
    pub fn new(console: ConsoleAdapter<S, C, G>, codes: StatusCodes) -> Self {
        Self {
            console,
            codes,
            working_dir: None,
            env_file: None,
        }
    }

    /// Directory the step scripts run in.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Env file to load when a script reports that on-start setup finished.
    pub fn on_start_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn console(&self) -> &ConsoleAdapter<S, C, G> {
        &self.console
    }

    /// Run every step in order, then publish orphan messages and flush.
    pub async fn run(&self, steps: &[JobStep]) -> JobOutcome {
        let owner = self.console.owner().clone();
        let mut env = BTreeMap::new();
        let mut failed = false;

        for step in steps {
            tracing::info!(%owner, step = %step.name, "running step");
            match self.run_step(step, &mut env).await {
                Ok(report) => {
                    failed |= report.failed || report.exit_code != 0;
                    if report.exit_code != 0 || report.stop {
                        tracing::warn!(
                            %owner,
                            step = %step.name,
                            exit_code = report.exit_code,
                            stop = report.stop,
                            "skipping remaining steps"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(%owner, step = %step.name, error = %e, "step aborted");
                    failed = true;
                    break;
                }
            }
        }

        if let Err(e) = self.console.publish_debug_messages() {
            tracing::error!(%owner, error = %e, "failed to publish orphan messages");
        }
        self.console.flush();

        let status = if failed {
            JobStatus::Failed
        } else {
            JobStatus::Success
        };
        let outcome = JobOutcome::new(status, &self.codes);
        tracing::info!(%owner, %status, code = ?outcome.status_code, "job finished");
        outcome
    }

    async fn run_step(
        &self,
        step: &JobStep,
        env: &mut BTreeMap<String, String>,
    ) -> Result<StepReport, RunError> {
        let mut cmd = if step.inline {
            bash_inline(&step.script)
        } else {
            bash_script(Path::new(&step.script))
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.envs(env.iter());

        let mut process = ScriptProcess::spawn(cmd).map_err(|source| RunError::Spawn {
            step: step.name.clone(),
            source,
        })?;

        let mut report = StepReport::default();
        while let Some(line) = process.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            match parser::feed_line(&self.console, &line)? {
                Some(JobSignal::ScriptFailed) => report.failed = true,
                Some(JobSignal::StopSteps) => {
                    report.failed = true;
                    report.stop = true;
                }
                Some(JobSignal::EnvReady) => self.load_env(env)?,
                None => {}
            }
        }

        report.exit_code = process.wait().await.map_err(|source| RunError::Wait {
            step: step.name.clone(),
            source,
        })?;
        tracing::debug!(step = %step.name, exit_code = report.exit_code, "step exited");
        Ok(report)
    }

    fn load_env(&self, env: &mut BTreeMap<String, String>) -> Result<(), RunError> {
        let Some(path) = &self.env_file else {
            tracing::debug!("on-start env ready but no env file configured");
            return Ok(());
        };
        let vars = read_env_file(path).map_err(|source| RunError::EnvFile {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), count = vars.len(), "loaded on-start env");
        env.extend(vars);
        Ok(())
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
