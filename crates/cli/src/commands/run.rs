// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reqproc run` - execute one job message

use crate::config::{self, SinkTarget};
use crate::exit_error::ExitError;
use anyhow::{Context, Result};
use clap::Args;
use rp_adapters::{ConsoleSink, FileConsoleSink, HttpConsoleSink, NoOpConsoleSink, TracedSink};
use rp_core::JobMessage;
use rp_engine::{run_job, JobConfig, JobOutcome};
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// Job message JSON file
    #[arg(short, long)]
    pub message: PathBuf,

    /// Settings file (default: $RP_SETTINGS, then the user config dir)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Append console events to this JSON-lines file when no API is configured
    #[arg(long)]
    pub console_file: Option<PathBuf>,
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let message = JobMessage::load(&args.message)
        .with_context(|| format!("cannot load job message {}", args.message.display()))?;
    let owner = message.owner()?;
    let config = config::resolve(args.settings.as_deref(), args.console_file)?;

    let outcome = match config.sink {
        SinkTarget::Http { url, token } => {
            tracing::info!(%url, "posting console to api");
            run_with(&message, HttpConsoleSink::new(&url, token)?, &config.job).await?
        }
        SinkTarget::File(path) => {
            tracing::info!(path = %path.display(), "writing console to file");
            run_with(&message, FileConsoleSink::new(path), &config.job).await?
        }
        SinkTarget::Discard => {
            tracing::warn!("no api or console file configured, console output is discarded");
            run_with(&message, NoOpConsoleSink::new(), &config.job).await?
        }
    };

    println!("{}: {}", owner, outcome.status);
    if !outcome.is_success() {
        return Err(ExitError::silent(1).into());
    }
    Ok(())
}

async fn run_with<S: ConsoleSink>(
    message: &JobMessage,
    sink: S,
    config: &JobConfig,
) -> Result<JobOutcome> {
    Ok(run_job(message, TracedSink::new(sink), config).await?)
}
