// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! reqproc - CI job worker that streams step output to the console API

mod commands;
mod config;
mod env;
mod exit_error;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{parse, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reqproc",
    version,
    about = "reqproc - run CI job steps and stream their console"
)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the steps of a job message
    Run(run::RunArgs),
    /// Classify sentinel lines read from stdin
    Parse,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, skipping causes already present in the top-level
/// message.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_file = cli.log_file.or_else(env::log_file);
    let _log_guard = logging::setup_logging(log_file.as_deref())?;

    match cli.command {
        Commands::Run(args) => run::handle(args).await,
        Commands::Parse => parse::handle().await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
