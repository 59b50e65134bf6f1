// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker configuration resolved from the settings file, the environment and
//! command-line flags.

use crate::env;
use rp_core::{ConsoleSettings, DrainPolicy, SettingsError, SystemSettings};
use rp_engine::JobConfig;
use std::path::{Path, PathBuf};

/// Where console batches go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Http { url: String, token: Option<String> },
    File(PathBuf),
    Discard,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub job: JobConfig,
    pub sink: SinkTarget,
}

/// Default settings file: `<config dir>/reqproc/settings.toml`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reqproc").join("settings.toml"))
}

/// Load the settings file named by the flag or `RP_SETTINGS`, falling back
/// to the default location. Only an explicitly named file must exist.
fn load_settings(explicit: Option<&Path>) -> Result<SystemSettings, SettingsError> {
    if let Some(path) = explicit.map(Path::to_path_buf).or_else(env::settings_path) {
        return SystemSettings::load(&path);
    }
    match default_settings_path() {
        Some(path) if path.is_file() => SystemSettings::load(&path),
        _ => Ok(SystemSettings::default()),
    }
}

/// Resolve the worker configuration.
///
/// Precedence, lowest first: built-in defaults, settings file, environment,
/// flags. Per-job overrides from the job message are applied later.
pub fn resolve(
    settings_path: Option<&Path>,
    console_file: Option<PathBuf>,
) -> Result<WorkerConfig, SettingsError> {
    let settings = load_settings(settings_path)?;

    let console = ConsoleSettings::default()
        .merge(&settings.console)
        .merge(&env::console_overrides()?)
        .validate()?;
    let drain = DrainPolicy::default().merge(&settings.drain);
    let codes = settings.status_codes()?;

    let url = env::api_url().or(settings.api.url);
    let token = env::api_token().or(settings.api.token);
    let console_file = console_file
        .or_else(env::console_file)
        .or(settings.console_file);
    let sink = match (url, console_file) {
        (Some(url), _) => SinkTarget::Http { url, token },
        (None, Some(path)) => SinkTarget::File(path),
        (None, None) => SinkTarget::Discard,
    };

    Ok(WorkerConfig {
        job: JobConfig {
            console,
            drain,
            codes,
        },
        sink,
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
