// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sentinel line protocol.
//!
//! Generated step scripts interleave their normal output with pipe-delimited
//! sentinel lines that describe console structure and job control:
//!
//! ```text
//! __SH__GROUP__START__|{"is_shown":true}|Installing dependencies
//! __SH__CMD__START__|{}|npm ci
//! added 120 packages
//! __SH__CMD__END__|{"exitcode":"0"}
//! __SH__GROUP__END__|{"exitcode":"0","is_shown":true}
//! ```
//!
//! Parsing is stateless. All console state lives in the [`ConsoleAdapter`]
//! the lines are applied to, so lines from consecutive scripts of one job
//! build a single transcript.

use crate::console::ConsoleAdapter;
use crate::error::ConsoleError;
use rp_adapters::ConsoleSink;
use rp_core::{Clock, IdGen};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GROUP_START: &str = "__SH__GROUP__START__";
pub const GROUP_END: &str = "__SH__GROUP__END__";
pub const CMD_START: &str = "__SH__CMD__START__";
pub const CMD_END: &str = "__SH__CMD__END__";
pub const SCRIPT_END_FAILURE: &str = "__SH__SCRIPT_END_FAILURE__";
pub const SCRIPT_END_SUCCESS: &str = "__SH__SCRIPT_END_SUCCESS__";
pub const SHOULD_CONTINUE: &str = "__SH__SHOULD_CONTINUE__";
pub const SHOULD_NOT_CONTINUE: &str = "__SH__SHOULD_NOT_CONTINUE__";
pub const ON_START_ENV_COMPLETE: &str = "__SH_ON_START_JOB_ENV_SCRIPT_COMPLETE__";

pub const SENTINELS: [&str; 9] = [
    GROUP_START,
    GROUP_END,
    CMD_START,
    CMD_END,
    SCRIPT_END_FAILURE,
    SCRIPT_END_SUCCESS,
    SHOULD_CONTINUE,
    SHOULD_NOT_CONTINUE,
    ON_START_ENV_COMPLETE,
];

/// Classification of one line of script output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogLine {
    GroupStart { name: String, is_shown: bool },
    GroupEnd { is_success: bool, is_shown: bool },
    CommandStart { name: String },
    CommandEnd { is_success: bool },
    ScriptFailed,
    ShouldNotContinue,
    EnvReady,
    /// Control sentinel that never reaches the console
    Suppressed,
    Message { text: String },
}

/// Job-level effect of a line, reported back to the step runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSignal {
    /// The script reported failure; the job fails
    ScriptFailed,
    /// The job fails and no further steps run
    StopSteps,
    /// The on-start env file can be read
    EnvReady,
}

#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    is_shown: Option<bool>,
    #[serde(default)]
    exitcode: Option<Value>,
}

impl Payload {
    fn is_shown(&self) -> bool {
        self.is_shown.unwrap_or(true)
    }

    /// Only the string `"0"` is success. Numbers and a missing code fail.
    fn is_success(&self) -> bool {
        matches!(&self.exitcode, Some(Value::String(code)) if code == "0")
    }
}

/// Classify one line.
///
/// A sentinel with an unreadable JSON payload is logged and treated as a
/// plain message.
pub fn parse_line(line: &str) -> LogLine {
    let mut fields = line.splitn(3, '|');
    let sentinel = fields.next().unwrap_or_default();
    let payload = fields.next();
    let name = fields.next().unwrap_or_default();

    match sentinel {
        GROUP_START => match read_payload(sentinel, payload) {
            Some(p) => LogLine::GroupStart {
                name: name.to_string(),
                is_shown: p.is_shown(),
            },
            None => message(line),
        },
        GROUP_END => match read_payload(sentinel, payload) {
            Some(p) => LogLine::GroupEnd {
                is_success: p.is_success(),
                is_shown: p.is_shown(),
            },
            None => message(line),
        },
        CMD_START => LogLine::CommandStart {
            name: name.to_string(),
        },
        CMD_END => match read_payload(sentinel, payload) {
            Some(p) => LogLine::CommandEnd {
                is_success: p.is_success(),
            },
            None => message(line),
        },
        SCRIPT_END_FAILURE => LogLine::ScriptFailed,
        SHOULD_NOT_CONTINUE => LogLine::ShouldNotContinue,
        ON_START_ENV_COMPLETE => LogLine::EnvReady,
        SHOULD_CONTINUE | SCRIPT_END_SUCCESS => LogLine::Suppressed,
        _ => message(line),
    }
}

fn message(line: &str) -> LogLine {
    LogLine::Message {
        text: line.to_string(),
    }
}

fn read_payload(sentinel: &str, payload: Option<&str>) -> Option<Payload> {
    let raw = payload.unwrap_or_default();
    match serde_json::from_str(raw) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(sentinel, payload = raw, error = %e, "malformed sentinel payload");
            None
        }
    }
}

impl LogLine {
    /// Drive the console with this line.
    pub fn apply<S, C, G>(
        self,
        console: &ConsoleAdapter<S, C, G>,
    ) -> Result<Option<JobSignal>, ConsoleError>
    where
        S: ConsoleSink,
        C: Clock,
        G: IdGen,
    {
        match self {
            LogLine::GroupStart { name, is_shown } => console.open_group(&name, is_shown)?,
            LogLine::GroupEnd {
                is_success,
                is_shown,
            } => console.close_group(is_success, is_shown),
            LogLine::CommandStart { name } => console.open_command(&name)?,
            LogLine::CommandEnd { is_success } => console.close_command(is_success),
            LogLine::ScriptFailed => return Ok(Some(JobSignal::ScriptFailed)),
            LogLine::ShouldNotContinue => return Ok(Some(JobSignal::StopSteps)),
            LogLine::EnvReady => return Ok(Some(JobSignal::EnvReady)),
            LogLine::Suppressed => {}
            LogLine::Message { text } => console.publish_message(&text)?,
        }
        Ok(None)
    }
}

/// Parse one line and apply it to the console.
pub fn feed_line<S, C, G>(
    console: &ConsoleAdapter<S, C, G>,
    line: &str,
) -> Result<Option<JobSignal>, ConsoleError>
where
    S: ConsoleSink,
    C: Clock,
    G: IdGen,
{
    parse_line(line).apply(console)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
