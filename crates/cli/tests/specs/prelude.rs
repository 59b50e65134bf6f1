// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Variables the worker reads; cleared so the host environment cannot leak in.
const WORKER_VARS: [&str; 8] = [
    "RP_SETTINGS",
    "RP_API_URL",
    "RP_API_TOKEN",
    "RP_CONSOLE_FILE",
    "RP_CONSOLE_BATCH_SIZE",
    "RP_CONSOLE_FLUSH_INTERVAL_MS",
    "RP_LOG_FILE",
    "RUST_LOG",
];

/// Step script that reports one group with one successful command.
pub const GREETING_SCRIPT: &str = r#"
echo '__SH__GROUP__START__|{"is_shown":true}|Setup'
echo '__SH__CMD__START__||say hello'
echo hello
echo '__SH__CMD__END__|{"exitcode":"0"}'
echo '__SH__GROUP__END__|{"exitcode":"0","is_shown":true}'
"#;

/// Step script that fails after reporting its command.
pub const FAILING_SCRIPT: &str = r#"
echo '__SH__GROUP__START__|{"is_shown":true}|Build'
echo '__SH__CMD__START__||make'
echo 'make: *** [all] Error 2'
echo '__SH__CMD__END__|{"exitcode":"2"}'
echo '__SH__GROUP__END__|{"exitcode":"2","is_shown":true}'
exit 2
"#;

/// Returns a Command configured to run the reqproc binary.
fn reqproc_cmd() -> Command {
    Command::cargo_bin("reqproc").unwrap()
}

/// Fluent CLI builder.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
    stdin: Option<String>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: Vec::new(),
            stdin: None,
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn arg(mut self, arg: impl AsRef<Path>) -> Self {
        self.args
            .push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn pwd(mut self, path: impl AsRef<Path>) -> Self {
        self.dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = reqproc_cmd();
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        for var in WORKER_VARS {
            cmd.env_remove(var);
        }
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        if let Some(input) = self.stdin {
            cmd.write_stdin(input);
        }
        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

/// Temporary working directory for one spec.
pub struct Project {
    dir: tempfile::TempDir,
    /// Isolated config home so a real user settings file is never read
    config_home: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            config_home: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write a job message with one inline step running `script`.
    pub fn message(&self, owner: serde_json::Value, script: &str) -> PathBuf {
        let mut message = serde_json::json!({
            "steps": [{"name": "main", "script": script, "inline": true}],
        });
        if let (Some(fields), serde_json::Value::Object(owner)) = (message.as_object_mut(), owner)
        {
            fields.extend(owner);
        }
        self.file("message.json", &message.to_string())
    }

    /// Read console events written by the file sink, in timestamp order.
    pub fn console_events(&self, path: impl AsRef<Path>) -> Vec<serde_json::Value> {
        let content = std::fs::read_to_string(self.path().join(path.as_ref())).unwrap();
        let mut events: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        events.sort_by(|a, b| {
            let a = a["timestamp"].as_f64().unwrap_or_default();
            let b = b["timestamp"].as_f64().unwrap_or_default();
            a.total_cmp(&b)
        });
        events
    }

    /// Start a reqproc invocation in this project.
    pub fn reqproc(&self) -> CliBuilder {
        CliBuilder::new()
            .pwd(self.path())
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path())
    }
}
