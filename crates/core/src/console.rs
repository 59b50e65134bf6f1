// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console event records persisted to the control plane.

use crate::id::ConsoleId;
use crate::owner::ConsoleOwner;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Parent id used by top-level groups.
pub const ROOT_CONSOLE_ID: &str = "root";

/// Kind of console node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    /// Collapsible top-level section
    Grp,
    /// Unit of work inside a group
    Cmd,
    /// Line of output inside a command
    Msg,
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsoleKind::Grp => "grp",
            ConsoleKind::Cmd => "cmd",
            ConsoleKind::Msg => "msg",
        };
        f.write_str(s)
    }
}

/// One console event.
///
/// Open events carry only `timestamp`. Close events additionally carry
/// `timestamp_ended_at` and `is_success`, and reuse the id of the
/// corresponding open event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleEvent {
    pub owner_id: String,
    pub console_id: ConsoleId,
    pub parent_console_id: ConsoleId,
    #[serde(rename = "type")]
    pub kind: ConsoleKind,
    pub message: String,
    /// Microseconds since the Unix epoch, monotonic within one adapter
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ended_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_success: Option<bool>,
    pub is_shown: bool,
}

impl ConsoleEvent {
    /// Create an open (or message) event.
    pub fn new(
        owner: &ConsoleOwner,
        kind: ConsoleKind,
        console_id: ConsoleId,
        parent_console_id: ConsoleId,
        message: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            owner_id: owner.id().to_string(),
            console_id,
            parent_console_id,
            kind,
            message: message.into(),
            timestamp,
            timestamp_ended_at: None,
            is_success: None,
            is_shown: true,
        }
    }

    /// Mark this event as closing its node.
    pub fn closed(mut self, ended_at: f64, is_success: bool) -> Self {
        self.timestamp_ended_at = Some(ended_at);
        self.is_success = Some(is_success);
        self
    }

    pub fn shown(mut self, is_shown: bool) -> Self {
        self.is_shown = is_shown;
        self
    }

    pub fn is_close(&self) -> bool {
        self.timestamp_ended_at.is_some()
    }

    /// Serialize with the owner-specific id field (`jobId` or `buildJobId`).
    pub fn to_wire(&self, owner: &ConsoleOwner) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            if let Some(id) = map.remove("ownerId") {
                map.insert(owner.id_field().to_string(), id);
            }
        }
        value
    }
}

impl ConsoleId {
    /// The parent id of top-level groups.
    pub fn root() -> Self {
        ConsoleId::new(ROOT_CONSOLE_ID)
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_CONSOLE_ID
    }
}

/// Request body for persisting a batch of console events.
///
/// Jobs post `{"jobId", "jobConsoleModels"}`, build jobs post
/// `{"buildJobId", "buildJobConsoles"}`.
pub fn batch_body(owner: &ConsoleOwner, events: &[ConsoleEvent]) -> Value {
    let mut body = Map::new();
    body.insert(
        owner.id_field().to_string(),
        Value::String(owner.id().to_string()),
    );
    body.insert(
        owner.events_field().to_string(),
        Value::Array(events.iter().map(|e| e.to_wire(owner)).collect()),
    );
    Value::Object(body)
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
