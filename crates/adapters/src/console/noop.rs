// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op console sink.

use super::{ConsoleSink, SinkError};
use async_trait::async_trait;
use rp_core::{ConsoleEvent, ConsoleOwner};

/// Console sink that silently discards every batch.
///
/// Used when neither an API nor a console file is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpConsoleSink;

impl NoOpConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConsoleSink for NoOpConsoleSink {
    async fn post_batch(
        &self,
        _owner: &ConsoleOwner,
        _events: &[ConsoleEvent],
    ) -> Result<(), SinkError> {
        Ok(())
    }
}
