// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rp_core::ConsoleEvent;

/// Console events waiting to be flushed, in call order.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<ConsoleEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ConsoleEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True once the buffer holds more than `batch_size` events.
    pub fn exceeds(&self, batch_size: usize) -> bool {
        self.events.len() > batch_size
    }

    /// Take every buffered event, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<ConsoleEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
