// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console adapter: turns structural console calls into batched events.
//!
//! The adapter tracks at most one open group and one open command. Every
//! call appends one or more [`ConsoleEvent`]s to an in-memory buffer and
//! applies the flush policy:
//!
//! - structural calls (open/close) force a flush;
//! - messages flush once the buffer holds more than `batch_size` events;
//! - otherwise a single timer flushes the buffer after `flush_interval`.
//!
//! Flushed batches are posted on a spawned task so callers never wait on the
//! sink. [`ConsoleAdapter::pending_remote_calls`] counts posts still in
//! flight; the supervisor polls it before exiting.
//!
//! Job owners are lenient: calls that break nesting are kept as orphan
//! messages and replayed under a synthetic "Debug" group by
//! [`ConsoleAdapter::publish_debug_messages`]. Build-job owners are strict
//! and reject such calls with a [`ConsoleError`].

use crate::buffer::EventBuffer;
use crate::error::ConsoleError;
use crate::timestamp::TimestampSource;
use parking_lot::Mutex;
use rp_adapters::ConsoleSink;
use rp_core::{
    Clock, ConsoleEvent, ConsoleId, ConsoleKind, ConsoleMode, ConsoleOwner, ConsoleSettings,
    DrainPolicy, IdGen, SystemClock, UuidIdGen,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const DEBUG_GROUP: &str = "Debug";
const DEBUG_COMMAND: &str = "Debug logs";

struct OpenNode {
    id: ConsoleId,
    parent: ConsoleId,
    name: String,
}

struct FlushTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct AdapterState {
    group: Option<OpenNode>,
    command: Option<OpenNode>,
    buffer: EventBuffer,
    timer: Option<FlushTimer>,
    timer_generation: u64,
    orphans: Vec<String>,
}

struct Inner<S, C: Clock, G> {
    owner: ConsoleOwner,
    sink: S,
    ids: G,
    timestamps: TimestampSource<C>,
    settings: ConsoleSettings,
    runtime: Handle,
    pending: Arc<AtomicUsize>,
    state: Mutex<AdapterState>,
}

impl<S, C: Clock, G> Drop for Inner<S, C, G> {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.handle.abort();
        }
    }
}

/// Decrements the pending-call counter when a post finishes, however it ends.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Batching console for one job or build job.
///
/// Cheap to clone; clones share state.
pub struct ConsoleAdapter<S: ConsoleSink, C: Clock = SystemClock, G: IdGen = UuidIdGen> {
    inner: Arc<Inner<S, C, G>>,
}

impl<S: ConsoleSink, C: Clock, G: IdGen> Clone for ConsoleAdapter<S, C, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ConsoleSink> ConsoleAdapter<S> {
    /// Create an adapter on the current tokio runtime.
    pub fn new(
        sink: S,
        owner: ConsoleOwner,
        settings: ConsoleSettings,
    ) -> Result<Self, ConsoleError> {
        Self::with_deps(sink, owner, settings, SystemClock, UuidIdGen)
    }
}

impl<S: ConsoleSink, C: Clock, G: IdGen> ConsoleAdapter<S, C, G> {
    /// Create an adapter with an explicit clock and id generator.
    pub fn with_deps(
        sink: S,
        owner: ConsoleOwner,
        settings: ConsoleSettings,
        clock: C,
        ids: G,
    ) -> Result<Self, ConsoleError> {
        let runtime = Handle::try_current().map_err(|_| ConsoleError::NoRuntime)?;
        Ok(Self {
            inner: Arc::new(Inner {
                owner,
                sink,
                ids,
                timestamps: TimestampSource::new(clock),
                settings,
                runtime,
                pending: Arc::new(AtomicUsize::new(0)),
                state: Mutex::new(AdapterState::default()),
            }),
        })
    }

    pub fn owner(&self) -> &ConsoleOwner {
        &self.inner.owner
    }

    pub fn settings(&self) -> ConsoleSettings {
        self.inner.settings
    }

    /// Open a top-level group. A group that is already open stays open.
    pub fn open_group(&self, name: &str, is_shown: bool) -> Result<(), ConsoleError> {
        let mut state = self.inner.state.lock();
        if name.is_empty() {
            return self.reject(
                &mut state,
                ConsoleError::MissingName { op: "open_group" },
                "open_group called without a name",
            );
        }

        let id = self.inner.ids.next();
        let event = self
            .event(ConsoleKind::Grp, id.clone(), ConsoleId::root(), name)
            .shown(is_shown);
        state.buffer.push(event);
        state.group = Some(OpenNode {
            id,
            parent: ConsoleId::root(),
            name: name.to_string(),
        });
        self.apply_flush_policy(&mut state, true);
        Ok(())
    }

    /// Close the open group, closing its open command first. No-op when no
    /// group is open.
    pub fn close_group(&self, is_success: bool, is_shown: bool) {
        let mut state = self.inner.state.lock();
        let Some(group) = state.group.take() else {
            return;
        };

        self.push_command_close(&mut state, is_success);
        let now = self.inner.timestamps.now_us();
        let event = ConsoleEvent::new(
            &self.inner.owner,
            ConsoleKind::Grp,
            group.id,
            group.parent,
            group.name,
            now,
        )
        .closed(now, is_success)
        .shown(is_shown);
        state.buffer.push(event);
        self.apply_flush_policy(&mut state, true);
    }

    /// Open a command inside the open group.
    pub fn open_command(&self, name: &str) -> Result<(), ConsoleError> {
        let mut state = self.inner.state.lock();
        if name.is_empty() {
            return self.reject(
                &mut state,
                ConsoleError::MissingName { op: "open_command" },
                "open_command called without a name",
            );
        }

        let parent = match (&state.group, self.inner.owner.mode()) {
            (Some(group), _) => group.id.clone(),
            (None, ConsoleMode::Strict) => ConsoleId::root(),
            (None, ConsoleMode::Lenient) => {
                tracing::debug!(owner = %self.inner.owner, command = name, "command opened outside a group");
                state.orphans.push(name.to_string());
                return Ok(());
            }
        };

        let id = self.inner.ids.next();
        let event = self.event(ConsoleKind::Cmd, id.clone(), parent.clone(), name);
        state.buffer.push(event);
        state.command = Some(OpenNode {
            id,
            parent,
            name: name.to_string(),
        });
        self.apply_flush_policy(&mut state, true);
        Ok(())
    }

    /// Close the open command. No-op when no command is open.
    pub fn close_command(&self, is_success: bool) {
        let mut state = self.inner.state.lock();
        if self.push_command_close(&mut state, is_success) {
            self.apply_flush_policy(&mut state, true);
        }
    }

    /// Append a line of output to the open command. Messages do not force a
    /// flush.
    pub fn publish_message(&self, text: &str) -> Result<(), ConsoleError> {
        let mut state = self.inner.state.lock();
        let mode = self.inner.owner.mode();
        let Some(parent) = state.command.as_ref().map(|c| c.id.clone()) else {
            return match mode {
                ConsoleMode::Lenient => {
                    state.orphans.push(text.to_string());
                    Ok(())
                }
                ConsoleMode::Strict => Err(ConsoleError::NoOpenCommand),
            };
        };

        let message = match mode {
            ConsoleMode::Lenient => format!("{text}\n"),
            ConsoleMode::Strict => text.to_string(),
        };
        let event = self.event(ConsoleKind::Msg, self.inner.ids.next(), parent, message);
        state.buffer.push(event);
        self.apply_flush_policy(&mut state, false);
        Ok(())
    }

    /// Replay orphan messages under a synthetic "Debug" group. Does nothing
    /// when there are no orphans.
    pub fn publish_debug_messages(&self) -> Result<(), ConsoleError> {
        let orphans = std::mem::take(&mut self.inner.state.lock().orphans);
        if orphans.is_empty() {
            return Ok(());
        }

        tracing::info!(owner = %self.inner.owner, count = orphans.len(), "publishing orphan console messages");
        self.open_group(DEBUG_GROUP, true)?;
        self.open_command(DEBUG_COMMAND)?;
        for text in &orphans {
            self.publish_message(text)?;
        }
        self.close_command(true);
        self.close_group(true, true);
        Ok(())
    }

    /// Flush everything buffered now, cancelling any scheduled flush.
    pub fn flush(&self) {
        let mut state = self.inner.state.lock();
        self.apply_flush_policy(&mut state, true);
    }

    /// Number of batches posted to the sink that have not completed.
    pub fn pending_remote_calls(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Orphan messages waiting for [`Self::publish_debug_messages`].
    pub fn orphan_count(&self) -> usize {
        self.inner.state.lock().orphans.len()
    }

    /// Poll until no posts are in flight, backing off per `policy`.
    ///
    /// Returns false if posts were still pending after the last attempt.
    pub async fn wait_for_drain(&self, policy: &DrainPolicy) -> bool {
        for attempt in 0..policy.max_attempts {
            let pending = self.pending_remote_calls();
            if pending == 0 {
                return true;
            }
            let delay = policy.delay_for(attempt);
            tracing::debug!(owner = %self.inner.owner, pending, attempt, ?delay, "waiting for console posts");
            tokio::time::sleep(delay).await;
        }
        self.pending_remote_calls() == 0
    }

    fn event(
        &self,
        kind: ConsoleKind,
        id: ConsoleId,
        parent: ConsoleId,
        message: impl Into<String>,
    ) -> ConsoleEvent {
        ConsoleEvent::new(
            &self.inner.owner,
            kind,
            id,
            parent,
            message,
            self.inner.timestamps.now_us(),
        )
    }

    fn reject(
        &self,
        state: &mut AdapterState,
        error: ConsoleError,
        orphan: &str,
    ) -> Result<(), ConsoleError> {
        match self.inner.owner.mode() {
            ConsoleMode::Lenient => {
                tracing::debug!(owner = %self.inner.owner, %error, "recording orphan");
                state.orphans.push(orphan.to_string());
                Ok(())
            }
            ConsoleMode::Strict => Err(error),
        }
    }

    /// Buffer a close event for the open command. Returns false if none was
    /// open.
    fn push_command_close(&self, state: &mut AdapterState, is_success: bool) -> bool {
        let Some(command) = state.command.take() else {
            return false;
        };
        let now = self.inner.timestamps.now_us();
        let event = ConsoleEvent::new(
            &self.inner.owner,
            ConsoleKind::Cmd,
            command.id,
            command.parent,
            command.name,
            now,
        )
        .closed(now, is_success)
        .shown(false);
        state.buffer.push(event);
        true
    }

    fn apply_flush_policy(&self, state: &mut AdapterState, forced: bool) {
        if forced || state.buffer.exceeds(self.inner.settings.batch_size) {
            if let Some(timer) = state.timer.take() {
                timer.handle.abort();
            }
            let batch = state.buffer.drain();
            if batch.is_empty() {
                return;
            }
            self.dispatch(batch);
        } else if state.timer.is_none() {
            self.schedule_flush(state);
        }
    }

    fn dispatch(&self, batch: Vec<ConsoleEvent>) {
        let guard = PendingGuard::acquire(&self.inner.pending);
        let sink = self.inner.sink.clone();
        let owner = self.inner.owner.clone();
        self.inner.runtime.spawn(async move {
            let _guard = guard;
            if let Err(e) = sink.post_batch(&owner, &batch).await {
                tracing::error!(%owner, events = batch.len(), error = %e, "dropping console batch");
            }
        });
    }

    fn schedule_flush(&self, state: &mut AdapterState) {
        state.timer_generation += 1;
        let generation = state.timer_generation;
        // Deadline counts from the first buffered event, not from the task's first poll
        let deadline = tokio::time::Instant::now() + self.inner.settings.flush_interval;
        let weak: Weak<Inner<S, C, G>> = Arc::downgrade(&self.inner);
        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                ConsoleAdapter { inner }.on_timer(generation);
            }
        });
        state.timer = Some(FlushTimer { generation, handle });
    }

    fn on_timer(&self, generation: u64) {
        let mut state = self.inner.state.lock();
        if state.timer.as_ref().map(|t| t.generation) != Some(generation) {
            return;
        }
        state.timer = None;
        self.apply_flush_policy(&mut state, true);
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
