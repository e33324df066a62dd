//! Deferred single-shot callbacks.
//!
//! Work that the original event loop ran from a timer is queued here instead.
//! The host waits out `delay` however it likes (a test harness may not wait
//! at all) and then asks the match to run the action to completion.

use alloc::collections::VecDeque;
use core::time::Duration;

/// Work that runs after turn transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// The automated side fires its whole salvo.
    OpponentSalvo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub action: DeferredAction,
    pub delay: Duration,
}

/// FIFO of pending deferred actions.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: VecDeque<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, action: DeferredAction, delay: Duration) {
        self.queue.push_back(Deferred { action, delay });
    }

    /// The next pending action without removing it.
    pub fn peek(&self) -> Option<&Deferred> {
        self.queue.front()
    }

    pub fn pop(&mut self) -> Option<Deferred> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
