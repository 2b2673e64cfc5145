//! Last-write-wins mailbox between producer and consumer.
//!
//! Logically a stack: the most recent push is the only entry worth
//! processing, everything underneath it is superseded and gets discarded
//! (but counted, so the pileup is visible in the logs).

use crate::types::AttributeEvent;
use std::sync::Mutex;

/// Result of one drain: the freshest event plus how many older buffered
/// events were removed and discarded alongside it.
#[derive(Debug)]
pub struct Drained {
    pub event: AttributeEvent,
    pub discarded: usize,
}

/// Thread-safe last-write-wins event buffer.
///
/// `push` and `drain_newest` contend on a single mutex; both are O(1)
/// amortized (`drain_newest` truncates the backlog in one critical
/// section). Growth is unbounded in pathological cases but bounded in
/// practice by the consumer's drain frequency.
#[derive(Debug, Default)]
pub struct Mailbox {
    stack: Mutex<Vec<AttributeEvent>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an event. Always succeeds; never blocks on anything but the
    /// (short) critical section.
    pub fn push(&self, event: AttributeEvent) {
        let mut stack = self.stack.lock().expect("mailbox mutex poisoned");
        stack.push(event);
    }

    /// Remove and return the most recently pushed event, discarding every
    /// older buffered event. Returns `None` when empty.
    ///
    /// A push racing with this call is either fully visible (the pushed
    /// event is the one returned or counted) or deferred to the next wake
    /// cycle — the mutex rules out torn reads.
    pub fn drain_newest(&self) -> Option<Drained> {
        let mut stack = self.stack.lock().expect("mailbox mutex poisoned");
        let event = stack.pop()?;
        let discarded = stack.len();
        stack.clear();
        Some(Drained { event, discarded })
    }

    /// Non-authoritative emptiness snapshot, for early-exit only: the
    /// answer may be stale by the time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        self.stack.lock().expect("mailbox mutex poisoned").is_empty()
    }

    /// Drop all buffered events, returning how many were abandoned.
    /// Used at teardown for leak-free shutdown.
    pub fn clear(&self) -> usize {
        let mut stack = self.stack.lock().expect("mailbox mutex poisoned");
        let abandoned = stack.len();
        stack.clear();
        abandoned
    }
}
