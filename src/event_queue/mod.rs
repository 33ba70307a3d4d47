//! # Event Queue
//!
//! The shared, priority-ordered mailbox that every worker writes to and the
//! orchestrator's consumer drains.
//!
//! ## Ordering
//!
//! Events pop in non-increasing priority order. Among equal priorities they pop in
//! insertion order: whichever push physically took the lock first stays ahead.
//! Nothing else is promised about pushes racing from different threads.
//!
//! ## Structure
//!
//! Nodes live in a `BinaryHeap` keyed by `(priority, insertion sequence)`, where a
//! lower sequence ranks higher on ties. This keeps the FIFO tie-break of a sorted
//! linked list while making push and pop `O(log n)`.
//!
//! One `parking_lot::Mutex` guards the heap and the sequence counter together, so
//! `push` and `pop` are atomic with respect to each other.

pub mod error;

pub use error::QueueError;

use crate::model::{Event, Priority};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct QueuedEvent {
    priority: Priority,
    sequence: u64,
    event: Event,
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher priority first, then the older (smaller) sequence.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug, Default)]
struct QueueState {
    heap: BinaryHeap<QueuedEvent>,
    next_sequence: u64,
}

/// Thread-safe priority queue of [`Event`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    state: Mutex<QueueState>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `event` behind every queued event of equal or higher priority.
    ///
    /// # Errors
    /// [`QueueError::Allocation`] if a slot for the node cannot be reserved. The
    /// queue is not modified in that case.
    pub fn push(&self, event: Event) -> Result<(), QueueError> {
        let mut state = self.state.lock();
        state.heap.try_reserve(1).map_err(QueueError::Allocation)?;
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.heap.push(QueuedEvent {
            priority: event.priority,
            sequence,
            event,
        });
        Ok(())
    }

    /// Removes the most urgent event, the oldest among ties.
    ///
    /// `None` is the empty signal, not an error; an empty queue is left untouched.
    pub fn pop(&self) -> Option<Event> {
        self.state.lock().heap.pop().map(|queued| queued.event)
    }

    pub fn len(&self) -> usize {
        self.state.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().heap.is_empty()
    }

    /// Removes every queued event and returns them in pop order.
    pub fn drain(&self) -> Vec<Event> {
        let mut state = self.state.lock();
        let mut events = Vec::with_capacity(state.heap.len());
        while let Some(queued) = state.heap.pop() {
            events.push(queued.event);
        }
        events
    }

    /// Drops every queued event and releases the node storage.
    ///
    /// Returns how many events were discarded. Calling it on an empty queue is a no-op.
    pub fn clean(&self) -> usize {
        let mut state = self.state.lock();
        let discarded = state.heap.len();
        state.heap = BinaryHeap::new();
        discarded
    }
}
