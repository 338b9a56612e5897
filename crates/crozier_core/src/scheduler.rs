//! Time-ordered queue of pending worker actions.
//!
//! Events are value snapshots `(time, nest, worker)`. The nest may be gone
//! by the time an event fires; resolving it is the consumer's job.

use crate::error::{Result, SimError};
use crozier_data::{IndividualId, NestId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub nest_id: NestId,
    pub individual_id: IndividualId,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    event: Event,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

// BinaryHeap is a max-heap: earlier time, then earlier insertion, ranks higher.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default, Clone)]
pub struct EventScheduler {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { event, seq });
    }

    /// Removes and returns the earliest event. Ties pop in insertion order.
    pub fn pop_min(&mut self) -> Result<Event> {
        self.heap.pop().map(|e| e.event).ok_or(SimError::EmptyQueue)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.event.time)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
