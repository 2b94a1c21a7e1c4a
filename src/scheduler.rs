//! Delayed-callback queue for a single-threaded game loop.
//!
//! Jobs are plain values rather than closures so nothing captures the round
//! state.  Time is whatever millisecond clock the caller feeds in; tests use
//! a virtual clock, the game loop uses time since the round started.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry<J> {
    due_ms: u64,
    /// Insertion order; breaks ties so equal due times fire FIFO.
    seq: u64,
    job: J,
}

#[derive(Debug)]
pub struct Scheduler<J> {
    queue: BinaryHeap<Reverse<Entry<J>>>,
    next_seq: u64,
}

impl<J: Ord> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: Ord> Scheduler<J> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule_at(&mut self, due_ms: u64, job: J) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due_ms, seq, job }));
    }

    /// Remove and return the earliest job due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, J)> {
        match self.queue.peek() {
            Some(Reverse(e)) if e.due_ms <= now_ms => {}
            _ => return None,
        }
        self.queue.pop().map(|Reverse(e)| (e.due_ms, e.job))
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(e)| e.due_ms)
    }

    /// Drop every pending job.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
