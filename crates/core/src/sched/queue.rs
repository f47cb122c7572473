//! Pending-transition queue.
//!
//! Delayed transitions (the "about to run" grace period and execution itself)
//! are stored as `(fire_at, seq)`-ordered entries in a min-heap on the logical
//! clock. Each entry carries the scheduler generation it was created in; the
//! scheduler drops entries whose generation is stale instead of removing them
//! from the heap.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::process::Pid;

/// A delayed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Transition {
    /// Ready (highlighted) → Running.
    Dispatch(Pid),
    /// Running → Completed.
    Complete(Pid),
}

impl Transition {
    /// Process the transition applies to.
    pub const fn pid(self) -> Pid {
        match self {
            Self::Dispatch(pid) | Self::Complete(pid) => pid,
        }
    }
}

/// A scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pending {
    /// Logical time at which the transition takes effect.
    pub fire_at: u64,
    /// Scheduling order; breaks ties between equal `fire_at`.
    pub seq: u64,
    /// Scheduler generation the transition belongs to.
    pub generation: u64,
    /// The state change.
    pub transition: Transition,
}

/// Min-heap of pending transitions.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `transition` at `fire_at`.
    pub fn schedule(&mut self, fire_at: u64, generation: u64, transition: Transition) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Pending {
            fire_at,
            seq,
            generation,
            transition,
        }));
    }

    /// Removes and returns the earliest entry if it is due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<Pending> {
        match self.heap.peek() {
            Some(Reverse(head)) if head.fire_at <= now => self.heap.pop().map(|Reverse(p)| p),
            _ => None,
        }
    }

    /// Fire time of the earliest entry.
    pub fn next_fire_at(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(p)| p.fire_at)
    }

    /// Removes every entry belonging to a generation other than `generation`.
    pub fn retain_generation(&mut self, generation: u64) {
        self.heap.retain(|Reverse(p)| p.generation == generation);
    }

    /// Number of queued entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
