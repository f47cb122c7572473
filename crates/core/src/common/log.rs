//! Append-only event log.
//!
//! Each model records its state transitions as typed events stamped with the
//! logical time at which they happened. The `Display` form of an event is the
//! human-readable history line shown by a presentation layer. Entries are only
//! ever appended; the owning model clears the log as part of a full reset.

use std::fmt;

use serde::Serialize;

/// A single time-stamped log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry<E> {
    /// Logical time (ms) at which the event was recorded.
    pub at: u64,
    /// The recorded event.
    pub event: E,
}

impl<E: fmt::Display> fmt::Display for LogEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}ms] {}", self.at, self.event)
    }
}

/// Ordered history of events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog<E> {
    entries: Vec<LogEntry<E>>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> EventLog<E> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event` recorded at logical time `at`.
    pub fn push(&mut self, at: u64, event: E) {
        self.entries.push(LogEntry { at, event });
    }

    /// All entries in recording order.
    pub fn entries(&self) -> &[LogEntry<E>] {
        &self.entries
    }

    /// Iterates over the recorded events without their timestamps.
    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(|entry| &entry.event)
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&LogEntry<E>> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E: fmt::Display> EventLog<E> {
    /// History lines in recording order, without timestamps.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.event.to_string()).collect()
    }
}
