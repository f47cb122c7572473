//! Scheduler history events.

use std::fmt;

use serde::Serialize;

use super::process::Pid;

/// A logged scheduler transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SchedulerEvent {
    /// A process was created.
    Added {
        /// New process.
        pid: Pid,
        /// Its arrival time.
        arrival: u64,
    },
    /// A process took the CPU.
    Started {
        /// Process that started.
        pid: Pid,
        /// Logical start time.
        at: u64,
    },
    /// A process finished.
    Completed {
        /// Process that finished.
        pid: Pid,
        /// Completion time.
        at: u64,
        /// Its burst time.
        burst: u64,
    },
}

impl SchedulerEvent {
    /// Process the event is about.
    pub const fn pid(&self) -> Pid {
        match self {
            Self::Added { pid, .. } | Self::Started { pid, .. } | Self::Completed { pid, .. } => {
                *pid
            }
        }
    }
}

impl fmt::Display for SchedulerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { pid, arrival } => {
                write!(f, "Process {pid} added (Arrives at {arrival}ms)")
            }
            Self::Started { pid, at } => write!(f, "PID {pid} started execution at {at}ms"),
            Self::Completed { pid, at, burst } => {
                write!(f, "PID {pid} completed at {at}ms (Duration: {burst}ms)")
            }
        }
    }
}
