//! Simulated process records.

use std::fmt;

use serde::Serialize;

/// Process identifier; assigned sequentially from 1.
pub type Pid = u32;

/// Wait above this many ms is reported as [`WaitLevel::Elevated`].
pub const ELEVATED_WAIT_MS: u64 = 1000;

/// Wait above this many ms is reported as [`WaitLevel::Critical`].
pub const CRITICAL_WAIT_MS: u64 = 3000;

/// Lifecycle state. Transitions only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    /// Created, waiting for the CPU.
    Ready,
    /// Holding the (single) CPU.
    Running,
    /// Finished; terminal.
    Completed,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Completed => "Completed",
        };
        f.write_str(name)
    }
}

/// How long a Ready process has been waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WaitLevel {
    /// Up to [`ELEVATED_WAIT_MS`].
    Normal,
    /// Above [`ELEVATED_WAIT_MS`].
    Elevated,
    /// Above [`CRITICAL_WAIT_MS`].
    Critical,
}

impl WaitLevel {
    /// Classifies a wait duration.
    pub const fn classify(wait_ms: u64) -> Self {
        if wait_ms > CRITICAL_WAIT_MS {
            Self::Critical
        } else if wait_ms > ELEVATED_WAIT_MS {
            Self::Elevated
        } else {
            Self::Normal
        }
    }
}

/// A simulated process.
///
/// Fields are read-only outside the scheduler so the forward-only lifecycle
/// cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ProcessView")]
pub struct Process {
    pid: Pid,
    state: ProcessState,
    arrival_time: u64,
    burst_time: u64,
    start_time: Option<u64>,
    completion_time: u64,
    wait_time: u64,
}

impl Process {
    pub(crate) const fn new(pid: Pid, arrival_time: u64, burst_time: u64) -> Self {
        Self {
            pid,
            state: ProcessState::Ready,
            arrival_time,
            burst_time,
            start_time: None,
            completion_time: 0,
            wait_time: 0,
        }
    }

    /// Identifier.
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    /// Logical time at which the process becomes eligible to run.
    pub const fn arrival_time(&self) -> u64 {
        self.arrival_time
    }

    /// Required execution time.
    pub const fn burst_time(&self) -> u64 {
        self.burst_time
    }

    /// Logical time at which the process started running, once it has.
    pub const fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    /// Start time plus burst time once Completed, otherwise 0.
    pub const fn completion_time(&self) -> u64 {
        self.completion_time
    }

    /// Time spent eligible but not running. Frozen once the process starts.
    pub const fn wait_time(&self) -> u64 {
        self.wait_time
    }

    /// Completion minus arrival, for Completed processes.
    pub const fn turnaround(&self) -> Option<u64> {
        match self.state {
            ProcessState::Completed => Some(self.completion_time - self.arrival_time),
            _ => None,
        }
    }

    /// Wait classification of this process's current wait time.
    pub const fn wait_level(&self) -> WaitLevel {
        WaitLevel::classify(self.wait_time)
    }

    /// Returns `true` if the process is Ready and has arrived by `now`.
    pub fn is_eligible(&self, now: u64) -> bool {
        self.state == ProcessState::Ready && self.arrival_time <= now
    }

    pub(crate) fn refresh_wait(&mut self, now: u64) {
        if self.is_eligible(now) {
            self.wait_time = now - self.arrival_time;
        }
    }

    pub(crate) fn begin(&mut self, now: u64) {
        self.state = ProcessState::Running;
        self.start_time = Some(now);
        self.wait_time = now.saturating_sub(self.arrival_time);
    }

    /// Marks the process Completed and returns its completion time.
    pub(crate) fn finish(&mut self) -> u64 {
        let start = self.start_time.unwrap_or(self.arrival_time);
        self.state = ProcessState::Completed;
        self.completion_time = start + self.burst_time;
        self.completion_time
    }
}

/// Serialized form of a [`Process`], with the derived read-model fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessView {
    /// Identifier.
    pub pid: Pid,
    /// Lifecycle state.
    pub state: ProcessState,
    /// Arrival time (ms).
    pub arrival_time: u64,
    /// Burst time (ms).
    pub burst_time: u64,
    /// Start time (ms), once started.
    pub start_time: Option<u64>,
    /// Completion time (ms), 0 until Completed.
    pub completion_time: u64,
    /// Wait time (ms).
    pub wait_time: u64,
    /// Completion minus arrival, once Completed.
    pub turnaround: Option<u64>,
    /// Classification of `wait_time`.
    pub wait_level: WaitLevel,
}

impl From<Process> for ProcessView {
    fn from(p: Process) -> Self {
        Self {
            turnaround: p.turnaround(),
            wait_level: p.wait_level(),
            pid: p.pid,
            state: p.state,
            arrival_time: p.arrival_time,
            burst_time: p.burst_time,
            start_time: p.start_time,
            completion_time: p.completion_time,
            wait_time: p.wait_time,
        }
    }
}
