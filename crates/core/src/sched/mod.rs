//! First-Come-First-Served process scheduler.
//!
//! The scheduler owns a list of simulated processes and a logical clock. It performs:
//! 1. **Creation:** `add_process` draws an arrival offset and burst from the random source.
//! 2. **Selection:** When the CPU is free, the eligible Ready process with the smallest
//!    arrival time (then smallest pid) is highlighted and queued to run after a grace period.
//! 3. **Execution:** Delayed Ready → Running → Completed transitions are entries in an
//!    [`EventQueue`], fired in order as `tick` advances the clock.
//! 4. **Liveness:** `stop` and `reset` bump a generation counter; transitions from an older
//!    generation, or whose process is no longer in the expected state, are discarded.
//!
//! There is a single CPU and no preemption: once Running, a process runs to completion.

/// Scheduler history events.
pub mod event;

/// Process records and lifecycle states.
pub mod process;

/// Pending-transition queue.
pub mod queue;

pub use event::SchedulerEvent;
pub use process::{Pid, Process, ProcessState, ProcessView, WaitLevel};
pub use queue::{EventQueue, Pending, Transition};

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::common::{EventLog, RandomSource, XorShift64};
use crate::config::{Config, SchedulerConfig, Speed};
use crate::stats::SchedulerStats;

/// Read-only, serializable view of the scheduler handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSnapshot {
    /// Logical clock (ms).
    pub clock: u64,
    /// Whether the clock is advancing.
    pub running: bool,
    /// Current speed multiplier.
    pub speed: Speed,
    /// Process selected to run next, during its grace period.
    pub highlighted: Option<Pid>,
    /// Every process in creation order.
    pub processes: Vec<Process>,
    /// History lines in recording order.
    pub log: Vec<String>,
    /// Derived statistics.
    pub stats: SchedulerStats,
}

/// FCFS scheduler state.
pub struct FcfsScheduler {
    config: SchedulerConfig,
    rng: Box<dyn RandomSource>,
    processes: Vec<Process>,
    clock: u64,
    running: bool,
    speed: Speed,
    highlighted: Option<Pid>,
    dispatch_at: Option<u64>,
    last_arrival: u64,
    queue: EventQueue,
    generation: u64,
    log: EventLog<SchedulerEvent>,
    trace_events: bool,
}

impl fmt::Debug for FcfsScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcfsScheduler")
            .field("clock", &self.clock)
            .field("running", &self.running)
            .field("speed", &self.speed)
            .field("highlighted", &self.highlighted)
            .field("processes", &self.processes.len())
            .field("pending", &self.queue.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl FcfsScheduler {
    /// Creates a stopped, empty scheduler drawing randomness from `rng`.
    pub fn new(config: SchedulerConfig, rng: Box<dyn RandomSource>) -> Self {
        let speed = config.speed;
        Self {
            config,
            rng,
            processes: Vec::new(),
            clock: 0,
            running: false,
            speed,
            highlighted: None,
            dispatch_at: None,
            last_arrival: 0,
            queue: EventQueue::new(),
            generation: 0,
            log: EventLog::new(),
            trace_events: false,
        }
    }

    /// Creates a scheduler from the root configuration, seeding the default generator.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.scheduler.clone(),
            Box::new(XorShift64::new(config.general.seed)),
        )
        .with_event_tracing(config.general.trace_events)
    }

    /// Emits each logged event as an `info` tracing event when `enabled`.
    #[must_use]
    pub fn with_event_tracing(mut self, enabled: bool) -> Self {
        self.trace_events = enabled;
        self
    }

    /// Creates a new Ready process and returns its pid.
    ///
    /// The arrival time is the previous arrival plus a random offset below
    /// `arrival_spread_ms`; the burst is a random whole number of `burst_unit_ms`.
    pub fn add_process(&mut self) -> Pid {
        let pid = (self.processes.len() + 1) as Pid;
        let arrival = self.last_arrival + self.rng.below(self.config.arrival_spread_ms);
        let units = self
            .rng
            .between(self.config.min_burst_units, self.config.max_burst_units);
        let burst = units * self.config.burst_unit_ms;

        self.processes.push(Process::new(pid, arrival, burst));
        self.last_arrival = arrival;
        self.record(self.clock, SchedulerEvent::Added { pid, arrival });
        pid
    }

    /// Starts the clock. In-flight work interrupted by `stop` is re-armed.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.queue.retain_generation(self.generation);
        self.rearm();
        debug!(clock = self.clock, speed = %self.speed, "scheduler started");
    }

    /// Stops the clock and invalidates every pending transition.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.generation += 1;
        debug!(clock = self.clock, "scheduler stopped");
    }

    /// Starts if stopped, stops if running.
    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Changes how much logical time each tick covers.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Clears processes, history and clock. The speed setting is kept.
    pub fn reset(&mut self) {
        self.processes.clear();
        self.log.clear();
        self.queue.clear();
        self.clock = 0;
        self.last_arrival = 0;
        self.running = false;
        self.highlighted = None;
        self.dispatch_at = None;
        self.generation += 1;
        debug!("scheduler reset");
    }

    /// Advances the clock by one tick and applies every transition that came due.
    ///
    /// Does nothing while stopped. Returns the clock after the tick.
    pub fn tick(&mut self) -> u64 {
        if !self.running {
            return self.clock;
        }
        self.clock += self.speed.scale(self.config.tick_ms);

        while let Some(pending) = self.queue.pop_due(self.clock) {
            self.apply(pending);
            self.select_next(pending.fire_at);
        }

        let now = self.clock;
        for process in &mut self.processes {
            process.refresh_wait(now);
        }
        self.select_next(now);
        self.clock
    }

    fn apply(&mut self, pending: Pending) {
        if pending.generation != self.generation || !self.running {
            debug!(?pending, generation = self.generation, "discarding stale transition");
            return;
        }
        let pid = pending.transition.pid();
        let Some(process) = self.processes.iter_mut().find(|p| p.pid() == pid) else {
            debug!(?pending, "discarding transition for unknown process");
            return;
        };

        match pending.transition {
            Transition::Dispatch(_) => {
                if self.highlighted != Some(pid) || process.state() != ProcessState::Ready {
                    debug!(?pending, state = %process.state(), "discarding dispatch");
                    return;
                }
                let at = pending.fire_at;
                process.begin(at);
                let burst = process.burst_time();
                self.highlighted = None;
                self.dispatch_at = None;
                self.queue
                    .schedule(at + burst, self.generation, Transition::Complete(pid));
                self.record(at, SchedulerEvent::Started { pid, at });
            }
            Transition::Complete(_) => {
                if process.state() != ProcessState::Running {
                    debug!(?pending, state = %process.state(), "discarding completion");
                    return;
                }
                let burst = process.burst_time();
                let at = process.finish();
                self.record(at, SchedulerEvent::Completed { pid, at, burst });
            }
        }
    }

    /// Highlights the next process if the CPU is free and queues its dispatch.
    fn select_next(&mut self, now: u64) {
        if !self.running || self.highlighted.is_some() || self.running_process().is_some() {
            return;
        }
        let next = self
            .processes
            .iter()
            .filter(|p| p.is_eligible(now))
            .min_by_key(|p| (p.arrival_time(), p.pid()))
            .map(Process::pid);

        if let Some(pid) = next {
            let fire_at = now + self.config.about_to_run_ms;
            self.highlighted = Some(pid);
            self.dispatch_at = Some(fire_at);
            self.queue
                .schedule(fire_at, self.generation, Transition::Dispatch(pid));
            debug!(pid, now, "next process highlighted");
        }
    }

    /// Re-queues the transition that was in flight when the clock stopped.
    fn rearm(&mut self) {
        let in_flight = self
            .running_process()
            .map(|p| (p.pid(), p.start_time().unwrap_or(self.clock) + p.burst_time()));

        if let Some((pid, completes_at)) = in_flight {
            self.queue.schedule(
                completes_at.max(self.clock),
                self.generation,
                Transition::Complete(pid),
            );
        } else if let Some(pid) = self.highlighted {
            let fire_at = self
                .dispatch_at
                .unwrap_or(self.clock + self.config.about_to_run_ms);
            self.queue.schedule(
                fire_at.max(self.clock),
                self.generation,
                Transition::Dispatch(pid),
            );
        }
    }

    fn record(&mut self, at: u64, event: SchedulerEvent) {
        if self.trace_events {
            info!(at, %event, "scheduler");
        }
        self.log.push(at, event);
    }

    /// Every process in creation order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Looks up a process by pid.
    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid() == pid)
    }

    /// The process holding the CPU, if any.
    pub fn running_process(&self) -> Option<&Process> {
        self.processes
            .iter()
            .find(|p| p.state() == ProcessState::Running)
    }

    /// Ready processes in the order FCFS will consider them.
    pub fn ready_queue(&self) -> Vec<&Process> {
        let mut ready: Vec<&Process> = self
            .processes
            .iter()
            .filter(|p| p.state() == ProcessState::Ready)
            .collect();
        ready.sort_by_key(|p| (p.arrival_time(), p.pid()));
        ready
    }

    /// Completed processes ordered by completion time.
    pub fn completed(&self) -> Vec<&Process> {
        let mut done: Vec<&Process> = self
            .processes
            .iter()
            .filter(|p| p.state() == ProcessState::Completed)
            .collect();
        done.sort_by_key(|p| (p.completion_time(), p.pid()));
        done
    }

    /// Process selected to run next, during its grace period.
    pub const fn highlighted(&self) -> Option<Pid> {
        self.highlighted
    }

    /// Logical clock (ms).
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Whether the clock is advancing.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Current speed multiplier.
    pub const fn speed(&self) -> Speed {
        self.speed
    }

    /// Scheduler configuration.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// History of transitions.
    pub const fn log(&self) -> &EventLog<SchedulerEvent> {
        &self.log
    }

    /// Fire time of the earliest queued transition, stale entries included.
    pub fn next_transition_at(&self) -> Option<u64> {
        self.queue.next_fire_at()
    }

    /// Returns `true` once every process has completed and nothing is selected.
    pub fn is_drained(&self) -> bool {
        self.highlighted.is_none()
            && self
                .processes
                .iter()
                .all(|p| p.state() == ProcessState::Completed)
    }

    /// Derived statistics at the current clock.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats::collect(&self.processes, self.clock)
    }

    /// Serializable view of the full state.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            clock: self.clock,
            running: self.running,
            speed: self.speed,
            highlighted: self.highlighted,
            processes: self.processes.clone(),
            log: self.log.messages(),
            stats: self.stats(),
        }
    }
}
