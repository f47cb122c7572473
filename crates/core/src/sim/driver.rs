//! Clock driver.
//!
//! A presentation layer normally calls `tick` from a periodic timer. The driver
//! does the same thing synchronously: it starts the scheduler and ticks it until
//! every process has completed or a tick budget runs out.

use crate::mem::MemoryAllocator;
use crate::sched::FcfsScheduler;

/// Tick budget used by [`ClockDriver::default`].
pub const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Outcome of a driven run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveSummary {
    /// Ticks issued.
    pub ticks: u64,
    /// Scheduler clock after the last tick.
    pub clock: u64,
    /// Whether every process completed within the budget.
    pub drained: bool,
}

/// Synchronous replacement for a periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDriver {
    max_ticks: u64,
}

impl Default for ClockDriver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TICKS)
    }
}

impl ClockDriver {
    /// Creates a driver that issues at most `max_ticks` ticks per run.
    pub const fn new(max_ticks: u64) -> Self {
        Self { max_ticks }
    }

    /// Tick budget per run.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Starts `scheduler` and ticks it until drained or out of budget.
    pub fn run(&self, scheduler: &mut FcfsScheduler) -> DriveSummary {
        self.run_with(scheduler, |_| {})
    }

    /// Like [`ClockDriver::run`], calling `observe` after every tick.
    pub fn run_with<F>(&self, scheduler: &mut FcfsScheduler, mut observe: F) -> DriveSummary
    where
        F: FnMut(&FcfsScheduler),
    {
        scheduler.start();
        let mut ticks = 0;
        while ticks < self.max_ticks && !scheduler.is_drained() {
            let _ = scheduler.tick();
            ticks += 1;
            observe(scheduler);
        }
        DriveSummary {
            ticks,
            clock: scheduler.clock(),
            drained: scheduler.is_drained(),
        }
    }

    /// Issues exactly `ticks` ticks (bounded by the budget) without starting or
    /// stopping the scheduler.
    pub fn advance(&self, scheduler: &mut FcfsScheduler, ticks: u64) -> u64 {
        for _ in 0..ticks.min(self.max_ticks) {
            let _ = scheduler.tick();
        }
        scheduler.clock()
    }

    /// Advances the allocator's system clock by `ticks` ticks.
    pub fn advance_memory(&self, allocator: &mut MemoryAllocator, ticks: u64) -> u64 {
        for _ in 0..ticks.min(self.max_ticks) {
            let _ = allocator.tick();
        }
        allocator.system_time()
    }
}
