//! Operating-system concepts simulator library.
//!
//! This crate implements two independent, deterministic simulation models:
//! 1. **Scheduler:** First-Come-First-Served process scheduling on a logical clock,
//!    driven by a discrete-event queue of pending transitions.
//! 2. **Memory:** Best-Fit allocation over a fixed set of memory blocks, with
//!    oldest-first deallocation and fragmentation statistics.
//! 3. **Common:** Error types, the injectable randomness source, and the event log.
//! 4. **Simulation:** Configuration, statistics reporting, and a clock driver.

/// Common types (errors, randomness source, event log).
pub mod common;
/// Simulator configuration (defaults, speed multipliers, JSON loading).
pub mod config;
/// Best-Fit memory allocator model.
pub mod mem;
/// FCFS process scheduler model.
pub mod sched;
/// Clock driver that advances the models without a wall-clock timer.
pub mod sim;
/// Derived statistics and text reports for both models.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::{Config, Speed};
/// Error type shared by configuration and command parsing.
pub use crate::common::error::{SimError, SimResult};
/// Best-Fit allocator over a fixed block set.
pub use crate::mem::MemoryAllocator;
/// FCFS scheduler over a logical clock.
pub use crate::sched::FcfsScheduler;
