//! Common types shared by both simulation models.
//!
//! This module provides the building blocks that the scheduler and allocator
//! have in common:
//! 1. **Errors:** `SimError` for configuration and command failures.
//! 2. **Randomness:** The injectable `RandomSource` trait and its default generator.
//! 3. **Event log:** The append-only, time-stamped history of state transitions.

/// Error types for configuration and command parsing.
pub mod error;

/// Append-only event log.
pub mod log;

/// Injectable pseudo-random number source.
pub mod rng;

pub use error::{SimError, SimResult};
pub use log::{EventLog, LogEntry};
pub use rng::{RandomSource, XorShift64};
