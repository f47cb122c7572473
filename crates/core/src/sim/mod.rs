//! Simulation driving utilities.
//!
//! Provides the clock driver that advances the models in place of a periodic
//! wall-clock timer.

/// Synchronous clock driver for both models.
pub mod driver;

pub use driver::{ClockDriver, DriveSummary};
