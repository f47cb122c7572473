//! Configuration system for the simulator.
//!
//! This module defines all configuration structures used to parameterize both
//! models. It provides:
//! 1. **Defaults:** Baseline timing, process-generation, and block-generation constants.
//! 2. **Structures:** Hierarchical config for general, scheduler, and memory settings.
//! 3. **Speed:** The supported clock speed multipliers.
//!
//! Configuration is supplied as JSON (from a file through the CLI, or from the
//! browser through the wasm handles); use `Config::default()` otherwise.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::{SimError, SimResult};

/// Default configuration constants for the simulator.
///
/// These values reproduce the classroom visualization this simulator models
/// when not explicitly overridden in a JSON configuration.
mod defaults {
    /// Seed for the default xorshift random source.
    pub const SEED: u64 = 0x5EED_0F_FC_F5;

    /// Logical time covered by one driver tick at 1x speed (100 ms).
    pub const TICK_MS: u64 = 100;

    /// Grace period between highlighting the next process and running it (1 s).
    pub const ABOUT_TO_RUN_MS: u64 = 1000;

    /// Upper bound (exclusive) of the random gap between consecutive arrivals.
    pub const ARRIVAL_SPREAD_MS: u64 = 2000;

    /// Burst durations are whole multiples of this unit (1 s).
    pub const BURST_UNIT_MS: u64 = 1000;

    /// Smallest burst, in units.
    pub const MIN_BURST_UNITS: u64 = 1;

    /// Largest burst, in units.
    pub const MAX_BURST_UNITS: u64 = 5;

    /// Number of memory blocks in a session.
    pub const BLOCK_COUNT: usize = 12;

    /// Smallest randomly generated block size in KB.
    pub const MIN_BLOCK_KB: u32 = 64;

    /// Largest randomly generated block size in KB.
    pub const MAX_BLOCK_KB: u32 = 191;

    /// Request size a presentation layer offers before the user edits it.
    pub const DEFAULT_REQUEST_KB: u32 = 64;
}

/// Clock speed multipliers.
///
/// The multiplier scales how much logical time a single driver tick covers.
/// Deserialized from (and serialized to) its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Speed {
    /// 0.5x.
    Half,
    /// 1x.
    #[default]
    Normal,
    /// 2x.
    Double,
    /// 5x.
    Quintuple,
}

impl Speed {
    /// Every supported multiplier, slowest first.
    pub const ALL: [Self; 4] = [Self::Half, Self::Normal, Self::Double, Self::Quintuple];

    /// Numeric multiplier.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::Double => 2.0,
            Self::Quintuple => 5.0,
        }
    }

    /// Scales a logical duration by this multiplier using integer arithmetic.
    pub const fn scale(self, ms: u64) -> u64 {
        match self {
            Self::Half => ms / 2,
            Self::Normal => ms,
            Self::Double => ms * 2,
            Self::Quintuple => ms * 5,
        }
    }
}

impl TryFrom<f64> for Speed {
    type Error = SimError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|speed| (speed.multiplier() - value).abs() < f64::EPSILON)
            .ok_or(SimError::UnsupportedSpeed(value))
    }
}

impl From<Speed> for f64 {
    fn from(speed: Speed) -> Self {
        speed.multiplier()
    }
}

impl std::str::FromStr for Speed {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(['x', 'X']);
        let value: f64 = trimmed
            .parse()
            .map_err(|_| SimError::InvalidOperation(format!("speed {s}")))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use ossim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.scheduler.tick_ms, 100);
/// assert_eq!(config.memory.block_count, 12);
/// ```
///
/// Deserializing from JSON, with omitted fields falling back to defaults:
///
/// ```
/// use ossim_core::config::{Config, Speed};
///
/// let json = r#"{
///     "general": { "seed": 42 },
///     "scheduler": { "speed": 2, "max_burst_units": 3 },
///     "memory": { "block_sizes": [80, 100, 64] }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.seed, 42);
/// assert_eq!(config.scheduler.speed, Speed::Double);
/// assert_eq!(config.scheduler.max_burst_units, 3);
/// assert_eq!(config.memory.block_sizes, Some(vec![80, 100, 64]));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Process scheduler settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Memory allocator settings
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigParse`] for malformed JSON or unsupported speed
    /// values, and [`SimError::InvalidConfig`] when validation fails.
    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigRead`] when the file cannot be read, otherwise
    /// the errors of [`Config::from_json`].
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SimError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first violated constraint.
    pub fn validate(&self) -> SimResult<()> {
        self.scheduler.validate()?;
        self.memory.validate()
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seed for the default random source; the same seed replays the same session.
    #[serde(default = "GeneralConfig::default_seed")]
    pub seed: u64,

    /// Emit every logged simulation event as an `info` tracing event.
    #[serde(default)]
    pub trace_events: bool,
}

impl GeneralConfig {
    /// Returns the default seed.
    fn default_seed() -> u64 {
        defaults::SEED
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: defaults::SEED,
            trace_events: false,
        }
    }
}

/// Process scheduler timing and process-generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Logical ms covered by one tick at 1x speed
    #[serde(default = "SchedulerConfig::default_tick_ms")]
    pub tick_ms: u64,

    /// Logical ms between highlighting the next process and starting it
    #[serde(default = "SchedulerConfig::default_about_to_run_ms")]
    pub about_to_run_ms: u64,

    /// Exclusive upper bound on the random gap between consecutive arrivals
    #[serde(default = "SchedulerConfig::default_arrival_spread_ms")]
    pub arrival_spread_ms: u64,

    /// Burst durations are whole multiples of this many ms
    #[serde(default = "SchedulerConfig::default_burst_unit_ms")]
    pub burst_unit_ms: u64,

    /// Smallest burst in units
    #[serde(default = "SchedulerConfig::default_min_burst_units")]
    pub min_burst_units: u64,

    /// Largest burst in units
    #[serde(default = "SchedulerConfig::default_max_burst_units")]
    pub max_burst_units: u64,

    /// Initial speed multiplier
    #[serde(default)]
    pub speed: Speed,
}

impl SchedulerConfig {
    fn default_tick_ms() -> u64 {
        defaults::TICK_MS
    }

    fn default_about_to_run_ms() -> u64 {
        defaults::ABOUT_TO_RUN_MS
    }

    fn default_arrival_spread_ms() -> u64 {
        defaults::ARRIVAL_SPREAD_MS
    }

    fn default_burst_unit_ms() -> u64 {
        defaults::BURST_UNIT_MS
    }

    fn default_min_burst_units() -> u64 {
        defaults::MIN_BURST_UNITS
    }

    fn default_max_burst_units() -> u64 {
        defaults::MAX_BURST_UNITS
    }

    /// Checks that ticks advance time and that bursts are positive and representable.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] on the first violation.
    pub fn validate(&self) -> SimResult<()> {
        if self.tick_ms < 2 {
            return Err(SimError::InvalidConfig(
                "scheduler.tick_ms must be at least 2 so a 0.5x tick still advances".into(),
            ));
        }
        if self.burst_unit_ms == 0 || self.min_burst_units == 0 {
            return Err(SimError::InvalidConfig(
                "scheduler burst times must be positive".into(),
            ));
        }
        if self.min_burst_units > self.max_burst_units {
            return Err(SimError::InvalidConfig(format!(
                "scheduler.min_burst_units ({}) exceeds max_burst_units ({})",
                self.min_burst_units, self.max_burst_units
            )));
        }
        if self
            .max_burst_units
            .checked_mul(self.burst_unit_ms)
            .is_none()
        {
            return Err(SimError::InvalidConfig(format!(
                "scheduler.max_burst_units ({}) x burst_unit_ms ({}) overflows",
                self.max_burst_units, self.burst_unit_ms
            )));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: defaults::TICK_MS,
            about_to_run_ms: defaults::ABOUT_TO_RUN_MS,
            arrival_spread_ms: defaults::ARRIVAL_SPREAD_MS,
            burst_unit_ms: defaults::BURST_UNIT_MS,
            min_burst_units: defaults::MIN_BURST_UNITS,
            max_burst_units: defaults::MAX_BURST_UNITS,
            speed: Speed::Normal,
        }
    }
}

/// Memory block generation and allocator clock parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Number of blocks generated when `block_sizes` is absent
    #[serde(default = "MemoryConfig::default_block_count")]
    pub block_count: usize,

    /// Smallest random block size (KB)
    #[serde(default = "MemoryConfig::default_min_block_kb")]
    pub min_block_kb: u32,

    /// Largest random block size (KB)
    #[serde(default = "MemoryConfig::default_max_block_kb")]
    pub max_block_kb: u32,

    /// Explicit block sizes (KB), in block order; overrides random generation
    #[serde(default)]
    pub block_sizes: Option<Vec<u32>>,

    /// Logical ms the allocator's system clock advances per tick
    #[serde(default = "MemoryConfig::default_tick_ms")]
    pub tick_ms: u64,

    /// Request size offered to users before they pick one (KB)
    #[serde(default = "MemoryConfig::default_request_kb")]
    pub default_request_kb: u32,
}

impl MemoryConfig {
    fn default_block_count() -> usize {
        defaults::BLOCK_COUNT
    }

    fn default_min_block_kb() -> u32 {
        defaults::MIN_BLOCK_KB
    }

    fn default_max_block_kb() -> u32 {
        defaults::MAX_BLOCK_KB
    }

    fn default_tick_ms() -> u64 {
        defaults::TICK_MS
    }

    fn default_request_kb() -> u32 {
        defaults::DEFAULT_REQUEST_KB
    }

    /// Number of blocks a session built from this config will have.
    pub fn effective_block_count(&self) -> usize {
        self.block_sizes
            .as_ref()
            .map_or(self.block_count, Vec::len)
    }

    /// Checks that the block set is non-empty and every block has a positive size.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] on the first violation.
    pub fn validate(&self) -> SimResult<()> {
        match &self.block_sizes {
            Some(sizes) if sizes.is_empty() => Err(SimError::InvalidConfig(
                "memory.block_sizes must not be empty".into(),
            )),
            Some(sizes) if sizes.contains(&0) => Err(SimError::InvalidConfig(
                "memory.block_sizes entries must be positive".into(),
            )),
            Some(_) => Ok(()),
            None if self.block_count == 0 => Err(SimError::InvalidConfig(
                "memory.block_count must be positive".into(),
            )),
            None if self.min_block_kb == 0 => Err(SimError::InvalidConfig(
                "memory.min_block_kb must be positive".into(),
            )),
            None if self.min_block_kb > self.max_block_kb => {
                Err(SimError::InvalidConfig(format!(
                    "memory.min_block_kb ({}) exceeds max_block_kb ({})",
                    self.min_block_kb, self.max_block_kb
                )))
            }
            None => Ok(()),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            block_count: defaults::BLOCK_COUNT,
            min_block_kb: defaults::MIN_BLOCK_KB,
            max_block_kb: defaults::MAX_BLOCK_KB,
            block_sizes: None,
            tick_ms: defaults::TICK_MS,
            default_request_kb: defaults::DEFAULT_REQUEST_KB,
        }
    }
}
