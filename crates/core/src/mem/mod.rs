//! Best-Fit memory allocator.
//!
//! The allocator owns a fixed, ordered set of memory blocks. It performs:
//! 1. **Allocation:** A request goes to the smallest Free block that can hold it
//!    (lowest id on ties). If none can, the failure is logged and nothing changes.
//! 2. **Deallocation:** `free` releases the lowest-id Used block; with no Used block
//!    it is a silent no-op.
//! 3. **Statistics:** Capacity, usage and external fragmentation are derived on demand.
//!
//! Block sizes are decided when the allocator is built and never change.

/// Memory block records.
pub mod block;

/// History events and operation outcomes.
pub mod event;

pub use block::{BlockStatus, MemoryBlock};
pub use event::{AllocationOutcome, FreeOutcome, MemoryEvent};

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::{EventLog, RandomSource, XorShift64};
use crate::config::{Config, MemoryConfig};
use crate::stats::MemoryStats;

/// Generated owner labels are `Process-{n}` with `n` below this bound.
const AUTO_LABEL_RANGE: u64 = 1000;

/// Read-only, serializable view of the allocator handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    /// Allocator system clock (ms).
    pub system_time: u64,
    /// Every block in id order.
    pub blocks: Vec<MemoryBlock>,
    /// History lines in recording order.
    pub log: Vec<String>,
    /// Derived statistics.
    pub stats: MemoryStats,
}

/// Best-Fit allocator state.
pub struct MemoryAllocator {
    config: MemoryConfig,
    rng: Box<dyn RandomSource>,
    blocks: Vec<MemoryBlock>,
    log: EventLog<MemoryEvent>,
    system_time: u64,
    trace_events: bool,
}

impl fmt::Debug for MemoryAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAllocator")
            .field("blocks", &self.blocks)
            .field("system_time", &self.system_time)
            .field("log_len", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl MemoryAllocator {
    /// Builds the block set from `config`: the explicit `block_sizes` list if present,
    /// otherwise `block_count` random sizes in `[min_block_kb, max_block_kb]`.
    pub fn new(config: MemoryConfig, mut rng: Box<dyn RandomSource>) -> Self {
        let sizes = config.block_sizes.clone().unwrap_or_else(|| {
            (0..config.block_count)
                .map(|_| {
                    rng.between(u64::from(config.min_block_kb), u64::from(config.max_block_kb))
                        as u32
                })
                .collect()
        });
        let blocks = sizes
            .into_iter()
            .enumerate()
            .map(|(id, size)| MemoryBlock::new(id, size))
            .collect();

        Self {
            config,
            rng,
            blocks,
            log: EventLog::new(),
            system_time: 0,
            trace_events: false,
        }
    }

    /// Creates an allocator from the root configuration, seeding the default generator.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.memory.clone(),
            Box::new(XorShift64::new(config.general.seed)),
        )
        .with_event_tracing(config.general.trace_events)
    }

    /// Creates an allocator over explicit block sizes with default settings otherwise.
    pub fn with_sizes(sizes: &[u32]) -> Self {
        let config = MemoryConfig {
            block_sizes: Some(sizes.to_vec()),
            ..MemoryConfig::default()
        };
        Self::new(config, Box::new(XorShift64::default()))
    }

    /// Emits each logged event as an `info` tracing event when `enabled`.
    #[must_use]
    pub fn with_event_tracing(mut self, enabled: bool) -> Self {
        self.trace_events = enabled;
        self
    }

    /// Places a request of `requested` KB using Best-Fit.
    ///
    /// An empty `label` is replaced by a generated `Process-{n}` name.
    pub fn allocate(&mut self, requested: u32, label: &str) -> AllocationOutcome {
        let best = self
            .blocks
            .iter_mut()
            .filter(|b| b.is_free() && b.size() >= requested)
            .min_by_key(|b| b.size());

        let Some(block) = best else {
            warn!(requested, "no free block large enough");
            self.record(MemoryEvent::AllocationFailed { requested });
            return AllocationOutcome::Failed { requested };
        };

        let owner = owner_label(self.rng.as_mut(), label);
        block.occupy(owner.clone(), requested);
        let id = block.id();
        let block_size = block.size();

        self.record(MemoryEvent::Allocated {
            requested,
            block: id,
            block_size,
            owner: owner.clone(),
        });
        AllocationOutcome::Allocated {
            block: id,
            block_size,
            owner,
        }
    }

    /// Releases the lowest-id Used block.
    pub fn free(&mut self) -> FreeOutcome {
        let Some(block) = self.blocks.iter_mut().find(|b| !b.is_free()) else {
            debug!("free requested with no used block");
            return FreeOutcome::NoTarget;
        };
        let id = block.id();
        let block_size = block.size();
        let owner = block.release().unwrap_or_default();

        self.record(MemoryEvent::Freed {
            block: id,
            block_size,
            owner: owner.clone(),
        });
        FreeOutcome::Freed {
            block: id,
            block_size,
            owner,
        }
    }

    /// Advances the system clock by one tick and returns it.
    pub fn tick(&mut self) -> u64 {
        self.system_time += self.config.tick_ms;
        self.system_time
    }

    /// Frees every block and clears history and clock. Block sizes are kept.
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            let _ = block.release();
        }
        self.log.clear();
        self.system_time = 0;
        debug!("allocator reset");
    }

    fn record(&mut self, event: MemoryEvent) {
        if self.trace_events {
            info!(at = self.system_time, %event, "memory");
        }
        self.log.push(self.system_time, event);
    }

    /// Every block in id order.
    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    /// Looks up a block by id.
    pub fn block(&self, id: usize) -> Option<&MemoryBlock> {
        self.blocks.get(id)
    }

    /// History of operations.
    pub const fn log(&self) -> &EventLog<MemoryEvent> {
        &self.log
    }

    /// Allocator system clock (ms).
    pub const fn system_time(&self) -> u64 {
        self.system_time
    }

    /// Allocator configuration.
    pub const fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Derived statistics over the current block set.
    pub fn compute_stats(&self) -> MemoryStats {
        MemoryStats::collect(&self.blocks)
    }

    /// Serializable view of the full state.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            system_time: self.system_time,
            blocks: self.blocks.clone(),
            log: self.log.messages(),
            stats: self.compute_stats(),
        }
    }
}

/// Trimmed `label`, or a generated `Process-{n}` when it is blank.
fn owner_label(rng: &mut dyn RandomSource, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        format!("Process-{}", rng.below(AUTO_LABEL_RANGE))
    } else {
        label.to_owned()
    }
}
