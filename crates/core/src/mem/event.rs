//! Allocator history events and operation outcomes.

use std::fmt;

use serde::Serialize;

/// A logged allocator operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemoryEvent {
    /// A request was placed in a block.
    Allocated {
        /// Requested size (KB).
        requested: u32,
        /// Chosen block.
        block: usize,
        /// Capacity of the chosen block (KB).
        block_size: u32,
        /// Requester label.
        owner: String,
    },
    /// No Free block could hold the request.
    AllocationFailed {
        /// Requested size (KB).
        requested: u32,
    },
    /// A block was returned to the free set.
    Freed {
        /// Freed block.
        block: usize,
        /// Its capacity (KB).
        block_size: u32,
        /// Label of the request that held it.
        owner: String,
    },
}

impl fmt::Display for MemoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocated {
                requested,
                block,
                block_size,
                owner,
            } => write!(
                f,
                "Allocated {requested}KB in Block {block} ({block_size}KB) for {owner}"
            ),
            Self::AllocationFailed { requested } => write!(
                f,
                "Allocation failed: No block large enough for {requested}KB request"
            ),
            Self::Freed {
                block,
                block_size,
                owner,
            } => write!(f, "Freed Block {block} ({block_size}KB) from {owner}"),
        }
    }
}

/// Result of [`MemoryAllocator::allocate`](super::MemoryAllocator::allocate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// The request was placed.
    Allocated {
        /// Chosen block.
        block: usize,
        /// Capacity of the chosen block (KB).
        block_size: u32,
        /// Label recorded for the request.
        owner: String,
    },
    /// Nothing fits; state is unchanged.
    Failed {
        /// Requested size (KB).
        requested: u32,
    },
}

impl AllocationOutcome {
    /// Returns `true` if the request was placed.
    pub const fn is_allocated(&self) -> bool {
        matches!(self, Self::Allocated { .. })
    }

    /// Chosen block, if the request was placed.
    pub const fn block(&self) -> Option<usize> {
        match self {
            Self::Allocated { block, .. } => Some(*block),
            Self::Failed { .. } => None,
        }
    }
}

/// Result of [`MemoryAllocator::free`](super::MemoryAllocator::free).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreeOutcome {
    /// A block was released.
    Freed {
        /// Released block.
        block: usize,
        /// Its capacity (KB).
        block_size: u32,
        /// Label of the request that held it.
        owner: String,
    },
    /// No block was Used.
    NoTarget,
}

impl FreeOutcome {
    /// Released block, if any.
    pub const fn block(&self) -> Option<usize> {
        match self {
            Self::Freed { block, .. } => Some(*block),
            Self::NoTarget => None,
        }
    }
}
