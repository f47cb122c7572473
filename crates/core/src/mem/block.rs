//! Memory block records.

use serde::Serialize;

/// Occupancy of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockStatus {
    /// Available for allocation.
    Free,
    /// Holding one request.
    Used,
}

/// One fixed-size block of simulated memory.
///
/// A Used block always records its owner and the granted request size, and the
/// granted size never exceeds the block size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryBlock {
    id: usize,
    size: u32,
    status: BlockStatus,
    #[serde(rename = "processId")]
    owner: Option<String>,
    #[serde(rename = "processSize")]
    granted: Option<u32>,
}

impl MemoryBlock {
    pub(crate) const fn new(id: usize, size: u32) -> Self {
        Self {
            id,
            size,
            status: BlockStatus::Free,
            owner: None,
            granted: None,
        }
    }

    /// Position in the block sequence.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Capacity in KB.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Current occupancy.
    pub const fn status(&self) -> BlockStatus {
        self.status
    }

    /// Label of the occupying request.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Granted request size in KB.
    pub const fn granted(&self) -> Option<u32> {
        self.granted
    }

    /// Returns `true` if the block is Free.
    pub fn is_free(&self) -> bool {
        self.status == BlockStatus::Free
    }

    /// Unused capacity inside a Used block (0 when Free).
    pub fn internal_waste(&self) -> u32 {
        self.granted.map_or(0, |granted| self.size - granted)
    }

    pub(crate) fn occupy(&mut self, owner: String, granted: u32) {
        debug_assert!(granted <= self.size);
        self.status = BlockStatus::Used;
        self.owner = Some(owner);
        self.granted = Some(granted);
    }

    /// Frees the block, returning the previous owner.
    pub(crate) fn release(&mut self) -> Option<String> {
        self.status = BlockStatus::Free;
        self.granted = None;
        self.owner.take()
    }
}
