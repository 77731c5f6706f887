//! Arena allocator configuration.

use std::mem;

use linkdeque_core::AllocError;

use crate::slab::Slot;

/// Configuration for [`ArenaAllocator`](crate::ArenaAllocator).
///
/// The budget is charged per slot, not per bare node: each slot stores the
/// node together with its generation stamp and occupancy tag, so the arena
/// holds at most `capacity_bytes / size_of::<Slot<N>>()` nodes and the
/// reserved slot storage never exceeds `capacity_bytes`. The budget is
/// validated when the arena is built; all values are immutable after
/// creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Total node storage in bytes.
    ///
    /// Default: 1 MiB. Must hold at least one node, and the resulting
    /// slot count must fit in a `u32`.
    pub capacity_bytes: usize,
}

impl ArenaConfig {
    /// Default node budget: 1 MiB.
    pub const DEFAULT_CAPACITY_BYTES: usize = 1 << 20;

    /// Create a config with an explicit byte budget.
    pub fn new(capacity_bytes: usize) -> Self {
        Self { capacity_bytes }
    }

    /// Create a config sized for exactly `count` nodes of type `N`.
    pub fn for_nodes<N>(count: usize) -> Self {
        Self::new(count.saturating_mul(block_bytes::<N>()))
    }

    /// Number of slots for nodes of type `N` this budget provides.
    pub fn slots_for<N>(&self) -> usize {
        self.capacity_bytes / block_bytes::<N>()
    }

    /// Check the budget against node type `N`, returning its slot count.
    pub(crate) fn validate<N>(&self) -> Result<usize, AllocError> {
        if self.capacity_bytes == 0 {
            return Err(AllocError::InvalidConfig {
                reason: "capacity_bytes must be non-zero".into(),
            });
        }
        let slots = self.slots_for::<N>();
        if slots == 0 {
            return Err(AllocError::InvalidConfig {
                reason: format!(
                    "capacity_bytes ({}) is smaller than one node ({} bytes)",
                    self.capacity_bytes,
                    block_bytes::<N>(),
                ),
            });
        }
        if slots >= u32::MAX as usize {
            return Err(AllocError::InvalidConfig {
                reason: format!("capacity of {slots} nodes exceeds the u32 slot index range"),
            });
        }
        Ok(slots)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_BYTES)
    }
}

/// Bytes charged per block: the whole slot, generation stamp included.
pub(crate) fn block_bytes<N>() -> usize {
    mem::size_of::<Slot<N>>()
}
