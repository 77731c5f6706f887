//! Fixed-budget node arena.
//!
//! [`ArenaAllocator`] reserves storage for a fixed number of nodes, derived
//! from [`ArenaConfig::capacity_bytes`], and never grows past it. Freed
//! slots are recycled through the slab's free list, so a workload whose
//! live node count stays under the budget runs forever without touching
//! the system allocator again.
//!
//! Blocks taken over through [`absorb`](NodeAllocator::absorb) keep
//! living in the donor's storage, which moves along with them. They are
//! not charged against this arena's budget: the budget bounds what the
//! arena itself allocates.

use log::{debug, trace, warn};

use linkdeque_core::{AllocError, AllocStats, AllocatorId, BlockHandle, NodeAllocator};

use crate::config::{block_bytes, ArenaConfig};
use crate::segments::Segments;

/// Bounded node allocator.
///
/// Storage is reserved in one piece: eagerly by [`ArenaAllocator::new`],
/// lazily on first use for instances built by
/// [`empty_like`](NodeAllocator::empty_like).
#[derive(Debug)]
pub struct ArenaAllocator<N> {
    segments: Segments<N>,
    stats: AllocStats,
    config: ArenaConfig,
    /// Slot budget derived from `config` for nodes of type `N`.
    max_slots: usize,
}

impl<N> ArenaAllocator<N> {
    /// Create an arena and reserve its full node budget.
    ///
    /// Returns `Err(AllocError::InvalidConfig)` if the budget cannot hold a
    /// single node or overflows the slot index range, and
    /// `Err(AllocError::OutOfMemory)` if the system cannot provide the
    /// budget.
    pub fn new(config: ArenaConfig) -> Result<Self, AllocError> {
        let mut arena = Self::unreserved(config)?;
        arena.ensure_storage()?;
        Ok(arena)
    }

    /// Create an arena sized for exactly `count` nodes.
    pub fn with_nodes(count: usize) -> Result<Self, AllocError> {
        Self::new(ArenaConfig::for_nodes::<N>(count))
    }

    fn unreserved(config: ArenaConfig) -> Result<Self, AllocError> {
        let max_slots = config.validate::<N>()?;
        Ok(Self {
            segments: Segments::new(),
            stats: AllocStats::new(block_bytes::<N>()),
            config,
            max_slots,
        })
    }

    /// The configuration this arena was built from.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Maximum number of nodes the arena can hold at once.
    pub fn max_blocks(&self) -> usize {
        self.max_slots
    }

    /// Blocks that can still be allocated before the arena is exhausted.
    pub fn available(&self) -> usize {
        let primary = self.segments.primary();
        primary.vacant() + (self.max_slots - primary.slot_count())
    }

    /// Number of adopted slabs that still hold blocks.
    pub fn adopted_segments(&self) -> usize {
        self.segments.adopted_segments()
    }

    /// Total budget in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.max_slots * self.stats.block_bytes
    }

    /// Reserve the whole slot budget if it is not reserved yet.
    fn ensure_storage(&mut self) -> Result<(), AllocError> {
        let primary = self.segments.primary_mut();
        if primary.storage_capacity() >= self.max_slots {
            return Ok(());
        }
        let missing = self.max_slots - primary.slot_count();
        if primary.try_reserve_exact_slots(missing).is_err() {
            return Err(self.out_of_memory(self.max_slots));
        }
        Ok(())
    }

    fn out_of_memory(&mut self, blocks: usize) -> AllocError {
        self.stats.record_failure();
        let err = AllocError::OutOfMemory {
            requested: blocks.saturating_mul(self.stats.block_bytes),
            capacity: self.capacity_bytes(),
        };
        debug!("arena allocator {}: {err}", self.segments.id());
        err
    }
}

impl<N> NodeAllocator<N> for ArenaAllocator<N> {
    fn id(&self) -> AllocatorId {
        self.segments.id()
    }

    fn allocate(&mut self, node: N) -> Result<BlockHandle, AllocError> {
        if self.available() == 0 {
            return Err(self.out_of_memory(1));
        }
        self.ensure_storage()?;
        let Some(block) = self.segments.insert(node) else {
            return Err(self.out_of_memory(1));
        };
        self.stats.record_allocation();
        trace!("arena allocator {}: allocated {block}", self.segments.id());
        Ok(block)
    }

    fn deallocate(&mut self, block: BlockHandle) -> Option<N> {
        match self.segments.remove(block) {
            Some(node) => {
                self.stats.record_deallocation();
                trace!("arena allocator {}: released {block}", self.segments.id());
                Some(node)
            }
            None => {
                self.stats.record_rejection();
                warn!(
                    "arena allocator {}: refused to release stale or foreign {block}",
                    self.segments.id()
                );
                None
            }
        }
    }

    fn get(&self, block: BlockHandle) -> Option<&N> {
        self.segments.get(block)
    }

    fn get_mut(&mut self, block: BlockHandle) -> Option<&mut N> {
        self.segments.get_mut(block)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        if additional > self.available() {
            return Err(self.out_of_memory(additional));
        }
        self.ensure_storage()
    }

    fn live_blocks(&self) -> usize {
        self.segments.len()
    }

    fn stats(&self) -> AllocStats {
        self.stats.clone()
    }

    fn absorb(&mut self, other: &mut Self) -> Result<(), AllocError> {
        let moved = match self.segments.try_adopt(&mut other.segments) {
            Ok(moved) => moved,
            Err(_) => return Err(self.out_of_memory(other.segments.len())),
        };
        self.stats.record_adoption(moved);
        other.stats.record_surrender(moved);
        debug!(
            "arena allocator {}: adopted {moved} blocks, donor is now {}",
            self.segments.id(),
            other.segments.id()
        );
        Ok(())
    }

    fn empty_like(&self) -> Self {
        Self {
            segments: Segments::new(),
            stats: AllocStats::new(self.stats.block_bytes),
            config: self.config.clone(),
            max_slots: self.max_slots,
        }
    }
}

impl<N> Drop for ArenaAllocator<N> {
    fn drop(&mut self) {
        if !self.segments.is_empty() {
            debug!(
                "arena allocator {} dropped with {} live blocks",
                self.segments.id(),
                self.segments.len()
            );
        }
    }
}
