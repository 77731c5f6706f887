//! Default allocator backed by the process heap.
//!
//! [`HeapAllocator`] keeps nodes in the primary [`Slab`] of a
//! [`Segments`] list, whose slot table grows on demand. Growth goes through
//! `Vec::try_reserve`, so heap exhaustion is reported as
//! [`AllocError::OutOfMemory`] instead of aborting.
//!
//! [`Slab`]: crate::slab::Slab

use log::{debug, trace, warn};

use linkdeque_core::{AllocError, AllocStats, AllocatorId, BlockHandle, NodeAllocator};

use crate::config::block_bytes;
use crate::segments::Segments;

/// Unbounded node allocator on the process heap.
#[derive(Debug)]
pub struct HeapAllocator<N> {
    segments: Segments<N>,
    stats: AllocStats,
}

impl<N> HeapAllocator<N> {
    /// Create an empty allocator. Nothing is allocated until first use.
    pub fn new() -> Self {
        Self {
            segments: Segments::new(),
            stats: AllocStats::new(block_bytes::<N>()),
        }
    }

    /// Create an allocator with room for `blocks` nodes up front.
    pub fn with_capacity(blocks: usize) -> Result<Self, AllocError> {
        let mut alloc = Self::new();
        alloc.reserve(blocks)?;
        Ok(alloc)
    }

    /// Bytes of slot storage reserved for new blocks.
    pub fn capacity_bytes(&self) -> usize {
        self.segments.primary().storage_capacity() * self.stats.block_bytes
    }

    /// Number of slabs taken over through [`absorb`](NodeAllocator::absorb)
    /// that still hold blocks.
    pub fn adopted_segments(&self) -> usize {
        self.segments.adopted_segments()
    }

    fn out_of_memory(&mut self, blocks: usize) -> AllocError {
        self.stats.record_failure();
        let err = AllocError::OutOfMemory {
            requested: blocks.saturating_mul(self.stats.block_bytes),
            capacity: self.capacity_bytes(),
        };
        debug!("heap allocator {}: {err}", self.segments.id());
        err
    }
}

impl<N> Default for HeapAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeAllocator<N> for HeapAllocator<N> {
    fn id(&self) -> AllocatorId {
        self.segments.id()
    }

    fn allocate(&mut self, node: N) -> Result<BlockHandle, AllocError> {
        if self.segments.primary_mut().try_reserve_blocks(1).is_err() {
            return Err(self.out_of_memory(1));
        }
        let Some(block) = self.segments.insert(node) else {
            return Err(self.out_of_memory(1));
        };
        self.stats.record_allocation();
        trace!("heap allocator {}: allocated {block}", self.segments.id());
        Ok(block)
    }

    fn deallocate(&mut self, block: BlockHandle) -> Option<N> {
        match self.segments.remove(block) {
            Some(node) => {
                self.stats.record_deallocation();
                trace!("heap allocator {}: released {block}", self.segments.id());
                Some(node)
            }
            None => {
                self.stats.record_rejection();
                warn!(
                    "heap allocator {}: refused to release stale or foreign {block}",
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
        let primary = self.segments.primary_mut();
        let fits_index = primary
            .slot_count()
            .checked_add(additional.saturating_sub(primary.vacant()))
            .is_some_and(|total| total < u32::MAX as usize);
        if !fits_index || primary.try_reserve_blocks(additional).is_err() {
            return Err(self.out_of_memory(additional));
        }
        Ok(())
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
            "heap allocator {}: adopted {moved} blocks, donor is now {}",
            self.segments.id(),
            other.segments.id()
        );
        Ok(())
    }

    fn empty_like(&self) -> Self {
        Self::new()
    }
}

impl<N> Drop for HeapAllocator<N> {
    fn drop(&mut self) {
        if !self.segments.is_empty() {
            debug!(
                "heap allocator {} dropped with {} live blocks",
                self.segments.id(),
                self.segments.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_read_back() {
        let mut alloc = HeapAllocator::new();
        let h = alloc.allocate(5u32).unwrap();
        assert_eq!(alloc.get(h), Some(&5));
        assert_eq!(alloc.live_blocks(), 1);
        assert_eq!(h.allocator(), alloc.id());
    }

    #[test]
    fn deallocate_returns_node_once() {
        let mut alloc = HeapAllocator::new();
        let h = alloc.allocate(String::from("n")).unwrap();
        assert_eq!(alloc.deallocate(h).as_deref(), Some("n"));
        assert!(alloc.deallocate(h).is_none());

        let stats = alloc.stats();
        assert_eq!(stats.total_allocations, 1);
        assert_eq!(stats.total_deallocations, 1);
        assert_eq!(stats.rejected_deallocations, 1);
        assert_eq!(stats.live_blocks, 0);
    }

    #[test]
    fn foreign_block_leaves_both_allocators_untouched() {
        let mut a = HeapAllocator::new();
        let mut b = HeapAllocator::new();
        let ha = a.allocate(1u8).unwrap();
        let hb = b.allocate(2u8).unwrap();

        assert!(a.deallocate(hb).is_none());
        assert_eq!(a.get(ha), Some(&1));
        assert_eq!(b.get(hb), Some(&2));
        assert_eq!(a.live_blocks(), 1);
        assert_eq!(b.live_blocks(), 1);
    }

    #[test]
    fn with_capacity_reserves_storage() {
        let alloc: HeapAllocator<u64> = HeapAllocator::with_capacity(32).unwrap();
        assert!(alloc.capacity_bytes() >= 32 * block_bytes::<u64>());
        assert_eq!(alloc.live_blocks(), 0);
    }

    #[test]
    fn empty_like_has_fresh_identity() {
        let mut a = HeapAllocator::new();
        a.allocate(1i32).unwrap();
        let b = a.empty_like();
        assert_ne!(a.id(), b.id());
        assert_eq!(b.live_blocks(), 0);
    }

    #[test]
    fn impossible_reservation_is_out_of_memory() {
        let mut alloc: HeapAllocator<u64> = HeapAllocator::new();
        let err = alloc.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, AllocError::OutOfMemory { .. }));
        assert_eq!(alloc.stats().failed_allocations, 1);
    }

    #[test]
    fn absorb_keeps_donor_handles_valid() {
        let mut a = HeapAllocator::new();
        let mut b = HeapAllocator::new();
        let ha = a.allocate(1u32).unwrap();
        let hb: Vec<_> = (2..5u32).map(|v| b.allocate(v).unwrap()).collect();
        let donor_id = b.id();

        a.absorb(&mut b).unwrap();
        assert_eq!(a.live_blocks(), 4);
        assert_eq!(a.adopted_segments(), 1);
        assert_eq!(a.get(ha), Some(&1));
        assert_eq!(a.get(hb[1]), Some(&3));
        assert_eq!(b.live_blocks(), 0);
        assert_ne!(b.id(), donor_id);
        assert!(b.get(hb[0]).is_none());

        let stats = a.stats();
        assert_eq!(stats.total_allocations, 1);
        assert_eq!(stats.adopted_blocks, 3);
        assert_eq!(stats.live_blocks, 4);
        assert_eq!(b.stats().live_blocks, 0);

        for h in hb {
            assert!(a.deallocate(h).is_some());
        }
        assert_eq!(a.adopted_segments(), 0);
        assert_eq!(a.stats().rejected_deallocations, 0);
    }

    #[test]
    fn donor_allocates_again_after_absorb() {
        let mut a = HeapAllocator::new();
        let mut b = HeapAllocator::new();
        b.allocate('x').unwrap();
        a.absorb(&mut b).unwrap();

        let h = b.allocate('y').unwrap();
        assert_eq!(h.allocator(), b.id());
        assert_eq!(b.get(h), Some(&'y'));
        assert!(a.get(h).is_none());
    }

    #[test]
    fn peak_live_blocks_tracks_high_water_mark() {
        let mut alloc = HeapAllocator::new();
        let handles: Vec<_> = (0..5).map(|i| alloc.allocate(i).unwrap()).collect();
        for h in handles {
            alloc.deallocate(h).unwrap();
        }
        let stats = alloc.stats();
        assert_eq!(stats.peak_live_blocks, 5);
        assert_eq!(stats.live_blocks, 0);
    }
}
