//! Allocation statistics.
//!
//! [`AllocStats`] is a point-in-time snapshot of an allocator's
//! bookkeeping, used by tests to prove there are no leaks and by
//! benchmarks to report memory use.

/// Counters maintained by every allocator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Blocks currently handed out.
    pub live_blocks: usize,
    /// Highest value `live_blocks` has reached.
    pub peak_live_blocks: usize,
    /// Cumulative number of successful `allocate` calls.
    pub total_allocations: u64,
    /// Cumulative number of successful `deallocate` calls.
    pub total_deallocations: u64,
    /// Cumulative number of `allocate` calls that returned out-of-memory.
    pub failed_allocations: u64,
    /// Cumulative number of `deallocate` calls refused for a stale or foreign block.
    pub rejected_deallocations: u64,
    /// Cumulative number of blocks taken over from other allocators.
    pub adopted_blocks: u64,
    /// Size of one block in bytes.
    pub block_bytes: usize,
}

impl AllocStats {
    /// Create zeroed stats for blocks of `block_bytes` bytes.
    pub fn new(block_bytes: usize) -> Self {
        Self {
            block_bytes,
            ..Self::default()
        }
    }

    /// Bytes currently handed out.
    pub fn live_bytes(&self) -> usize {
        self.live_blocks * self.block_bytes
    }

    /// Record a successful allocation.
    pub fn record_allocation(&mut self) {
        self.live_blocks += 1;
        self.total_allocations += 1;
        self.peak_live_blocks = self.peak_live_blocks.max(self.live_blocks);
    }

    /// Record a successful deallocation.
    pub fn record_deallocation(&mut self) {
        self.live_blocks = self.live_blocks.saturating_sub(1);
        self.total_deallocations += 1;
    }

    /// Record an allocation that failed.
    pub fn record_failure(&mut self) {
        self.failed_allocations += 1;
    }

    /// Record a deallocation that was refused.
    pub fn record_rejection(&mut self) {
        self.rejected_deallocations += 1;
    }

    /// Record `blocks` live blocks taken over from another allocator.
    pub fn record_adoption(&mut self, blocks: usize) {
        self.live_blocks += blocks;
        self.adopted_blocks += blocks as u64;
        self.peak_live_blocks = self.peak_live_blocks.max(self.live_blocks);
    }

    /// Record `blocks` live blocks handed over to another allocator.
    pub fn record_surrender(&mut self, blocks: usize) {
        self.live_blocks = self.live_blocks.saturating_sub(blocks);
    }
}
