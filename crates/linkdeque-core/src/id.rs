//! Allocator identities and block handles.
//!
//! A [`BlockHandle`] names one node slot inside one allocator instance. It
//! is generation-scoped: the `generation` field allows O(1) staleness
//! checks without a lookup table, and the [`AllocatorId`] lets an allocator
//! reject handles it did not mint.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`AllocatorId`] allocation.
static ALLOCATOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an allocator.
///
/// Allocated from a monotonic atomic counter via [`AllocatorId::next`].
/// Two distinct allocator instances always have different IDs, even if
/// they have identical configuration. A handle minted by one allocator
/// can therefore never be mistaken for a live block of another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocatorId(u64);

impl AllocatorId {
    /// Allocate a fresh, unique allocator ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(ALLOCATOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric identifier, for logging.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AllocatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of one node allocation.
///
/// Handles are `Copy` and never own the node they name. Equality is the
/// structural identity of the block: two handles are equal iff they were
/// returned by the same `allocate` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct BlockHandle {
    /// Allocator that minted this handle.
    allocator: AllocatorId,
    /// Slot index inside the allocator's slot table.
    index: u32,
    /// Slot generation at the time of allocation.
    generation: u32,
}

impl BlockHandle {
    /// Create a new handle.
    ///
    /// Only allocator implementations should mint handles; a handle built
    /// by hand is simply stale from the allocator's point of view.
    pub fn new(allocator: AllocatorId, index: u32, generation: u32) -> Self {
        Self {
            allocator,
            index,
            generation,
        }
    }

    /// The allocator that minted this handle.
    pub fn allocator(&self) -> AllocatorId {
        self.allocator
    }

    /// Slot index inside the allocator.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The slot generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockHandle(alloc={}, idx={}, gen={})",
            self.allocator, self.index, self.generation
        )
    }
}
