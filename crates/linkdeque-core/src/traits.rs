//! The allocator capability consumed by the deque.

use crate::error::AllocError;
use crate::id::{AllocatorId, BlockHandle};
use crate::metrics::AllocStats;

/// Provides storage for nodes of type `N`.
///
/// The deque depends on this contract only, never on a concrete
/// implementation. Any conforming implementation (heap-backed,
/// arena-backed, pool-backed) may be substituted without changing deque
/// behaviour.
///
/// # Contract
///
/// - [`allocate`](NodeAllocator::allocate) never returns an invalid block on
///   success. When the request cannot be satisfied it returns
///   [`AllocError::OutOfMemory`]; the error must reach the caller.
/// - [`deallocate`](NodeAllocator::deallocate) accepts only a live block
///   previously returned by `allocate` on the same instance. Passing any
///   other block is a precondition violation; conforming implementations
///   return `None` and leave their state unchanged.
/// - After a successful [`reserve(n)`](NodeAllocator::reserve), the next
///   `n` calls to `allocate` succeed.
/// - A block stays readable through [`get`](NodeAllocator::get) from its
///   allocation until its deallocation, and not a moment longer.
/// - After a successful [`absorb`](NodeAllocator::absorb), every block that
///   was live in the donor is live in the receiver under the same handle,
///   and the donor holds no blocks.
pub trait NodeAllocator<N> {
    /// Identity of this allocator instance.
    fn id(&self) -> AllocatorId;

    /// Store `node` in a fresh block.
    ///
    /// The requested size is `size_of::<N>()` bytes. On failure `node` is
    /// dropped and no block is created.
    fn allocate(&mut self, node: N) -> Result<BlockHandle, AllocError>;

    /// Release `block`, returning the node it held.
    ///
    /// Returns `None` if `block` is stale or was not minted here.
    fn deallocate(&mut self, block: BlockHandle) -> Option<N>;

    /// Borrow the node held by `block`.
    fn get(&self, block: BlockHandle) -> Option<&N>;

    /// Mutably borrow the node held by `block`.
    fn get_mut(&mut self, block: BlockHandle) -> Option<&mut N>;

    /// Guarantee room for `additional` more blocks.
    fn reserve(&mut self, additional: usize) -> Result<(), AllocError>;

    /// Number of blocks currently handed out.
    fn live_blocks(&self) -> usize;

    /// Snapshot of this allocator's counters.
    fn stats(&self) -> AllocStats;

    /// Take over every live block of `other` without moving any node.
    ///
    /// Handles minted by `other` stay valid and now resolve (and must be
    /// released) through `self`. `other` keeps its configuration but is
    /// left empty, under a new [`AllocatorId`]. On error neither allocator
    /// changes.
    fn absorb(&mut self, other: &mut Self) -> Result<(), AllocError>
    where
        Self: Sized;

    /// A fresh, empty allocator with the same configuration.
    ///
    /// The new instance has its own [`AllocatorId`].
    fn empty_like(&self) -> Self
    where
        Self: Sized;
}
