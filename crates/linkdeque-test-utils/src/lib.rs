//! Test allocators and drop probes for linkdeque development.
//!
//! - [`FailingAllocator`] wraps any allocator and refuses requests once a
//!   shared budget runs out, to exercise the out-of-memory paths.
//! - [`TrackingAllocator`] records every block it hands out in a
//!   [`Ledger`] that outlives the deque, to prove nothing leaks.
//! - [`DropCounter`] mints [`Tracked`] values that count their own drops.
//!
//! All handles ([`FailSwitch`], [`Ledger`], [`DropCounter`]) are shared
//! through `Rc`, so a test keeps them after moving the allocator into a
//! deque. They are single-threaded by construction.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod drops;

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

use indexmap::IndexMap;

use linkdeque_arena::HeapAllocator;
use linkdeque_core::{AllocError, AllocStats, AllocatorId, BlockHandle, NodeAllocator};

pub use drops::{DropCounter, Tracked};

/// Shared allocation budget for [`FailingAllocator`].
///
/// Disarmed (unlimited) by default. Every allocator built from another
/// through `empty_like` draws on the same budget.
#[derive(Clone, Debug, Default)]
pub struct FailSwitch {
    budget: Rc<Cell<Option<usize>>>,
}

impl FailSwitch {
    /// Allow `successes` more allocations, then fail every request.
    pub fn fail_after(&self, successes: usize) {
        self.budget.set(Some(successes));
    }

    /// Remove the budget.
    pub fn disarm(&self) {
        self.budget.set(None);
    }

    /// Allocations left before failure, or `None` while disarmed.
    pub fn remaining(&self) -> Option<usize> {
        self.budget.get()
    }

    fn admits(&self, blocks: usize) -> bool {
        self.budget.get().is_none_or(|left| blocks <= left)
    }

    fn consume(&self) {
        if let Some(left) = self.budget.get() {
            self.budget.set(Some(left.saturating_sub(1)));
        }
    }
}

/// Allocator wrapper that fails on demand.
pub struct FailingAllocator<N, A: NodeAllocator<N> = HeapAllocator<N>> {
    inner: A,
    switch: FailSwitch,
    refused: u64,
    _node: PhantomData<fn(N) -> N>,
}

impl<N> FailingAllocator<N> {
    /// Wrap a fresh [`HeapAllocator`].
    pub fn new() -> (Self, FailSwitch) {
        Self::wrap(HeapAllocator::new())
    }
}

impl<N, A: NodeAllocator<N>> FailingAllocator<N, A> {
    /// Wrap `inner`, returning the switch that controls the budget.
    pub fn wrap(inner: A) -> (Self, FailSwitch) {
        let switch = FailSwitch::default();
        let alloc = Self {
            inner,
            switch: switch.clone(),
            refused: 0,
            _node: PhantomData,
        };
        (alloc, switch)
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn refuse(&mut self, blocks: usize) -> AllocError {
        self.refused += 1;
        AllocError::OutOfMemory {
            requested: blocks.saturating_mul(mem::size_of::<N>()),
            capacity: self.inner.stats().live_bytes(),
        }
    }
}

impl<N, A: NodeAllocator<N>> NodeAllocator<N> for FailingAllocator<N, A> {
    fn id(&self) -> AllocatorId {
        self.inner.id()
    }

    fn allocate(&mut self, node: N) -> Result<BlockHandle, AllocError> {
        if !self.switch.admits(1) {
            return Err(self.refuse(1));
        }
        let block = self.inner.allocate(node)?;
        self.switch.consume();
        Ok(block)
    }

    fn deallocate(&mut self, block: BlockHandle) -> Option<N> {
        self.inner.deallocate(block)
    }

    fn get(&self, block: BlockHandle) -> Option<&N> {
        self.inner.get(block)
    }

    fn get_mut(&mut self, block: BlockHandle) -> Option<&mut N> {
        self.inner.get_mut(block)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        if !self.switch.admits(additional) {
            return Err(self.refuse(additional));
        }
        self.inner.reserve(additional)
    }

    fn live_blocks(&self) -> usize {
        self.inner.live_blocks()
    }

    fn stats(&self) -> AllocStats {
        let mut stats = self.inner.stats();
        stats.failed_allocations += self.refused;
        stats
    }

    /// Adopting blocks allocates no node, so the switch is not consulted.
    fn absorb(&mut self, other: &mut Self) -> Result<(), AllocError> {
        self.inner.absorb(&mut other.inner)
    }

    fn empty_like(&self) -> Self {
        Self {
            inner: self.inner.empty_like(),
            switch: self.switch.clone(),
            refused: 0,
            _node: PhantomData,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Live blocks in allocation order, with their allocation sequence number.
    live: IndexMap<BlockHandle, u64>,
    next_seq: u64,
    deallocations: u64,
    rejected: u64,
}

/// Shared record of what a [`TrackingAllocator`] handed out.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    state: Rc<RefCell<LedgerState>>,
}

impl Ledger {
    /// Blocks allocated and not yet released.
    pub fn live(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> u64 {
        self.state.borrow().next_seq
    }

    /// Successful deallocations so far.
    pub fn deallocations(&self) -> u64 {
        self.state.borrow().deallocations
    }

    /// Deallocation requests the inner allocator refused.
    pub fn rejected(&self) -> u64 {
        self.state.borrow().rejected
    }

    /// Live blocks, oldest first.
    pub fn outstanding(&self) -> Vec<BlockHandle> {
        self.state.borrow().live.keys().copied().collect()
    }

    /// Whether `block` is currently live.
    pub fn is_live(&self, block: BlockHandle) -> bool {
        self.state.borrow().live.contains_key(&block)
    }

    /// Allocation sequence number of a live block.
    pub fn sequence_of(&self, block: BlockHandle) -> Option<u64> {
        self.state.borrow().live.get(&block).copied()
    }
}

/// Allocator wrapper that records every block in a [`Ledger`].
pub struct TrackingAllocator<N, A: NodeAllocator<N> = HeapAllocator<N>> {
    inner: A,
    ledger: Ledger,
    _node: PhantomData<fn(N) -> N>,
}

impl<N> TrackingAllocator<N> {
    /// Wrap a fresh [`HeapAllocator`].
    pub fn new() -> (Self, Ledger) {
        Self::wrap(HeapAllocator::new())
    }
}

impl<N, A: NodeAllocator<N>> TrackingAllocator<N, A> {
    /// Wrap `inner`, returning the ledger it writes to.
    pub fn wrap(inner: A) -> (Self, Ledger) {
        let ledger = Ledger::default();
        let alloc = Self {
            inner,
            ledger: ledger.clone(),
            _node: PhantomData,
        };
        (alloc, ledger)
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<N, A: NodeAllocator<N>> NodeAllocator<N> for TrackingAllocator<N, A> {
    fn id(&self) -> AllocatorId {
        self.inner.id()
    }

    fn allocate(&mut self, node: N) -> Result<BlockHandle, AllocError> {
        let block = self.inner.allocate(node)?;
        let mut state = self.ledger.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.live.insert(block, seq);
        Ok(block)
    }

    fn deallocate(&mut self, block: BlockHandle) -> Option<N> {
        let node = self.inner.deallocate(block);
        let mut state = self.ledger.state.borrow_mut();
        match node {
            Some(_) => {
                state.live.shift_remove(&block);
                state.deallocations += 1;
            }
            None => state.rejected += 1,
        }
        node
    }

    fn get(&self, block: BlockHandle) -> Option<&N> {
        self.inner.get(block)
    }

    fn get_mut(&mut self, block: BlockHandle) -> Option<&mut N> {
        self.inner.get_mut(block)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.inner.reserve(additional)
    }

    fn live_blocks(&self) -> usize {
        self.inner.live_blocks()
    }

    fn stats(&self) -> AllocStats {
        self.inner.stats()
    }

    /// Entries for the adopted blocks move to this ledger, keeping their
    /// sequence numbers, unless both sides already share one.
    fn absorb(&mut self, other: &mut Self) -> Result<(), AllocError> {
        self.inner.absorb(&mut other.inner)?;
        if Rc::ptr_eq(&self.ledger.state, &other.ledger.state) {
            return Ok(());
        }
        let mut theirs = other.ledger.state.borrow_mut();
        let adopted: Vec<_> = theirs
            .live
            .keys()
            .copied()
            .filter(|block| self.inner.get(*block).is_some())
            .collect();
        let mut mine = self.ledger.state.borrow_mut();
        for block in adopted {
            if let Some(seq) = theirs.live.shift_remove(&block) {
                mine.live.insert(block, seq);
            }
        }
        Ok(())
    }

    fn empty_like(&self) -> Self {
        Self {
            inner: self.inner.empty_like(),
            ledger: self.ledger.clone(),
            _node: PhantomData,
        }
    }
}
