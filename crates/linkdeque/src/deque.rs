//! The deque core: node ownership, push/pop at both ends, bulk operations.
//!
//! [`Deque`] owns its allocator and, through it, every node of its chain.
//! Nodes are created only by the push paths and destroyed only by the pop
//! paths; [`Deque::clear`] and `Drop` are built on the pop path, so every
//! block goes back to the allocator on every exit, including unwinding.
//!
//! Push is atomic with respect to allocation failure: the node is
//! allocated before any link is touched. The copying bulk operations
//! (`extend_cloned`, `try_clone_from`) reserve their full node count up
//! front so that they either complete or leave both operands untouched.
//! `append` allocates no node at all: it adopts the other deque's blocks
//! and relinks the two chains.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use log::{debug, warn};

use linkdeque_arena::HeapAllocator;
use linkdeque_core::{BlockHandle, DequeError, NodeAllocator};

use crate::iter::{IntoIter, Iter};
use crate::node::Node;

/// A double-ended queue over a doubly-linked chain of allocator blocks.
///
/// # Invariants
///
/// - `head.is_none() == tail.is_none() == (len == 0)`.
/// - With one element, `head == tail`.
/// - The head has no `prev`, the tail has no `next`.
/// - `len` equals the number of nodes reachable from `head`.
pub struct Deque<T, A: NodeAllocator<Node<T>> = HeapAllocator<Node<T>>> {
    head: Option<BlockHandle>,
    tail: Option<BlockHandle>,
    len: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T> Deque<T> {
    /// Create an empty heap-backed deque. Nothing is allocated until the
    /// first push.
    pub fn new() -> Self {
        Self::new_in(HeapAllocator::new())
    }

    /// Build a heap-backed deque from an ordered sequence.
    pub fn try_from_iter<I: IntoIterator<Item = T>>(iter: I) -> Result<Self, DequeError> {
        Self::try_from_iter_in(iter, HeapAllocator::new())
    }
}

impl<T, A: NodeAllocator<Node<T>>> Deque<T, A> {
    /// Create an empty deque that takes its nodes from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Build a deque from an ordered sequence, allocating from `alloc`.
    pub fn try_from_iter_in<I: IntoIterator<Item = T>>(
        iter: I,
        alloc: A,
    ) -> Result<Self, DequeError> {
        let mut deque = Self::new_in(alloc);
        deque.try_extend(iter)?;
        Ok(deque)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the deque holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The allocator that owns this deque's nodes.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub(crate) fn head_block(&self) -> Option<BlockHandle> {
        self.head
    }

    pub(crate) fn tail_block(&self) -> Option<BlockHandle> {
        self.tail
    }

    pub(crate) fn node(&self, block: BlockHandle) -> Result<&Node<T>, DequeError> {
        self.alloc
            .get(block)
            .ok_or(DequeError::DanglingLink { block })
    }

    pub(crate) fn node_mut(&mut self, block: BlockHandle) -> Result<&mut Node<T>, DequeError> {
        self.alloc
            .get_mut(block)
            .ok_or(DequeError::DanglingLink { block })
    }

    /// Insert `value` before the first element.
    ///
    /// On allocation failure the deque is left exactly as it was and
    /// `value` is dropped.
    pub fn push_front(&mut self, value: T) -> Result<(), DequeError> {
        let block = self.alloc.allocate(Node::new(value, None, self.head))?;
        match self.head {
            Some(old_head) => self.node_mut(old_head)?.prev = Some(block),
            None => self.tail = Some(block),
        }
        self.head = Some(block);
        self.len += 1;
        Ok(())
    }

    /// Insert `value` after the last element.
    ///
    /// On allocation failure the deque is left exactly as it was and
    /// `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), DequeError> {
        let block = self.alloc.allocate(Node::new(value, self.tail, None))?;
        match self.tail {
            Some(old_tail) => self.node_mut(old_tail)?.next = Some(block),
            None => self.head = Some(block),
        }
        self.tail = Some(block);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the first element.
    ///
    /// Returns `Err(DequeError::Empty)` without side effects if the deque
    /// is empty.
    pub fn pop_front(&mut self) -> Result<T, DequeError> {
        let head = self.head.ok_or(DequeError::Empty)?;
        let node = self
            .alloc
            .deallocate(head)
            .ok_or(DequeError::DanglingLink { block: head })?;
        self.len -= 1;
        self.head = node.next;
        match node.next {
            Some(new_head) => self.node_mut(new_head)?.prev = None,
            None => self.tail = None,
        }
        Ok(node.value)
    }

    /// Remove and return the last element.
    ///
    /// Returns `Err(DequeError::Empty)` without side effects if the deque
    /// is empty.
    pub fn pop_back(&mut self) -> Result<T, DequeError> {
        let tail = self.tail.ok_or(DequeError::Empty)?;
        let node = self
            .alloc
            .deallocate(tail)
            .ok_or(DequeError::DanglingLink { block: tail })?;
        self.len -= 1;
        self.tail = node.prev;
        match node.prev {
            Some(new_tail) => self.node_mut(new_tail)?.next = None,
            None => self.head = None,
        }
        Ok(node.value)
    }

    /// The first element.
    pub fn front(&self) -> Result<&T, DequeError> {
        let head = self.head.ok_or(DequeError::Empty)?;
        Ok(&self.node(head)?.value)
    }

    /// The last element.
    pub fn back(&self) -> Result<&T, DequeError> {
        let tail = self.tail.ok_or(DequeError::Empty)?;
        Ok(&self.node(tail)?.value)
    }

    /// The first element, for in-place mutation.
    pub fn front_mut(&mut self) -> Result<&mut T, DequeError> {
        let head = self.head.ok_or(DequeError::Empty)?;
        Ok(&mut self.node_mut(head)?.value)
    }

    /// The last element, for in-place mutation.
    pub fn back_mut(&mut self) -> Result<&mut T, DequeError> {
        let tail = self.tail.ok_or(DequeError::Empty)?;
        Ok(&mut self.node_mut(tail)?.value)
    }

    /// Remove every element, back to front.
    ///
    /// Calling this on an empty deque does nothing.
    pub fn clear(&mut self) {
        while !self.is_empty() {
            if let Err(err) = self.pop_back() {
                // The allocator lost part of the chain; whatever it still
                // holds is released when the allocator itself drops.
                warn!("clear abandoned {} nodes: {err}", self.len);
                self.head = None;
                self.tail = None;
                self.len = 0;
            }
        }
    }

    /// Move every element out, leaving `self` empty.
    ///
    /// The returned deque keeps this deque's allocator and nodes; `self`
    /// continues with a fresh [`empty_like`](NodeAllocator::empty_like)
    /// allocator. O(1).
    pub fn take(&mut self) -> Self {
        let empty = Self::new_in(self.alloc.empty_like());
        mem::replace(self, empty)
    }

    /// Move all elements of `other` to the back of `self`, leaving `other`
    /// empty.
    ///
    /// No node is allocated, moved, or copied. If `self` is empty the two
    /// deques exchange their storage wholesale (allocators included).
    /// Otherwise this deque's allocator [absorbs](NodeAllocator::absorb)
    /// `other`'s blocks and `other`'s chain is linked after the tail, so a
    /// full bounded allocator can still take part. Positions saved from
    /// `other` stay valid and now belong to `self`. On error neither deque
    /// changes.
    pub fn append(&mut self, other: &mut Self) -> Result<(), DequeError> {
        if other.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            mem::swap(self, other);
            return Ok(());
        }

        let donor = other.alloc.id();
        self.alloc.absorb(&mut other.alloc)?;
        let head = other.head.take();
        let tail = other.tail.take();
        let moved = mem::take(&mut other.len);
        debug!(
            "append: relinked {moved} nodes from allocator {donor} into {}",
            self.alloc.id()
        );

        if let Some(old_tail) = self.tail {
            self.node_mut(old_tail)?.next = head;
        }
        if let Some(first) = head {
            self.node_mut(first)?.prev = self.tail;
        }
        self.tail = tail;
        self.len += moved;
        Ok(())
    }

    /// Append clones of every element of `other`, which is left untouched.
    ///
    /// Room for `other.len()` nodes is reserved first, so on allocation
    /// failure `self` is unchanged.
    pub fn extend_cloned(&mut self, other: &Self) -> Result<(), DequeError>
    where
        T: Clone,
    {
        self.alloc.reserve(other.len)?;
        for value in other.iter() {
            self.push_back(value.clone())?;
        }
        Ok(())
    }

    /// Push every item of `iter` at the back, in order.
    ///
    /// If the iterator's lower size bound already exceeds what the
    /// allocator can provide, nothing is pushed. A failure later on leaves
    /// the items pushed so far in place.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), DequeError> {
        let iter = iter.into_iter();
        self.alloc.reserve(iter.size_hint().0)?;
        for value in iter {
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Deep copy into a fresh allocator of the same kind.
    pub fn try_clone(&self) -> Result<Self, DequeError>
    where
        T: Clone,
    {
        let mut copy = Self::new_in(self.alloc.empty_like());
        copy.extend_cloned(self)?;
        Ok(copy)
    }

    /// Replace the contents of `self` with clones of `source`.
    ///
    /// The extra room needed is reserved before anything is cleared, so on
    /// allocation failure `self` keeps its old contents.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), DequeError>
    where
        T: Clone,
    {
        self.alloc.reserve(source.len.saturating_sub(self.len))?;
        self.clear();
        for value in source.iter() {
            self.push_back(value.clone())?;
        }
        Ok(())
    }

    /// Visit every element front to back with mutable access.
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, mut f: F) {
        let mut cursor = self.head;
        while let Some(block) = cursor {
            let Some(node) = self.alloc.get_mut(block) else {
                break;
            };
            f(&mut node.value);
            cursor = node.next;
        }
    }

    /// Iterate over the elements front to back.
    ///
    /// The iterator is double-ended; `iter().rev()` walks back to front.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(self)
    }
}

impl<T, A: NodeAllocator<Node<T>>> Drop for Deque<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: NodeAllocator<Node<T>> + Default> Default for Deque<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

/// # Panics
///
/// Panics if the allocator cannot provide the nodes. Use
/// [`Deque::try_clone`] to handle that case.
impl<T: Clone, A: NodeAllocator<Node<T>>> Clone for Deque<T, A> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("deque clone failed: {err}"),
        }
    }
}

/// # Panics
///
/// Panics if the heap cannot grow. Use [`Deque::try_from_iter`] to handle
/// that case.
impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        match Self::try_from_iter(iter) {
            Ok(deque) => deque,
            Err(err) => panic!("deque collect failed: {err}"),
        }
    }
}

/// # Panics
///
/// Panics if the heap cannot grow. Use [`Deque::try_extend`] to handle
/// that case.
impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            panic!("deque extend failed: {err}");
        }
    }
}

impl<T, A: NodeAllocator<Node<T>>> IntoIterator for Deque<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: NodeAllocator<Node<T>>> IntoIterator for &'a Deque<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, A, B> PartialEq<Deque<T, B>> for Deque<T, A>
where
    T: PartialEq,
    A: NodeAllocator<Node<T>>,
    B: NodeAllocator<Node<T>>,
{
    fn eq(&self, other: &Deque<T, B>) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: NodeAllocator<Node<T>>> Eq for Deque<T, A> {}

impl<T: fmt::Debug, A: NodeAllocator<Node<T>>> fmt::Debug for Deque<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders the elements front to back, separated by single spaces.
impl<T: fmt::Display, A: NodeAllocator<Node<T>>> fmt::Display for Deque<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkdeque_arena::{ArenaAllocator, ArenaConfig};
    use linkdeque_core::{AllocError, Direction};
    use linkdeque_test_utils::{DropCounter, FailingAllocator, TrackingAllocator};

    fn deque_of(values: &[i32]) -> Deque<i32> {
        values.iter().copied().collect()
    }

    fn contents<A: NodeAllocator<Node<i32>>>(deque: &Deque<i32, A>) -> Vec<i32> {
        deque.iter().copied().collect()
    }

    /// Walk the chain by hand and check every structural invariant.
    fn assert_invariants<T, A: NodeAllocator<Node<T>>>(deque: &Deque<T, A>) {
        assert_eq!(deque.head.is_none(), deque.tail.is_none());
        assert_eq!(deque.head.is_none(), deque.len == 0);
        if deque.len == 1 {
            assert_eq!(deque.head, deque.tail);
        }
        let mut count = 0;
        let mut prev = None;
        let mut cursor = deque.head;
        while let Some(block) = cursor {
            let node = deque.node(block).unwrap();
            assert_eq!(node.prev, prev, "link symmetry broken at {block}");
            prev = Some(block);
            cursor = node.next;
            count += 1;
        }
        assert_eq!(prev, deque.tail);
        assert_eq!(count, deque.len);
        assert_eq!(deque.allocator().live_blocks(), deque.len);
    }

    #[test]
    fn push_back_three_then_pop_front() {
        let mut d = Deque::new();
        d.push_back(1).unwrap();
        d.push_back(2).unwrap();
        d.push_back(3).unwrap();
        assert_eq!(contents(&d), vec![1, 2, 3]);
        assert_eq!(d.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);

        assert_eq!(d.pop_front(), Ok(1));
        assert_eq!(d.front(), Ok(&2));
        assert_eq!(d.len(), 2);
        assert_invariants(&d);
    }

    #[test]
    fn push_front_prepends() {
        let mut d = Deque::new();
        for i in 0..4 {
            d.push_front(i).unwrap();
        }
        assert_eq!(contents(&d), vec![3, 2, 1, 0]);
        assert_eq!(d.back(), Ok(&0));
        assert_invariants(&d);
    }

    #[test]
    fn empty_deque_signals_empty_everywhere() {
        let mut d: Deque<i32> = Deque::new();
        assert_eq!(d.pop_front(), Err(DequeError::Empty));
        assert_eq!(d.pop_back(), Err(DequeError::Empty));
        assert_eq!(d.front(), Err(DequeError::Empty));
        assert_eq!(d.back(), Err(DequeError::Empty));
        assert_eq!(d.front_mut(), Err(DequeError::Empty));
        assert_eq!(d.back_mut(), Err(DequeError::Empty));
        assert_eq!(d.len(), 0);
        assert!(d.is_empty());
        assert_invariants(&d);
    }

    #[test]
    fn single_element_is_both_ends() {
        let mut d = deque_of(&[7]);
        assert_eq!(d.head, d.tail);
        assert_eq!(d.pop_back(), Ok(7));
        assert!(d.is_empty());
        assert_invariants(&d);
    }

    #[test]
    fn round_trip_push_back_pop_front() {
        let mut d = deque_of(&[1, 2]);
        d.push_back(9).unwrap();
        assert_eq!(d.pop_front(), Ok(1));
        assert_eq!(d.len(), 2);

        let mut one = deque_of(&[5]);
        one.push_front(4).unwrap();
        assert_eq!(one.pop_back(), Ok(5));
        assert_eq!(contents(&one), vec![4]);
    }

    #[test]
    fn front_and_back_mutate_in_place() {
        let mut d = deque_of(&[1, 2, 3]);
        *d.front_mut().unwrap() = 10;
        *d.back_mut().unwrap() += 30;
        assert_eq!(contents(&d), vec![10, 2, 33]);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut d = deque_of(&[1, 2, 3]);
        d.clear();
        assert!(d.is_empty());
        d.clear();
        assert!(d.is_empty());
        assert_eq!(d.allocator().live_blocks(), 0);
        assert_invariants(&d);
    }

    #[test]
    fn append_transfers_and_empties_source() {
        let mut a = deque_of(&[1, 2]);
        let mut b = deque_of(&[3, 4]);
        a.append(&mut b).unwrap();
        assert_eq!(contents(&a), vec![1, 2, 3, 4]);
        assert!(b.is_empty());
        assert_eq!(b.allocator().live_blocks(), 0);
        assert_invariants(&a);
        assert_invariants(&b);
    }

    #[test]
    fn append_into_empty_swaps_storage() {
        let mut a: Deque<i32> = Deque::new();
        let mut b = deque_of(&[3, 4]);
        let b_alloc = b.allocator().id();
        a.append(&mut b).unwrap();
        assert_eq!(contents(&a), vec![3, 4]);
        assert_eq!(a.allocator().id(), b_alloc, "nodes moved without reallocation");
        assert_eq!(a.allocator().stats().total_allocations, 2);
        assert!(b.is_empty());
    }

    #[test]
    fn append_empty_other_is_noop() {
        let mut a = deque_of(&[1]);
        let mut b: Deque<i32> = Deque::new();
        a.append(&mut b).unwrap();
        assert_eq!(contents(&a), vec![1]);
    }

    #[test]
    fn extend_cloned_leaves_source_untouched() {
        let mut a = deque_of(&[1, 2]);
        let b = deque_of(&[3, 4]);
        a.extend_cloned(&b).unwrap();
        assert_eq!(contents(&a), vec![1, 2, 3, 4]);
        assert_eq!(contents(&b), vec![3, 4]);
    }

    #[test]
    fn clone_is_isolated() {
        let original = deque_of(&[1, 2, 3]);
        let mut copy = original.clone();
        copy.push_back(4).unwrap();
        *copy.front_mut().unwrap() = 100;
        assert_eq!(contents(&original), vec![1, 2, 3]);
        assert_eq!(contents(&copy), vec![100, 2, 3, 4]);
        assert_ne!(original.allocator().id(), copy.allocator().id());
    }

    #[test]
    fn take_leaves_valid_empty_source() {
        let mut src = deque_of(&[1, 2, 3]);
        let src_alloc = src.allocator().id();
        let moved = src.take();
        assert_eq!(contents(&moved), vec![1, 2, 3]);
        assert_eq!(moved.allocator().id(), src_alloc);
        assert!(src.is_empty());
        assert_eq!(src.len(), 0);
        // The source stays usable.
        src.push_back(9).unwrap();
        assert_eq!(contents(&src), vec![9]);
    }

    #[test]
    fn move_assignment_drops_old_contents() {
        let counter = DropCounter::new();
        let mut a = Deque::new();
        a.push_back(counter.make(1)).unwrap();
        a.push_back(counter.make(2)).unwrap();
        let mut b = Deque::new();
        b.push_back(counter.make(3)).unwrap();

        a = b.take();
        assert_eq!(counter.count(), 2);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn try_clone_from_replaces_contents() {
        let mut dst = deque_of(&[9, 9, 9, 9]);
        let src = deque_of(&[1, 2]);
        dst.try_clone_from(&src).unwrap();
        assert_eq!(contents(&dst), vec![1, 2]);
        assert_eq!(contents(&src), vec![1, 2]);
        assert_invariants(&dst);
    }

    #[test]
    fn drop_runs_every_destructor_once() {
        let counter = DropCounter::new();
        {
            let mut d = Deque::new();
            for i in 0..10 {
                d.push_back(counter.make(i)).unwrap();
            }
            let popped = d.pop_front().unwrap();
            drop(popped);
            assert_eq!(counter.count(), 1);
        }
        assert_eq!(counter.count(), 10);
    }

    #[test]
    fn drop_returns_every_block() {
        let (alloc, ledger) = TrackingAllocator::new();
        {
            let mut d = Deque::new_in(alloc);
            for i in 0..5 {
                d.push_back(i).unwrap();
            }
            d.pop_back().unwrap();
        }
        assert_eq!(ledger.live(), 0);
        assert_eq!(ledger.allocations(), 5);
        assert_eq!(ledger.rejected(), 0);
    }

    #[test]
    fn failed_push_leaves_deque_unchanged() {
        let (alloc, switch) = FailingAllocator::new();
        let mut d = Deque::new_in(alloc);
        d.push_back(1).unwrap();
        d.push_back(2).unwrap();

        switch.fail_after(0);
        let err = d.push_back(3).unwrap_err();
        assert!(matches!(err, DequeError::Alloc(AllocError::OutOfMemory { .. })));
        assert!(d.push_front(0).is_err());
        assert_eq!(contents(&d), vec![1, 2]);
        assert_invariants(&d);

        switch.disarm();
        d.push_back(3).unwrap();
        assert_eq!(contents(&d), vec![1, 2, 3]);
    }

    #[test]
    fn append_succeeds_with_no_allocation_budget_left() {
        let (alloc, switch) = FailingAllocator::new();
        let mut a = Deque::try_from_iter_in([1, 2], alloc).unwrap();
        let mut b = Deque::new_in(a.allocator().empty_like());
        b.try_extend([3, 4, 5]).unwrap();

        // `b` shares the switch through empty_like; arm it after both are built.
        switch.fail_after(0);
        a.append(&mut b).unwrap();
        assert_eq!(contents(&a), vec![1, 2, 3, 4, 5]);
        assert!(b.is_empty());
        assert_eq!(a.allocator().stats().failed_allocations, 0);
        assert_invariants(&a);
        assert_invariants(&b);
    }

    #[test]
    fn append_relinks_without_allocating() {
        let (alloc, ledger) = TrackingAllocator::new();
        let mut a = Deque::try_from_iter_in([1, 2], alloc).unwrap();
        let mut b = Deque::new_in(a.allocator().empty_like());
        b.try_extend([3, 4]).unwrap();
        let third = b.begin().position();
        assert_eq!(ledger.allocations(), 4);

        a.append(&mut b).unwrap();
        assert_eq!(ledger.allocations(), 4);
        assert_eq!(ledger.deallocations(), 0);
        assert_eq!(contents(&a), vec![1, 2, 3, 4]);
        assert_eq!(a.iter().rev().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
        assert_invariants(&a);
        assert_invariants(&b);

        // The node kept its block, so a position saved in `b` now walks `a`.
        let mut cursor = a.cursor_at(third, Direction::Forward).unwrap();
        assert_eq!(cursor.get(), Ok(&3));
        cursor.retreat().unwrap();
        assert_eq!(cursor.get(), Ok(&2));
        assert!(b.cursor_at(third, Direction::Forward).is_err());
    }

    #[test]
    fn append_between_full_arenas() {
        let mut a = Deque::try_from_iter_in([1, 2], ArenaAllocator::with_nodes(2).unwrap()).unwrap();
        let mut b = Deque::try_from_iter_in([3, 4], ArenaAllocator::with_nodes(2).unwrap()).unwrap();

        a.append(&mut b).unwrap();
        assert_eq!(contents(&a), vec![1, 2, 3, 4]);
        assert_invariants(&a);
        assert_eq!(a.allocator().stats().failed_allocations, 0);

        // The emptied source gets its budget back.
        b.try_extend([5, 6]).unwrap();
        assert_eq!(contents(&b), vec![5, 6]);

        // Releasing adopted nodes never frees budget for the receiver.
        a.pop_back().unwrap();
        a.pop_back().unwrap();
        assert!(a.push_back(9).is_err());
        a.pop_front().unwrap();
        a.push_back(9).unwrap();
        assert_eq!(contents(&a), vec![2, 9]);
        assert_invariants(&a);
    }

    #[test]
    fn append_chains_repeatedly() {
        let mut acc = deque_of(&[0]);
        for i in 1..6 {
            let mut next = deque_of(&[i * 10, i * 10 + 1]);
            acc.append(&mut next).unwrap();
            assert!(next.is_empty());
        }
        assert_eq!(contents(&acc), vec![0, 10, 11, 20, 21, 30, 31, 40, 41, 50, 51]);
        assert_invariants(&acc);
        while acc.len() > 1 {
            acc.pop_back().unwrap();
            assert_invariants(&acc);
        }
        assert_eq!(acc.allocator().live_blocks(), 1);
    }

    #[test]
    fn deque_is_covariant_in_element() {
        fn shorten<'a>(d: Deque<&'static str>) -> Deque<&'a str> {
            d
        }
        let long: Deque<&'static str> = ["a", "b"].into_iter().collect();
        let short = shorten(long);
        assert_eq!(short.to_string(), "a b");
    }

    #[test]
    fn failed_clone_from_keeps_old_contents() {
        let arena = ArenaAllocator::new(ArenaConfig::for_nodes::<Node<i32>>(2)).unwrap();
        let mut dst = Deque::try_from_iter_in([7, 8], arena).unwrap();
        let src = Deque::try_from_iter_in([1, 2, 3], ArenaAllocator::with_nodes(3).unwrap()).unwrap();

        // Three nodes cannot fit a two-node arena.
        let err = dst.try_clone_from(&src).unwrap_err();
        assert!(matches!(err, DequeError::Alloc(AllocError::OutOfMemory { .. })));
        assert_eq!(contents(&dst), vec![7, 8]);

        let smaller = Deque::try_from_iter_in([1], ArenaAllocator::with_nodes(1).unwrap()).unwrap();
        dst.try_clone_from(&smaller).unwrap();
        assert_eq!(contents(&dst), vec![1]);
    }

    #[test]
    fn arena_backed_deque_reuses_slots() {
        let mut d = Deque::new_in(ArenaAllocator::with_nodes(4).unwrap());
        for round in 0..50 {
            for i in 0..4 {
                d.push_back(round * 10 + i).unwrap();
            }
            assert!(d.push_back(-1).is_err());
            d.clear();
        }
        assert_eq!(d.allocator().stats().peak_live_blocks, 4);
    }

    #[test]
    fn for_each_mut_visits_in_order() {
        let mut d = deque_of(&[1, 2, 3]);
        let mut seen = Vec::new();
        d.for_each_mut(|v| {
            seen.push(*v);
            *v *= 2;
        });
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(contents(&d), vec![2, 4, 6]);
    }

    #[test]
    fn display_is_space_separated() {
        assert_eq!(deque_of(&[1, 2, 3]).to_string(), "1 2 3");
        assert_eq!(deque_of(&[]).to_string(), "");
        assert_eq!(format!("{:?}", deque_of(&[1, 2])), "[1, 2]");
    }

    #[test]
    fn equality_compares_elements_across_allocators() {
        let heap = deque_of(&[1, 2, 3]);
        let arena = Deque::try_from_iter_in([1, 2, 3], ArenaAllocator::with_nodes(3).unwrap())
            .unwrap();
        assert!(heap == arena);
        assert_ne!(heap, deque_of(&[1, 2]));
    }

    #[test]
    fn into_iter_yields_owned_values_both_ways() {
        let d = deque_of(&[1, 2, 3, 4]);
        let mut it = d.into_iter();
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.len(), 2);
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::VecDeque;

        #[derive(Clone, Debug)]
        enum Op {
            PushFront(i32),
            PushBack(i32),
            PopFront,
            PopBack,
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => any::<i32>().prop_map(Op::PushFront),
                4 => any::<i32>().prop_map(Op::PushBack),
                3 => Just(Op::PopFront),
                3 => Just(Op::PopBack),
                1 => Just(Op::Clear),
            ]
        }

        proptest! {
            #[test]
            fn matches_vecdeque_model(ops in proptest::collection::vec(op(), 0..120)) {
                let mut d = Deque::new();
                let mut model = VecDeque::new();
                for op in ops {
                    match op {
                        Op::PushFront(v) => {
                            d.push_front(v).unwrap();
                            model.push_front(v);
                        }
                        Op::PushBack(v) => {
                            d.push_back(v).unwrap();
                            model.push_back(v);
                        }
                        Op::PopFront => {
                            prop_assert_eq!(d.pop_front().ok(), model.pop_front());
                        }
                        Op::PopBack => {
                            prop_assert_eq!(d.pop_back().ok(), model.pop_back());
                        }
                        Op::Clear => {
                            d.clear();
                            model.clear();
                        }
                    }
                    prop_assert_eq!(d.len(), model.len());
                    prop_assert_eq!(d.front().ok(), model.front());
                    prop_assert_eq!(d.back().ok(), model.back());
                }
                assert_invariants(&d);
                let forward: Vec<i32> = d.iter().copied().collect();
                prop_assert_eq!(&forward, &model.iter().copied().collect::<Vec<_>>());
                let mut backward: Vec<i32> = d.iter().rev().copied().collect();
                backward.reverse();
                prop_assert_eq!(forward, backward);
            }

            #[test]
            fn append_concatenates(
                left in proptest::collection::vec(any::<i16>(), 0..30),
                right in proptest::collection::vec(any::<i16>(), 0..30),
            ) {
                let mut a: Deque<i16> = left.iter().copied().collect();
                let mut b: Deque<i16> = right.iter().copied().collect();
                a.append(&mut b).unwrap();
                let expected: Vec<i16> = left.iter().chain(right.iter()).copied().collect();
                prop_assert_eq!(a.iter().copied().collect::<Vec<_>>(), expected);
                prop_assert!(b.is_empty());
                assert_invariants(&a);
            }
        }
    }
}
