//! Borrowing and owning iterators.

use std::fmt;
use std::iter::FusedIterator;

use linkdeque_arena::HeapAllocator;
use linkdeque_core::{BlockHandle, NodeAllocator};

use crate::deque::Deque;
use crate::node::Node;

/// Borrowing iterator over `&T`, front to back. Double-ended.
///
/// Created by [`Deque::iter`].
pub struct Iter<'a, T, A: NodeAllocator<Node<T>> = HeapAllocator<Node<T>>> {
    deque: &'a Deque<T, A>,
    front: Option<BlockHandle>,
    back: Option<BlockHandle>,
    remaining: usize,
}

impl<'a, T, A: NodeAllocator<Node<T>>> Iter<'a, T, A> {
    pub(crate) fn new(deque: &'a Deque<T, A>) -> Self {
        Self {
            deque,
            front: deque.head_block(),
            back: deque.tail_block(),
            remaining: deque.len(),
        }
    }
}

impl<'a, T, A: NodeAllocator<Node<T>>> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let deque: &'a Deque<T, A> = self.deque;
        let node = deque.node(self.front?).ok()?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, A: NodeAllocator<Node<T>>> DoubleEndedIterator for Iter<'a, T, A> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let deque: &'a Deque<T, A> = self.deque;
        let node = deque.node(self.back?).ok()?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T, A: NodeAllocator<Node<T>>> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: NodeAllocator<Node<T>>> FusedIterator for Iter<'_, T, A> {}

impl<T, A: NodeAllocator<Node<T>>> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            deque: self.deque,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, A: NodeAllocator<Node<T>>> fmt::Debug for Iter<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator; pops from the front (or back).
///
/// Created by [`Deque::into_iter`]. Elements not consumed are dropped with
/// the iterator.
pub struct IntoIter<T, A: NodeAllocator<Node<T>> = HeapAllocator<Node<T>>> {
    deque: Deque<T, A>,
}

impl<T, A: NodeAllocator<Node<T>>> IntoIter<T, A> {
    pub(crate) fn new(deque: Deque<T, A>) -> Self {
        Self { deque }
    }
}

impl<T, A: NodeAllocator<Node<T>>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.deque.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len(), Some(self.deque.len()))
    }
}

impl<T, A: NodeAllocator<Node<T>>> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back().ok()
    }
}

impl<T, A: NodeAllocator<Node<T>>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: NodeAllocator<Node<T>>> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: NodeAllocator<Node<T>>> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.deque).finish()
    }
}
