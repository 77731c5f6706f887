//! The linked record stored in each allocator block.

use linkdeque_core::BlockHandle;

/// One element plus its two structural links.
///
/// A node owns its value; the links are plain handles and own nothing.
/// Nodes are created and destroyed only by [`Deque`](crate::Deque), which
/// keeps the links symmetric: if `a.next == Some(b)` then
/// `b.prev == Some(a)`.
#[derive(Debug)]
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Option<BlockHandle>,
    pub(crate) next: Option<BlockHandle>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, prev: Option<BlockHandle>, next: Option<BlockHandle>) -> Self {
        Self { value, prev, next }
    }

    /// The stored element.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Handle of the previous node, or `None` at the head.
    pub fn prev(&self) -> Option<BlockHandle> {
        self.prev
    }

    /// Handle of the next node, or `None` at the tail.
    pub fn next(&self) -> Option<BlockHandle> {
        self.next
    }
}
