//! Primary slab plus slabs adopted from other allocators.
//!
//! New blocks always go into the primary [`Slab`]. Adopted slabs keep
//! their own [`AllocatorId`], so every handle minted before the adoption
//! still resolves unchanged: a lookup is routed by the handle's allocator
//! id. An adopted slab is dropped as soon as its last block is released.

use std::collections::TryReserveError;
use std::mem;

use linkdeque_core::{AllocatorId, BlockHandle};

use crate::slab::Slab;

/// Segment list of generational slabs.
#[derive(Debug)]
pub struct Segments<N> {
    primary: Slab<N>,
    /// Non-empty slabs taken over from other allocators.
    adopted: Vec<Slab<N>>,
}

impl<N> Segments<N> {
    /// Create a list holding one fresh, empty primary slab.
    pub fn new() -> Self {
        Self {
            primary: Slab::new(),
            adopted: Vec::new(),
        }
    }

    /// Identity of the primary slab, which is the allocator's identity.
    pub fn id(&self) -> AllocatorId {
        self.primary.id()
    }

    /// The slab new blocks are inserted into.
    pub fn primary(&self) -> &Slab<N> {
        &self.primary
    }

    /// Mutable access to the primary slab, for reservation.
    pub fn primary_mut(&mut self) -> &mut Slab<N> {
        &mut self.primary
    }

    /// Number of adopted slabs still holding blocks.
    pub fn adopted_segments(&self) -> usize {
        self.adopted.len()
    }

    /// Occupied slots across all segments.
    pub fn len(&self) -> usize {
        self.primary.len() + self.adopted.iter().map(Slab::len).sum::<usize>()
    }

    /// Whether no segment holds a block.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.adopted.is_empty()
    }

    /// Store `node` in the primary slab.
    pub fn insert(&mut self, node: N) -> Option<BlockHandle> {
        self.primary.insert(node)
    }

    /// Vacate the slot named by `block` in whichever segment minted it.
    pub fn remove(&mut self, block: BlockHandle) -> Option<N> {
        if block.allocator() == self.primary.id() {
            return self.primary.remove(block);
        }
        let index = self
            .adopted
            .iter()
            .position(|slab| slab.id() == block.allocator())?;
        let node = self.adopted[index].remove(block)?;
        if self.adopted[index].is_empty() {
            self.adopted.swap_remove(index);
        }
        Some(node)
    }

    /// Borrow the node named by `block`.
    pub fn get(&self, block: BlockHandle) -> Option<&N> {
        self.segment(block.allocator())?.get(block)
    }

    /// Mutably borrow the node named by `block`.
    pub fn get_mut(&mut self, block: BlockHandle) -> Option<&mut N> {
        if block.allocator() == self.primary.id() {
            return self.primary.get_mut(block);
        }
        self.adopted
            .iter_mut()
            .find(|slab| slab.id() == block.allocator())?
            .get_mut(block)
    }

    /// Take over every block of `other`, returning how many moved.
    ///
    /// No node is moved or copied and no handle changes. `other` is left
    /// with a fresh, empty primary slab and a new identity. On error both
    /// lists are unchanged.
    pub fn try_adopt(&mut self, other: &mut Segments<N>) -> Result<usize, TryReserveError> {
        let incoming = usize::from(!other.primary.is_empty()) + other.adopted.len();
        self.adopted.try_reserve(incoming)?;

        let moved = other.len();
        let primary = mem::take(&mut other.primary);
        if !primary.is_empty() {
            self.adopted.push(primary);
        }
        self.adopted.append(&mut other.adopted);
        Ok(moved)
    }

    fn segment(&self, id: AllocatorId) -> Option<&Slab<N>> {
        if id == self.primary.id() {
            return Some(&self.primary);
        }
        self.adopted.iter().find(|slab| slab.id() == id)
    }
}

impl<N> Default for Segments<N> {
    fn default() -> Self {
        Self::new()
    }
}
