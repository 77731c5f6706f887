//! Generation-stamped slot table shared by the allocators.
//!
//! A [`Slab`] stores nodes inline in a `Vec` of slots. Each slot carries a
//! generation counter that is bumped whenever the slot is vacated, so a
//! [`BlockHandle`] minted before the vacate no longer resolves. Vacated
//! slots go on a LIFO free list and are reused before the table grows.

use std::collections::TryReserveError;

use linkdeque_core::{AllocatorId, BlockHandle};

/// A single slot: its current generation and, if occupied, the node.
#[derive(Debug)]
pub(crate) struct Slot<N> {
    generation: u32,
    node: Option<N>,
}

/// Slot table with generational handles.
///
/// The slab enforces no capacity limit of its own; the allocators wrapping
/// it decide when to refuse an insert. [`Slab::insert`] only fails when the
/// slot index would no longer fit in a `u32`.
#[derive(Debug)]
pub struct Slab<N> {
    /// Identity stamped into every handle minted here.
    id: AllocatorId,
    /// All slots ever created (occupied and vacant).
    slots: Vec<Slot<N>>,
    /// Indices of vacant slots, most recently vacated last.
    free_list: Vec<u32>,
    /// Number of occupied slots.
    live: usize,
}

impl<N> Slab<N> {
    /// Create an empty slab with a fresh [`AllocatorId`].
    pub fn new() -> Self {
        Self {
            id: AllocatorId::next(),
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// The identity stamped into this slab's handles.
    pub fn id(&self) -> AllocatorId {
        self.id
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots created so far (occupied + vacant).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of vacant slots waiting on the free list.
    pub fn vacant(&self) -> usize {
        self.free_list.len()
    }

    /// Slots the backing `Vec` can hold without reallocating.
    pub fn storage_capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Make room so that `additional` inserts will not reallocate.
    ///
    /// Vacant slots count towards the request; only the remainder is
    /// reserved in the backing `Vec`.
    pub fn try_reserve_blocks(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = additional.saturating_sub(self.free_list.len());
        self.slots.try_reserve(needed)?;
        // Vacating pushes onto the free list; never let that reallocate
        // mid-operation either.
        self.free_list.try_reserve(self.slots.capacity() - self.free_list.len())
    }

    /// Grow the backing storage by exactly `additional` slots beyond the
    /// current slot count.
    pub fn try_reserve_exact_slots(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.slots.try_reserve_exact(additional)?;
        self.free_list
            .try_reserve_exact(self.slots.capacity() - self.free_list.len())
    }

    /// Store `node`, reusing a vacant slot if one exists.
    ///
    /// Returns `None` (dropping `node`) only if the table already holds
    /// `u32::MAX` slots and none is vacant.
    pub fn insert(&mut self, node: N) -> Option<BlockHandle> {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.node.is_none(), "free list holds an occupied slot");
            slot.node = Some(node);
            self.live += 1;
            return Some(BlockHandle::new(self.id, index, slot.generation));
        }

        let index = u32::try_from(self.slots.len()).ok()?;
        if index == u32::MAX {
            return None;
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.live += 1;
        Some(BlockHandle::new(self.id, index, 0))
    }

    /// Vacate the slot named by `block`, returning its node.
    ///
    /// Returns `None` without touching the table if `block` is stale or
    /// belongs to another slab.
    pub fn remove(&mut self, block: BlockHandle) -> Option<N> {
        let index = self.resolve(block)?;
        let slot = &mut self.slots[index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(block.index());
        self.live -= 1;
        Some(node)
    }

    /// Borrow the node named by `block`.
    pub fn get(&self, block: BlockHandle) -> Option<&N> {
        let index = self.resolve(block)?;
        self.slots[index].node.as_ref()
    }

    /// Mutably borrow the node named by `block`.
    pub fn get_mut(&mut self, block: BlockHandle) -> Option<&mut N> {
        let index = self.resolve(block)?;
        self.slots[index].node.as_mut()
    }

    /// Whether `block` names an occupied slot of this slab.
    pub fn contains(&self, block: BlockHandle) -> bool {
        self.get(block).is_some()
    }

    /// Map a handle to a slot index if identity and generation match.
    fn resolve(&self, block: BlockHandle) -> Option<usize> {
        if block.allocator() != self.id {
            return None;
        }
        let index = block.index() as usize;
        let slot = self.slots.get(index)?;
        if slot.generation != block.generation() || slot.node.is_none() {
            return None;
        }
        Some(index)
    }
}

impl<N> Default for Slab<N> {
    fn default() -> Self {
        Self::new()
    }
}
