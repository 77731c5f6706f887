//! Values that count their own drops.

use std::cell::Cell;
use std::rc::Rc;

/// Mints [`Tracked`] values and reports how many have been dropped.
#[derive(Clone, Debug, Default)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new value labelled `id`. Clones share the counter.
    pub fn make(&self, id: u32) -> Tracked {
        Tracked {
            id,
            drops: Rc::clone(&self.drops),
        }
    }

    /// Drops observed so far.
    pub fn count(&self) -> usize {
        self.drops.get()
    }
}

/// A labelled value that bumps its [`DropCounter`] when dropped.
#[derive(Clone, Debug)]
pub struct Tracked {
    id: u32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tracked {}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
