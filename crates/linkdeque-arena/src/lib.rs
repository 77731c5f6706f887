//! Generational slab allocators for linkdeque nodes.
//!
//! Every allocator in this crate implements
//! [`NodeAllocator`](linkdeque_core::NodeAllocator) on top of a shared
//! [`Slab`]: a table of generation-stamped slots with a LIFO free list.
//! Freeing a slot bumps its generation, so any handle still pointing at it
//! is detected as stale in O(1) instead of reading a recycled node.
//!
//! # Architecture
//!
//! ```text
//! HeapAllocator<N>   (default, grows on demand via Vec::try_reserve)
//! ArenaAllocator<N>  (fixed byte budget from ArenaConfig, never grows)
//!     └── Segments<N>
//!           ├── primary Slab<N>  (new blocks)
//!           └── adopted Slab<N>s (taken over by absorb, dropped when empty)
//!                 Slab<N> → Slot<N>[] (generation + Option<N>) + free list
//! ```
//!
//! Neither allocator uses `unsafe`: nodes live inside the slot table and
//! are reached through [`BlockHandle`](linkdeque_core::BlockHandle)s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod heap;
pub mod segments;
pub mod slab;

// Public re-exports for the primary API surface.
pub use arena::ArenaAllocator;
pub use config::ArenaConfig;
pub use heap::HeapAllocator;
pub use segments::Segments;
pub use slab::Slab;
