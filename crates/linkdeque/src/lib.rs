//! Linkdeque: a double-ended queue over a doubly-linked chain of nodes.
//!
//! Each element lives in its own node, and every node comes from a
//! pluggable [`NodeAllocator`](types::NodeAllocator). Push and pop are
//! O(1) at both ends, allocation failure is a recoverable
//! [`DequeError::Alloc`] rather than an abort, and cursors check their
//! bounds on every step.
//!
//! # Quick start
//!
//! ```rust
//! use linkdeque::prelude::*;
//!
//! let mut deque = Deque::new();
//! deque.push_back(1).unwrap();
//! deque.push_back(2).unwrap();
//! deque.push_front(0).unwrap();
//! assert_eq!(deque.to_string(), "0 1 2");
//!
//! // Cursors walk either way and refuse to step off the ends.
//! let mut cursor = deque.rbegin();
//! assert_eq!(cursor.get(), Ok(&2));
//! cursor.advance().unwrap();
//! assert_eq!(cursor.get(), Ok(&1));
//!
//! assert_eq!(deque.pop_front(), Ok(0));
//! assert_eq!(deque.len(), 2);
//! ```
//!
//! # Bounded storage
//!
//! ```rust
//! use linkdeque::prelude::*;
//! use linkdeque::arena::ArenaAllocator;
//!
//! let arena = ArenaAllocator::with_nodes(2).unwrap();
//! let mut deque = Deque::new_in(arena);
//! deque.push_back('a').unwrap();
//! deque.push_back('b').unwrap();
//! assert!(matches!(deque.push_back('c'), Err(DequeError::Alloc(_))));
//! assert_eq!(deque.len(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `linkdeque-core` | Handles, positions, errors, the allocator trait |
//! | [`arena`] | `linkdeque-arena` | Heap and fixed-budget allocators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cursor;
pub mod deque;
pub mod iter;
pub mod node;

/// Node allocators (`linkdeque-arena`).
///
/// [`arena::HeapAllocator`] is the default; [`arena::ArenaAllocator`]
/// enforces a fixed byte budget.
pub use linkdeque_arena as arena;

/// Handles, positions, errors, and the allocator trait (`linkdeque-core`).
pub use linkdeque_core as types;

pub use cursor::{Cursor, CursorMut};
pub use deque::Deque;
pub use iter::{IntoIter, Iter};
pub use linkdeque_core::{AllocError, DequeError, Direction, Position, Step};
pub use node::Node;

/// Common imports.
///
/// ```rust
/// use linkdeque::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Cursor, CursorMut, Deque};

    pub use linkdeque_arena::{ArenaConfig, HeapAllocator};
    pub use linkdeque_core::{AllocError, DequeError, Direction, NodeAllocator, Position};
}
