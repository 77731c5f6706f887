//! Core types and traits for the linkdeque workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the allocators and the deque: block handles,
//! cursor positions, error types, allocation statistics, and the
//! [`NodeAllocator`] capability trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod metrics;
pub mod position;
pub mod traits;

pub use error::{AllocError, DequeError};
pub use id::{AllocatorId, BlockHandle};
pub use metrics::AllocStats;
pub use position::{Direction, Position, Step};
pub use traits::NodeAllocator;
