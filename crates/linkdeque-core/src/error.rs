//! Error types for the linkdeque workspace.
//!
//! Two layers: [`AllocError`] is raised by allocator implementations,
//! [`DequeError`] by the deque and its cursors. Allocation failures are
//! wrapped into [`DequeError::Alloc`] on the way up.

use std::error::Error;
use std::fmt;

use crate::id::BlockHandle;
use crate::position::{Position, Step};

/// Errors raised by a [`NodeAllocator`](crate::NodeAllocator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator cannot provide another block.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Total capacity of the allocator in bytes.
        capacity: usize,
    },
    /// The allocator configuration was rejected at construction.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid allocator config: {reason}"),
        }
    }
}

impl Error for AllocError {}

/// Errors raised by deque operations and cursors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DequeError {
    /// `front`, `back`, `pop_front` or `pop_back` on an empty deque.
    Empty,
    /// The allocator could not provide a node.
    Alloc(AllocError),
    /// A cursor tried to step past a boundary.
    ///
    /// Advancing from the sentinel, or retreating from the first node
    /// (or from the sentinel of an empty deque).
    OutOfRange {
        /// The move that was refused.
        step: Step,
    },
    /// Dereference of a cursor resting on a sentinel.
    DerefOutOfRange {
        /// The sentinel the cursor was on.
        position: Position,
    },
    /// A detached position names a node that has since been removed.
    StaleCursor {
        /// The block the position referred to.
        block: BlockHandle,
    },
    /// A sentinel was handed to a cursor walking the other way.
    InvalidPosition {
        /// The rejected position.
        position: Position,
    },
    /// The chain links to a block its allocator no longer holds.
    ///
    /// Only reachable with an allocator that breaks the
    /// [`NodeAllocator`](crate::NodeAllocator) contract.
    DanglingLink {
        /// The missing block.
        block: BlockHandle,
    },
}

impl fmt::Display for DequeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "deque is empty"),
            Self::Alloc(err) => write!(f, "node allocation failed: {err}"),
            Self::OutOfRange { step } => write!(f, "cursor {step} out of range"),
            Self::DerefOutOfRange { position } => {
                write!(f, "dereference of out-of-range cursor ({position})")
            }
            Self::StaleCursor { block } => {
                write!(f, "stale cursor: {block} was removed from the deque")
            }
            Self::InvalidPosition { position } => {
                write!(f, "position {position} does not belong to this cursor direction")
            }
            Self::DanglingLink { block } => {
                write!(f, "dangling link: allocator no longer holds {block}")
            }
        }
    }
}

impl Error for DequeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for DequeError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}
