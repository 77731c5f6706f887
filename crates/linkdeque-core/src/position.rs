//! Cursor positions and walking directions.

use std::fmt;

use crate::id::BlockHandle;

/// Where a cursor rests.
///
/// The two sentinels are distinct so that "one past the tail" and "one
/// before the head" can never be confused with each other or with an
/// empty container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    /// On a live node.
    At(BlockHandle),
    /// One past the tail. The forward sentinel.
    End,
    /// One before the head. The reverse sentinel.
    Rend,
}

impl Position {
    /// The node this position rests on, if any.
    pub fn block(&self) -> Option<BlockHandle> {
        match self {
            Self::At(block) => Some(*block),
            Self::End | Self::Rend => None,
        }
    }

    /// Whether this position is one of the two sentinels.
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::At(_))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(block) => write!(f, "at {block}"),
            Self::End => write!(f, "end"),
            Self::Rend => write!(f, "rend"),
        }
    }
}

/// Walking direction of a cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Head to tail; the sentinel is [`Position::End`].
    Forward,
    /// Tail to head; the sentinel is [`Position::Rend`].
    Reverse,
}

impl Direction {
    /// The sentinel a cursor walking this way reaches after its last node.
    pub fn sentinel(&self) -> Position {
        match self {
            Self::Forward => Position::End,
            Self::Reverse => Position::Rend,
        }
    }
}

/// A single cursor move, relative to the cursor's own direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// `++`: towards the sentinel.
    Advance,
    /// `--`: back towards the first node.
    Retreat,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advance => write!(f, "advance"),
            Self::Retreat => write!(f, "retreat"),
        }
    }
}
