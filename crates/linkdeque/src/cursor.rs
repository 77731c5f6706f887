//! Bidirectional cursors over a [`Deque`].
//!
//! A cursor is a [`Position`] plus a [`Direction`] plus a borrow of the
//! deque. Forward cursors run head to tail and rest on [`Position::End`]
//! past the tail; reverse cursors run tail to head and rest on
//! [`Position::Rend`] past the head. "Advance" always means "in the
//! cursor's own direction".
//!
//! ```text
//!            retreat                advance
//!   forward:   <--   head ... tail   -->  End
//!   reverse:   Rend  <--  head ... tail  <--
//!                    advance         retreat
//! ```
//!
//! Cursors borrow the deque, so structural mutation while one is alive is
//! rejected at compile time. To keep a place across mutations, detach it
//! with [`Cursor::position`] and re-attach with [`Deque::cursor_at`], which
//! reports [`DequeError::StaleCursor`] if the node has since been removed.

use std::fmt;
use std::ptr;

use linkdeque_arena::HeapAllocator;
use linkdeque_core::{BlockHandle, DequeError, Direction, NodeAllocator, Position, Step};

use crate::deque::Deque;
use crate::node::Node;

/// Compute where a cursor lands after one `step`.
///
/// Pure: the deque is only read. On error the caller keeps its old
/// position.
fn walk<T, A: NodeAllocator<Node<T>>>(
    deque: &Deque<T, A>,
    position: Position,
    direction: Direction,
    step: Step,
) -> Result<Position, DequeError> {
    let toward_next = matches!(
        (direction, step),
        (Direction::Forward, Step::Advance) | (Direction::Reverse, Step::Retreat)
    );
    match position {
        Position::At(block) => {
            let node = deque.node(block)?;
            let link = if toward_next { node.next } else { node.prev };
            match (link, step) {
                (Some(next), _) => Ok(Position::At(next)),
                (None, Step::Advance) => Ok(direction.sentinel()),
                (None, Step::Retreat) => Err(DequeError::OutOfRange { step }),
            }
        }
        sentinel if sentinel == direction.sentinel() => match step {
            Step::Advance => Err(DequeError::OutOfRange { step }),
            Step::Retreat => {
                let last = match direction {
                    Direction::Forward => deque.tail_block(),
                    Direction::Reverse => deque.head_block(),
                };
                last.map(Position::At)
                    .ok_or(DequeError::OutOfRange { step })
            }
        },
        other => Err(DequeError::InvalidPosition { position: other }),
    }
}

/// Read-only cursor. Cheap to copy.
pub struct Cursor<'a, T, A: NodeAllocator<Node<T>> = HeapAllocator<Node<T>>> {
    deque: &'a Deque<T, A>,
    position: Position,
    direction: Direction,
}

impl<'a, T, A: NodeAllocator<Node<T>>> Cursor<'a, T, A> {
    fn new(deque: &'a Deque<T, A>, position: Position, direction: Direction) -> Self {
        Self {
            deque,
            position,
            direction,
        }
    }

    /// Where the cursor rests. Can be fed back to [`Deque::cursor_at`].
    pub fn position(&self) -> Position {
        self.position
    }

    /// Which way [`advance`](Self::advance) moves.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the cursor rests on its direction's sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.position.is_sentinel()
    }

    /// Move one step in the cursor's direction.
    ///
    /// From the last element this lands on the sentinel. From the
    /// sentinel it fails with [`DequeError::OutOfRange`] and the cursor
    /// stays put.
    pub fn advance(&mut self) -> Result<(), DequeError> {
        self.position = walk(&*self.deque, self.position, self.direction, Step::Advance)?;
        Ok(())
    }

    /// Move one step against the cursor's direction.
    ///
    /// From the sentinel this lands on the last element (in the cursor's
    /// order). From the first element, or from the sentinel of an empty
    /// deque, it fails with [`DequeError::OutOfRange`].
    pub fn retreat(&mut self) -> Result<(), DequeError> {
        self.position = walk(&*self.deque, self.position, self.direction, Step::Retreat)?;
        Ok(())
    }

    /// The element under the cursor.
    ///
    /// The reference outlives the cursor; it borrows the deque.
    pub fn get(&self) -> Result<&'a T, DequeError> {
        let block = self
            .position
            .block()
            .ok_or(DequeError::DerefOutOfRange {
                position: self.position,
            })?;
        let deque: &'a Deque<T, A> = self.deque;
        Ok(&deque.node(block)?.value)
    }
}

impl<T, A: NodeAllocator<Node<T>>> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: NodeAllocator<Node<T>>> Copy for Cursor<'_, T, A> {}

/// Two cursors are equal when they walk the same deque, the same way,
/// and rest on the same position.
impl<T, A: NodeAllocator<Node<T>>> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.deque, other.deque)
            && self.direction == other.direction
            && self.position == other.position
    }
}

impl<T, A: NodeAllocator<Node<T>>> Eq for Cursor<'_, T, A> {}

impl<T, A: NodeAllocator<Node<T>>> PartialEq<Position> for Cursor<'_, T, A> {
    fn eq(&self, other: &Position) -> bool {
        self.position == *other
    }
}

impl<T, A: NodeAllocator<Node<T>>> fmt::Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Cursor with write access to the element under it.
///
/// Holds the deque exclusively; elements can be changed but not linked or
/// unlinked while it lives.
pub struct CursorMut<'a, T, A: NodeAllocator<Node<T>> = HeapAllocator<Node<T>>> {
    deque: &'a mut Deque<T, A>,
    position: Position,
    direction: Direction,
}

impl<'a, T, A: NodeAllocator<Node<T>>> CursorMut<'a, T, A> {
    fn new(deque: &'a mut Deque<T, A>, position: Position, direction: Direction) -> Self {
        Self {
            deque,
            position,
            direction,
        }
    }

    /// Where the cursor rests.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Which way [`advance`](Self::advance) moves.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the cursor rests on its direction's sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.position.is_sentinel()
    }

    /// Same as [`Cursor::advance`].
    pub fn advance(&mut self) -> Result<(), DequeError> {
        self.position = walk(&*self.deque, self.position, self.direction, Step::Advance)?;
        Ok(())
    }

    /// Same as [`Cursor::retreat`].
    pub fn retreat(&mut self) -> Result<(), DequeError> {
        self.position = walk(&*self.deque, self.position, self.direction, Step::Retreat)?;
        Ok(())
    }

    /// The element under the cursor.
    pub fn get(&self) -> Result<&T, DequeError> {
        let block = self.deref_block()?;
        Ok(&self.deque.node(block)?.value)
    }

    /// The element under the cursor, for in-place mutation.
    pub fn get_mut(&mut self) -> Result<&mut T, DequeError> {
        let block = self.deref_block()?;
        Ok(&mut self.deque.node_mut(block)?.value)
    }

    /// A read-only cursor at the same place, borrowing from this one.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor::new(&*self.deque, self.position, self.direction)
    }

    fn deref_block(&self) -> Result<BlockHandle, DequeError> {
        self.position.block().ok_or(DequeError::DerefOutOfRange {
            position: self.position,
        })
    }
}

impl<T, A: NodeAllocator<Node<T>>> PartialEq<Position> for CursorMut<'_, T, A> {
    fn eq(&self, other: &Position) -> bool {
        self.position == *other
    }
}

impl<T, A: NodeAllocator<Node<T>>> fmt::Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.position)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Cursor constructors.
impl<T, A: NodeAllocator<Node<T>>> Deque<T, A> {
    /// Forward cursor on the first element, or on `End` if empty.
    pub fn begin(&self) -> Cursor<'_, T, A> {
        let position = self.head_block().map_or(Position::End, Position::At);
        Cursor::new(self, position, Direction::Forward)
    }

    /// Forward cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, Position::End, Direction::Forward)
    }

    /// Reverse cursor on the last element, or on `Rend` if empty.
    pub fn rbegin(&self) -> Cursor<'_, T, A> {
        let position = self.tail_block().map_or(Position::Rend, Position::At);
        Cursor::new(self, position, Direction::Reverse)
    }

    /// Reverse cursor one before the first element.
    pub fn rend(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, Position::Rend, Direction::Reverse)
    }

    /// Mutable forward cursor on the first element, or on `End` if empty.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, A> {
        let position = self.head_block().map_or(Position::End, Position::At);
        CursorMut::new(self, position, Direction::Forward)
    }

    /// Mutable reverse cursor on the last element, or on `Rend` if empty.
    pub fn rbegin_mut(&mut self) -> CursorMut<'_, T, A> {
        let position = self.tail_block().map_or(Position::Rend, Position::At);
        CursorMut::new(self, position, Direction::Reverse)
    }

    /// Re-attach a detached position.
    ///
    /// Fails with [`DequeError::StaleCursor`] if the node was removed (or
    /// belongs to another deque), and with [`DequeError::InvalidPosition`]
    /// if `position` is the other direction's sentinel.
    pub fn cursor_at(
        &self,
        position: Position,
        direction: Direction,
    ) -> Result<Cursor<'_, T, A>, DequeError> {
        self.check_position(position, direction)?;
        Ok(Cursor::new(self, position, direction))
    }

    /// Mutable counterpart of [`cursor_at`](Self::cursor_at).
    pub fn cursor_mut_at(
        &mut self,
        position: Position,
        direction: Direction,
    ) -> Result<CursorMut<'_, T, A>, DequeError> {
        self.check_position(position, direction)?;
        Ok(CursorMut::new(self, position, direction))
    }

    fn check_position(&self, position: Position, direction: Direction) -> Result<(), DequeError> {
        match position {
            Position::At(block) if self.allocator().get(block).is_some() => Ok(()),
            Position::At(block) => Err(DequeError::StaleCursor { block }),
            sentinel if sentinel == direction.sentinel() => Ok(()),
            other => Err(DequeError::InvalidPosition { position: other }),
        }
    }
}
