//! The iterator protocol shared by every index kind.
//!
//! Two ways to walk an index, both over a [`Snapshot`] taken when they are
//! created:
//!
//! - [`SnapshotCursor`] implements the positional [`FsIterator`] protocol
//!   (`move_to_first`, `move_to_next`, `get`, ...). Generic traversal code
//!   written against [`FsIterator`] works on bag and ordered indexes alike.
//! - [`Iter`] is a plain double-ended [`Iterator`] yielding element handles.
//!
//! Neither borrows the index, so the index may be mutated while they are
//! alive. Such a mutation copies the backing store and leaves the snapshot
//! untouched: a cursor keeps yielding what it captured and never reports a
//! concurrent modification. Compare [`SnapshotCursor::modification_count`]
//! with the index's count to detect that the view has gone stale.
//!
//! # Cursor states
//!
//! ```text
//!                move_to_first / move_to_last / move_to
//!  Unpositioned ─────────────────────────────────────────► Positioned
//!                                                          │   ▲
//!                          move_to_next / move_to_previous │   │ move_to_first
//!                                   past either end        ▼   │ move_to_last
//!                                                        Exhausted
//! ```
//!
//! `get` succeeds only while positioned.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use fsindex_common::{Error, Result};

use crate::index::cow::Snapshot;
use crate::index::position::{Position, PositionalStore};

/// Where a cursor currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Created but not yet moved.
    Unpositioned,
    /// On an element.
    Positioned(Position),
    /// Moved past either end, or asked to move to an element that is not there.
    Exhausted,
}

/// Positional iteration over an index.
pub trait FsIterator<T> {
    /// Moves to the first element, or becomes exhausted if there is none.
    fn move_to_first(&mut self);

    /// Moves to the last element, or becomes exhausted if there is none.
    fn move_to_last(&mut self);

    /// Advances one element. From an unpositioned cursor this is
    /// `move_to_first`; on an exhausted cursor it does nothing.
    fn move_to_next(&mut self);

    /// Steps back one element. From an unpositioned cursor this is
    /// `move_to_last`; on an exhausted cursor it does nothing.
    fn move_to_previous(&mut self);

    /// Moves to `fs`.
    ///
    /// On an ordered index this is the leftmost element whose keys are not
    /// less than `fs`'s, ignoring identity. On a bag index it is `fs` itself.
    /// Becomes exhausted if there is no such element.
    fn move_to(&mut self, fs: &T);

    /// Returns true if the cursor is on an element.
    fn is_valid(&self) -> bool;

    /// The element under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::PreconditionViolation`] if the cursor is unpositioned or exhausted.
    fn get(&self) -> Result<T>;

    /// The current state.
    fn state(&self) -> CursorState;
}

/// A cursor over a snapshot of a backing store.
///
/// Optionally restricted to a window of positions, which is how range views
/// of an ordered index are traversed.
pub struct SnapshotCursor<T, S> {
    snapshot: Snapshot<S>,
    first: Position,
    last: Position,
    len: usize,
    state: CursorState,
    modification_count: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Clone, S: PositionalStore<T>> SnapshotCursor<T, S> {
    /// An unpositioned cursor over the whole snapshot.
    pub(crate) fn new(snapshot: Snapshot<S>, modification_count: u64) -> Self {
        let first = snapshot.first_position();
        let last = snapshot.last_position();
        let len = snapshot.len();
        Self::from_parts(snapshot, first, last, len, modification_count)
    }

    /// An unpositioned cursor over the elements at `range` of an array store.
    pub(crate) fn windowed(
        snapshot: Snapshot<S>,
        range: Range<usize>,
        modification_count: u64,
    ) -> Self {
        let (first, last) = window(&range);
        Self::from_parts(snapshot, first, last, range.len(), modification_count)
    }

    fn from_parts(
        snapshot: Snapshot<S>,
        first: Position,
        last: Position,
        len: usize,
        modification_count: u64,
    ) -> Self {
        Self {
            snapshot,
            first,
            last,
            len,
            state: CursorState::Unpositioned,
            modification_count,
            _marker: PhantomData,
        }
    }

    /// The index's modification count when this cursor was created.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    /// The snapshot this cursor traverses.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot<S> {
        &self.snapshot
    }

    /// Number of elements this cursor can visit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there is nothing to visit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn in_window(&self, pos: Position) -> bool {
        pos >= self.first && pos <= self.last && self.snapshot.is_valid_position(pos)
    }

    fn settle(&mut self, pos: Position) {
        self.state = if self.in_window(pos) {
            CursorState::Positioned(pos)
        } else {
            CursorState::Exhausted
        };
    }
}

impl<T: Clone, S: PositionalStore<T>> FsIterator<T> for SnapshotCursor<T, S> {
    fn move_to_first(&mut self) {
        self.settle(self.first);
    }

    fn move_to_last(&mut self) {
        self.settle(self.last);
    }

    fn move_to_next(&mut self) {
        match self.state {
            CursorState::Positioned(pos) => self.settle(self.snapshot.next_position(pos)),
            CursorState::Unpositioned => self.move_to_first(),
            CursorState::Exhausted => {}
        }
    }

    fn move_to_previous(&mut self) {
        match self.state {
            CursorState::Positioned(pos) => self.settle(self.snapshot.previous_position(pos)),
            CursorState::Unpositioned => self.move_to_last(),
            CursorState::Exhausted => {}
        }
    }

    fn move_to(&mut self, fs: &T) {
        let pos = self.snapshot.seek(fs);
        if pos == Position::INVALID {
            self.state = CursorState::Exhausted;
        } else {
            self.settle(pos.max(self.first));
        }
    }

    fn is_valid(&self) -> bool {
        matches!(self.state, CursorState::Positioned(pos) if self.in_window(pos))
    }

    fn get(&self) -> Result<T> {
        match self.state {
            CursorState::Positioned(pos) => self
                .snapshot
                .get_at(pos)
                .cloned()
                .ok_or(Error::PreconditionViolation("cursor position holds no element")),
            CursorState::Unpositioned => {
                Err(Error::PreconditionViolation("cursor is not positioned"))
            }
            CursorState::Exhausted => Err(Error::PreconditionViolation("cursor is exhausted")),
        }
    }

    fn state(&self) -> CursorState {
        self.state
    }
}

impl<T, S> Clone for SnapshotCursor<T, S> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            first: self.first,
            last: self.last,
            len: self.len,
            state: self.state,
            modification_count: self.modification_count,
            _marker: PhantomData,
        }
    }
}

impl<T, S> fmt::Debug for SnapshotCursor<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCursor")
            .field("state", &self.state)
            .field("len", &self.len)
            .field("modification_count", &self.modification_count)
            .finish_non_exhaustive()
    }
}

/// An owned, double-ended iterator over a snapshot.
///
/// Yields element handles (clones of `T`). Created in ascending order by
/// `iter()`; [`reversed`](Self::reversed) or `rev()` walk the other way
/// without materializing a reversed copy.
pub struct Iter<T, S> {
    snapshot: Snapshot<S>,
    front: Position,
    back: Position,
    remaining: usize,
    descending: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Clone, S: PositionalStore<T>> Iter<T, S> {
    pub(crate) fn new(snapshot: Snapshot<S>) -> Self {
        let front = snapshot.first_position();
        let back = snapshot.last_position();
        let remaining = snapshot.len();
        Self::from_parts(snapshot, front, back, remaining)
    }

    pub(crate) fn windowed(snapshot: Snapshot<S>, range: Range<usize>) -> Self {
        let (front, back) = window(&range);
        Self::from_parts(snapshot, front, back, range.len())
    }

    fn from_parts(snapshot: Snapshot<S>, front: Position, back: Position, remaining: usize) -> Self {
        Self {
            snapshot,
            front,
            back,
            remaining,
            descending: false,
            _marker: PhantomData,
        }
    }

    /// Flips the direction this iterator yields elements in.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.descending = !self.descending;
        self
    }

    fn take_front(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.snapshot.get_at(self.front)?.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.snapshot.next_position(self.front);
        }
        Some(item)
    }

    fn take_back(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.snapshot.get_at(self.back)?.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = self.snapshot.previous_position(self.back);
        }
        Some(item)
    }
}

impl<T: Clone, S: PositionalStore<T>> Iterator for Iter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.descending {
            self.take_back()
        } else {
            self.take_front()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone, S: PositionalStore<T>> DoubleEndedIterator for Iter<T, S> {
    fn next_back(&mut self) -> Option<T> {
        if self.descending {
            self.take_front()
        } else {
            self.take_back()
        }
    }
}

impl<T: Clone, S: PositionalStore<T>> ExactSizeIterator for Iter<T, S> {}

impl<T, S> fmt::Debug for Iter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .field("descending", &self.descending)
            .finish_non_exhaustive()
    }
}

/// First and last position of an index range; crossed when the range is empty.
fn window(range: &Range<usize>) -> (Position, Position) {
    let first = Position::at(range.start);
    let last = if range.is_empty() {
        Position::INVALID
    } else {
        Position::at(range.end - 1)
    };
    (first, last)
}
